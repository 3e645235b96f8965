//! Agent connection settings.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Default read timeout; long documents take minutes to analyze.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(300);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default number of attempts per request, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Settings for an OpenAI-compatible analysis agent.
///
/// # Examples
///
/// ```
/// use docreduce::agent::AgentConfig;
/// use std::time::Duration;
///
/// let config = AgentConfig::new("gpt-4o-mini")
///     .with_temperature(0.0)
///     .with_read_timeout(Duration::from_secs(30));
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_attempts, 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Model identifier.
    pub model: String,
    /// API key; the provider falls back to `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible endpoint.
    pub api_base: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum time to wait for response data.
    pub read_timeout: Duration,
    /// Maximum time to establish a connection.
    pub connect_timeout: Duration,
    /// Attempts per request before giving up.
    pub max_attempts: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl AgentConfig {
    /// Creates a configuration for a model with default settings.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            api_base: None,
            temperature: DEFAULT_TEMPERATURE,
            read_timeout: DEFAULT_READ_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the endpoint base URL.
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the read timeout.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the number of attempts per request.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty model, a temperature outside
    /// `0.0..=2.0`, zero timeouts or zero attempts.
    pub fn validate(&self) -> Result<()> {
        let problem = if self.model.trim().is_empty() {
            Some("model must not be empty")
        } else if !(0.0..=2.0).contains(&self.temperature) {
            Some("temperature must be between 0.0 and 2.0")
        } else if self.read_timeout.is_zero() || self.connect_timeout.is_zero() {
            Some("timeouts must be > 0")
        } else if self.max_attempts == 0 {
            Some("max_attempts must be > 0")
        } else {
            None
        };

        problem.map_or(Ok(()), |message| {
            Err(Error::Config {
                message: message.to_string(),
            })
        })
    }
}
