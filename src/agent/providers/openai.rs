//! OpenAI-compatible analysis agent built on `async-openai`.

use std::future::Future;
use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    CreateChatCompletionStreamResponse,
};
use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use tracing::{debug, warn};

use crate::agent::attachment::render_attachment;
use crate::agent::config::AgentConfig;
use crate::agent::message::{ContentBlock, Message, Role, StreamEvent};
use crate::agent::provider::{AnalysisAgent, EventStream};
use crate::error::{AgentError, Error, Result};

/// Backoff before the second attempt; doubled per attempt.
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Upper bound on the wait between attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Analysis agent talking to an OpenAI-compatible chat completions API.
pub struct OpenAiAgent {
    client: Client<OpenAIConfig>,
    config: AgentConfig,
}

impl std::fmt::Debug for OpenAiAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAgent")
            .field("model", &self.config.model)
            .field("api_base", &self.config.api_base)
            .finish_non_exhaustive()
    }
}

impl OpenAiAgent {
    /// Creates an agent from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;

        let mut openai = OpenAIConfig::new();
        if let Some(key) = &config.api_key {
            openai = openai.with_api_key(key);
        }
        if let Some(base) = &config.api_base {
            openai = openai.with_api_base(base);
        }

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("cannot build HTTP client: {e}"),
            })?;

        let client = Client::with_config(openai).with_http_client(http);
        Ok(Self { client, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn build_request(
        &self,
        system_prompt: &str,
        messages: &[Message],
        streaming: bool,
    ) -> Result<CreateChatCompletionRequest> {
        let mut chat: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(messages.len() + 1);
        chat.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(invalid_request)?
                .into(),
        );
        for message in messages {
            chat.push(to_chat_message(message)?);
        }

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.config.model)
            .messages(chat)
            .temperature(self.config.temperature);
        if streaming {
            args.stream(true);
        }
        args.build().map_err(invalid_request)
    }

    fn request_error(&self, err: &OpenAIError) -> Error {
        AgentError::Request {
            model: self.config.model.clone(),
            reason: err.to_string(),
        }
        .into()
    }

    /// Runs `op` until it succeeds or the attempt budget is spent.
    async fn with_retries<T, F, Fut>(&self, op: F) -> std::result::Result<T, OpenAIError>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = std::result::Result<T, OpenAIError>> + Send,
    {
        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.config.max_attempts && is_retryable(&err) => {
                    warn!(
                        model = %self.config.model,
                        attempt,
                        max_attempts = self.config.max_attempts,
                        error = %err,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[async_trait]
impl AnalysisAgent for OpenAiAgent {
    async fn invoke(&self, system_prompt: &str, messages: Vec<Message>) -> Result<String> {
        let request = self.build_request(system_prompt, &messages, false)?;
        drop(messages);

        let chat = self.client.chat();
        let response = self
            .with_retries(|| chat.create(request.clone()))
            .await
            .map_err(|e| self.request_error(&e))?;

        if let Some(usage) = &response.usage {
            debug!(
                model = %self.config.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion received"
            );
        }

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                AgentError::EmptyResponse {
                    model: self.config.model.clone(),
                }
                .into()
            })
    }

    async fn stream(&self, system_prompt: &str, messages: Vec<Message>) -> Result<EventStream> {
        let request = self.build_request(system_prompt, &messages, true)?;
        drop(messages);

        let chat = self.client.chat();
        let responses = self
            .with_retries(|| chat.create_stream(request.clone()))
            .await
            .map_err(|e| self.request_error(&e))?;

        let events = responses.flat_map(|item| {
            let events: Vec<Result<StreamEvent>> = match item {
                Ok(chunk) => chunk_events(chunk).into_iter().map(Ok).collect(),
                Err(e) => vec![Err(AgentError::Stream(e.to_string()).into())],
            };
            stream::iter(events)
        });
        Ok(events.boxed())
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Converts a message to the chat-completions shape, rendering documents as text.
fn to_chat_message(message: &Message) -> Result<ChatCompletionRequestMessage> {
    let text = message
        .content
        .iter()
        .map(|block| match block {
            ContentBlock::Text(text) => Ok(text.clone()),
            ContentBlock::Document(doc) => render_attachment(doc),
        })
        .collect::<Result<Vec<_>>>()?
        .join("\n\n");

    let chat: ChatCompletionRequestMessage = match message.role {
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(text)
            .build()
            .map_err(invalid_request)?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(text)
            .build()
            .map_err(invalid_request)?
            .into(),
    };
    Ok(chat)
}

/// Maps one streamed chunk to events: text deltas, then a stop per finished choice.
fn chunk_events(chunk: CreateChatCompletionStreamResponse) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    for choice in chunk.choices {
        if let Some(text) = choice.delta.content
            && !text.is_empty()
        {
            events.push(StreamEvent::Text(text));
        }
        if choice.finish_reason.is_some() {
            events.push(StreamEvent::MessageStop);
        }
    }
    if events.is_empty() {
        events.push(StreamEvent::Other);
    }
    events
}

/// Transport failures are retried; API error replies are final.
///
/// `async-openai` already backs off on 429 before surfacing an `ApiError`.
fn is_retryable(err: &OpenAIError) -> bool {
    match err {
        OpenAIError::Reqwest(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
        OpenAIError::StreamError(_) => true,
        _ => false,
    }
}

fn invalid_request(err: OpenAIError) -> Error {
    AgentError::InvalidRequest(err.to_string()).into()
}
