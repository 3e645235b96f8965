//! Map-reduce document processing.
//!
//! A [`DocumentProcessor`] answers a question about one or more documents.
//! Small files go to the agent whole. Large files are split into
//! standalone fragments, each analyzed under a concurrency cap, and the
//! ordered partial answers are consolidated in a final streamed request.
//! Several files are each reduced to a single text first, then answered
//! together in one cross-file pass.

use std::sync::Arc;

use async_stream::stream;
use futures_util::StreamExt;
use futures_util::future::join_all;
use futures_util::stream::BoxStream;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::config::ProcessorConfig;
use super::context::build_context;
use crate::agent::PromptSet;
use crate::agent::message::Message;
use crate::agent::prompt::{chunk_instruction, consolidation_request, cross_file_request};
use crate::agent::provider::{AnalysisAgent, EventStream};
use crate::core::{Chunk, DocumentRef, PartialResult, order_results, sanitize_display_name};
use crate::error::{Error, Result, SplitError};
use crate::events::{Notifier, ProcessingListener};
use crate::io::read_document;
use crate::splitting::SplitterRegistry;

/// Lazily produced answer fragments.
pub type TextStream<'a> = BoxStream<'a, Result<String>>;

/// Answers questions about documents through an [`AnalysisAgent`].
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use futures_util::StreamExt;
/// use docreduce::agent::{AgentConfig, OpenAiAgent};
/// use docreduce::core::DocumentRef;
/// use docreduce::events::TracingListener;
/// use docreduce::processor::{DocumentProcessor, ProcessorConfig};
///
/// # async fn run() -> docreduce::Result<()> {
/// let agent = Arc::new(OpenAiAgent::new(AgentConfig::new("gpt-4o"))?);
/// let processor = DocumentProcessor::new(agent, ProcessorConfig::default())?
///     .add_listener(Arc::new(TracingListener));
///
/// let files = vec![DocumentRef::from_path("annual_report.pdf")];
/// let mut answer = processor.process(files, "What was the net revenue?");
/// while let Some(fragment) = answer.next().await {
///     print!("{}", fragment?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct DocumentProcessor {
    agent: Arc<dyn AnalysisAgent>,
    config: ProcessorConfig,
    prompts: PromptSet,
    splitters: SplitterRegistry,
    notifier: Notifier,
}

impl std::fmt::Debug for DocumentProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentProcessor")
            .field("config", &self.config)
            .field("splitters", &self.splitters)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl DocumentProcessor {
    /// Creates a processor with the standard splitters and prompts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(agent: Arc<dyn AnalysisAgent>, config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        if config.model != agent.model() {
            warn!(
                configured = %config.model,
                agent = %agent.model(),
                "configured model differs from the agent's model"
            );
        }
        let splitters = SplitterRegistry::with_limits(config.split_limits());
        Ok(Self {
            agent,
            config,
            prompts: PromptSet::default(),
            splitters,
            notifier: Notifier::new(),
        })
    }

    /// Replaces the system prompts.
    #[must_use]
    pub fn with_prompts(mut self, prompts: PromptSet) -> Self {
        self.prompts = prompts;
        self
    }

    /// Replaces the splitter table.
    #[must_use]
    pub fn with_splitters(mut self, splitters: SplitterRegistry) -> Self {
        self.splitters = splitters;
        self
    }

    /// Registers a listener, notified after those already registered.
    #[must_use]
    pub fn add_listener(mut self, listener: Arc<dyn ProcessingListener>) -> Self {
        self.notifier.add(listener);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Answers `question` about `files`.
    ///
    /// One file streams its own answer. Several files are reduced
    /// concurrently and answered together in a cross-file pass. Nothing
    /// happens until the returned stream is polled.
    ///
    /// # Errors
    ///
    /// The stream yields an error and ends on the first failure. An empty
    /// file list yields [`Error::InvalidState`]. Every failure reaches the
    /// listeners' error hook once before it is yielded.
    pub fn process(&self, files: Vec<DocumentRef>, question: impl Into<String>) -> TextStream<'_> {
        let question = question.into();
        stream! {
            let mut files = files;
            if files.len() > 1 {
                let mut output = self.process_many(files, question);
                while let Some(item) = output.next().await {
                    yield item;
                }
                return;
            }

            let Some(doc) = files.pop() else {
                let err = Error::InvalidState {
                    message: "no documents to process".to_string(),
                };
                self.notifier.error(&err).await;
                yield Err(err);
                return;
            };

            let mut output = self.process_file(doc, question);
            while let Some(item) = output.next().await {
                yield item;
            }
        }
        .boxed()
    }

    /// Reduces every file to a text concurrently, then answers across them.
    fn process_many(&self, files: Vec<DocumentRef>, question: String) -> TextStream<'_> {
        stream! {
            info!(files = files.len(), model = %self.config.model, "processing multiple files");
            let collected = join_all(
                files
                    .into_iter()
                    .map(|doc| self.collect_file(doc, &question)),
            )
            .await;

            // Failures were already reported where they happened.
            let answers = match collected.into_iter().collect::<Result<Vec<_>>>() {
                Ok(answers) => answers,
                Err(err) => {
                    yield Err(err);
                    return;
                }
            };

            self.notifier.summary_start().await;
            let message = Message::user_text(cross_file_request(&answers, &question));
            let opened = self.agent.stream(&self.prompts.cross_file, vec![message]).await;

            let mut output = self.forward(opened);
            while let Some(item) = output.next().await {
                let failed = item.is_err();
                yield item;
                if failed {
                    return;
                }
            }
            self.notifier.summary_end().await;
        }
        .boxed()
    }

    /// Runs one file to completion and gathers its answer.
    async fn collect_file(&self, doc: DocumentRef, question: &str) -> Result<(String, String)> {
        let name = doc.display_name();
        let mut output = self.process_file(doc, question.to_string());
        let mut text = String::new();
        while let Some(item) = output.next().await {
            text.push_str(&item?);
        }
        Ok((name, text))
    }

    /// Answers `question` about a single file, splitting it when large.
    fn process_file(&self, doc: DocumentRef, question: String) -> TextStream<'_> {
        stream! {
            let bytes = match read_document(&doc.path).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    self.notifier.error(&err).await;
                    yield Err(err);
                    return;
                }
            };

            let mut output = if bytes.len() > self.config.bytes_threshold {
                info!(
                    file = %doc.display_name(),
                    bytes = bytes.len(),
                    threshold = self.config.bytes_threshold,
                    "file over threshold, splitting"
                );
                self.process_chunked(doc, bytes, question)
            } else {
                debug!(
                    file = %doc.display_name(),
                    model = %self.config.model,
                    bytes = bytes.len(),
                    "processing file whole"
                );
                self.process_direct(doc, bytes, question)
            };
            while let Some(item) = output.next().await {
                yield item;
            }
        }
        .boxed()
    }

    /// Sends the whole file with the question and streams the answer.
    fn process_direct(&self, doc: DocumentRef, bytes: Vec<u8>, question: String) -> TextStream<'_> {
        stream! {
            let name = doc.display_name();
            self.notifier.processing_start(&name, 1).await;

            let message = Message::document_request(&doc.extension(), &name, bytes, &question);
            let opened = self.agent.stream(&self.prompts.document, vec![message]).await;

            let mut output = self.forward(opened);
            while let Some(item) = output.next().await {
                let failed = item.is_err();
                yield item;
                if failed {
                    return;
                }
            }
            self.notifier.processing_end(&name).await;
        }
        .boxed()
    }

    /// Splits the file, analyzes each fragment and streams the consolidation.
    fn process_chunked(&self, doc: DocumentRef, bytes: Vec<u8>, question: String) -> TextStream<'_> {
        stream! {
            let name = doc.display_name();
            let extension = doc.extension();
            let splitter = self.splitters.resolve(&extension);
            let joined = tokio::task::spawn_blocking(move || splitter.split(&bytes)).await;
            let split = match joined {
                Ok(split) => split,
                Err(join) => Err(SplitError::from(join).into()),
            };
            let blobs = match split {
                Ok(blobs) => blobs,
                Err(err) => {
                    self.notifier.error(&err).await;
                    yield Err(err);
                    return;
                }
            };

            let chunks = Chunk::sequence_all(blobs);
            let total = chunks.len();
            if total == 0 {
                let err = Error::InvalidState {
                    message: format!("splitting {name} produced no fragments"),
                };
                self.notifier.error(&err).await;
                yield Err(err);
                return;
            }

            self.notifier.processing_start(&name, total).await;
            info!(
                file = %name,
                model = %self.config.model,
                chunks = total,
                workers = self.config.max_workers,
                "analyzing fragments"
            );

            let gate = Semaphore::new(self.config.max_workers);
            let outcomes = join_all(
                chunks
                    .into_iter()
                    .map(|chunk| self.analyze_chunk(&gate, &name, &extension, &question, chunk)),
            )
            .await;

            // Each failed chunk already reported its own error.
            let partials = match outcomes.into_iter().collect::<Result<Vec<_>>>() {
                Ok(partials) => partials,
                Err(err) => {
                    yield Err(err);
                    return;
                }
            };

            self.notifier.processing_end(&name).await;

            let context = build_context(&order_results(partials), self.config.max_context_chars);
            let message = Message::user_text(consolidation_request(total, &context, &question));
            let opened = self.agent.stream(&self.prompts.consolidation, vec![message]).await;

            let mut output = self.forward(opened);
            while let Some(item) = output.next().await {
                yield item;
            }
        }
        .boxed()
    }

    /// Analyzes one fragment once a worker slot is free.
    async fn analyze_chunk(
        &self,
        gate: &Semaphore,
        name: &str,
        format: &str,
        question: &str,
        chunk: Chunk,
    ) -> Result<PartialResult> {
        let _permit = match gate.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                let err = Error::InvalidState {
                    message: format!("worker pool closed: {e}"),
                };
                self.notifier.error(&err).await;
                return Err(err);
            }
        };

        let number = chunk.sequence;
        self.notifier.chunk_start(number, name).await;

        let attachment_name = sanitize_display_name(&format!("{name}_{number}"));
        let message = Message::document_request(
            format,
            &attachment_name,
            chunk.bytes,
            &chunk_instruction(question),
        );

        match self.agent.invoke(&self.prompts.chunk, vec![message]).await {
            Ok(text) => {
                self.notifier.chunk_end(number, name, &text).await;
                Ok(PartialResult::new(number, text))
            }
            Err(err) => {
                self.notifier.error(&err).await;
                Err(err)
            }
        }
    }

    /// Turns agent events into output text, reporting a failure once.
    fn forward(&self, opened: Result<EventStream>) -> TextStream<'_> {
        stream! {
            let mut events = match opened {
                Ok(events) => events,
                Err(err) => {
                    self.notifier.error(&err).await;
                    yield Err(err);
                    return;
                }
            };

            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        if let Some(text) = event.into_output() {
                            yield Ok(text);
                        }
                    }
                    Err(err) => {
                        self.notifier.error(&err).await;
                        yield Err(err);
                        return;
                    }
                }
            }
        }
        .boxed()
    }
}
