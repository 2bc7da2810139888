//! Quiz generation: document text in, parsed questions out.
//!
//! The document is split into chunks, the leading chunks become the prompt
//! context, and a [`TextGenerator`] produces the raw quiz text that
//! [`crate::parser`] turns into questions. Only the generation call is
//! retried; parsing is deterministic.

mod gemini;
mod prompt;
mod retry;
mod splitter;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::parser::{ParseReport, parse_quiz_report};

pub use gemini::{DEFAULT_API_BASE, GeminiClient};
pub use prompt::{CONTEXT_CHUNKS, QUESTIONS_PER_QUIZ, build_context, build_prompt};
pub use retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, RetryPolicy, RetryingGenerator};
pub use splitter::TextSplitter;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 800;

/// Errors from the generation service or its inputs.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("GOOGLE_API_KEY is not set")]
    MissingApiKey,

    #[error("document contains no text")]
    EmptyDocument,

    #[error("rate limited by generation service: {0}")]
    RateLimited(String),

    #[error("generation service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service returned no text")]
    EmptyResponse,
}

impl GenerationError {
    /// Only rate limiting is transient enough to retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::RateLimited(_))
    }
}

/// Sampling parameters passed with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

/// A service that completes a text prompt.
#[async_trait]
pub trait TextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, GenerationError>;
}

/// Builds quizzes from document text using a [`TextGenerator`].
pub struct QuizGenerator<G> {
    generator: RetryingGenerator<G>,
    splitter: TextSplitter,
    settings: GenerationSettings,
}

impl<G> QuizGenerator<G>
where
    G: TextGenerator + Send + Sync,
{
    pub fn new(generator: G) -> Self {
        Self {
            generator: RetryingGenerator::new(generator, RetryPolicy::default()),
            splitter: TextSplitter::default(),
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_retry_policy(self, policy: RetryPolicy) -> Self {
        Self {
            generator: RetryingGenerator::new(self.generator.into_inner(), policy),
            ..self
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_splitter(mut self, splitter: TextSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// Generates and parses a quiz.
    ///
    /// A successful call that yields no valid question returns an empty
    /// report rather than an error, so callers can tell the two apart.
    pub async fn generate_quiz(&self, document: &str) -> Result<ParseReport, GenerationError> {
        let chunks = self.splitter.split(document);
        if chunks.is_empty() {
            return Err(GenerationError::EmptyDocument);
        }

        let context = build_context(&chunks);
        let prompt = build_prompt(&context, QUESTIONS_PER_QUIZ);
        info!(
            chunks = chunks.len(),
            context_chars = context.chars().count(),
            "generating quiz"
        );

        let response = self.generator.generate(&prompt, &self.settings).await?;
        let report = parse_quiz_report(&response);
        info!(
            questions = report.questions.len(),
            dropped = report.dropped,
            "quiz generated"
        );

        Ok(report)
    }
}
