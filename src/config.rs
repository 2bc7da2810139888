//! Settings for the generation service, read from flags or the environment.

use std::time::Duration;

use clap::Args;

use crate::generator::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, GeminiClient, GenerationError, GenerationSettings,
    QuizGenerator, RetryPolicy,
};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Args, Debug, Clone)]
pub struct GeneratorConfig {
    /// API key for the Generative Language API
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used to write the quiz
    #[arg(long, env = "DOC_QUIZ_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Sampling temperature
    #[arg(long, default_value_t = crate::generator::DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Upper bound on generated tokens
    #[arg(long, default_value_t = crate::generator::DEFAULT_MAX_OUTPUT_TOKENS)]
    pub max_output_tokens: u32,

    /// Attempts made when the service rate limits us
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_retries: u32,

    /// Base backoff in seconds, multiplied by the attempt number
    #[arg(long, default_value_t = DEFAULT_BASE_DELAY.as_secs())]
    pub retry_delay_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: crate::generator::DEFAULT_TEMPERATURE,
            max_output_tokens: crate::generator::DEFAULT_MAX_OUTPUT_TOKENS,
            max_retries: DEFAULT_MAX_ATTEMPTS,
            retry_delay_secs: DEFAULT_BASE_DELAY.as_secs(),
        }
    }
}

impl GeneratorConfig {
    pub fn settings(&self) -> GenerationSettings {
        GenerationSettings {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_secs(self.retry_delay_secs))
    }

    /// Builds a generator backed by [`GeminiClient`].
    pub fn build(&self) -> Result<QuizGenerator<GeminiClient>, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;
        let client = GeminiClient::new(api_key, self.model.as_str())?;

        Ok(QuizGenerator::new(client)
            .with_retry_policy(self.retry_policy())
            .with_settings(self.settings()))
    }
}
