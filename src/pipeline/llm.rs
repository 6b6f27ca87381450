//! Question generation: one prompt, one model call, raw response back.
//!
//! The model is reached through the [`QuestionModel`] seam so the orchestrator
//! can be driven by anything that turns a prompt into text. The production
//! implementation, [`LlmModel`], wraps an `edgequake_llm` provider (Ollama by
//! default). There is no retry loop and no format check: a
//! malformed answer is passed through and persisted as-is.

use crate::config::McqConfig;
use crate::error::McqError;
use crate::prompts::build_mcq_prompt;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

/// A model's answer to a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelReply {
    /// Response text, unmodified.
    pub content: String,
    /// Prompt tokens reported by the provider.
    pub prompt_tokens: usize,
    /// Completion tokens reported by the provider.
    pub completion_tokens: usize,
}

impl ModelReply {
    /// A reply carrying only text, for models that do not report usage.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// Anything that can answer a single prompt.
#[allow(async_fn_in_trait)]
pub trait QuestionModel {
    /// Human-readable model identifier used in diagnostics.
    fn name(&self) -> &str;

    /// Send `prompt` and wait for the full response.
    async fn invoke(&self, prompt: &str) -> Result<ModelReply, McqError>;
}

/// [`QuestionModel`] backed by an `edgequake_llm` provider.
pub struct LlmModel {
    provider: Arc<dyn LLMProvider>,
    model: String,
    options: CompletionOptions,
    timeout_secs: Option<u64>,
}

impl LlmModel {
    /// Wrap `provider`, taking sampling options and timeout from `config`.
    pub fn new(provider: Arc<dyn LLMProvider>, config: &McqConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            options: build_options(config),
            timeout_secs: config.api_timeout_secs,
        }
    }
}

impl std::fmt::Debug for LlmModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmModel")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl QuestionModel for LlmModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, prompt: &str) -> Result<ModelReply, McqError> {
        let messages = vec![ChatMessage::user(prompt)];
        let call = self.provider.chat(&messages, Some(&self.options));

        let result = match self.timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), call)
                .await
                .map_err(|_| McqError::ApiTimeout { secs })?,
            None => call.await,
        };

        let response = result.map_err(|e| McqError::LlmApiError {
            model: self.model.clone(),
            message: format!("{}", e),
        })?;

        Ok(ModelReply {
            content: response.content,
            prompt_tokens: response.prompt_tokens,
            completion_tokens: response.completion_tokens,
        })
    }
}

/// Generate questions for `text` with `model`.
///
/// Builds the fixed prompt, calls the model once, and returns the reply
/// untouched. An empty reply is an error because there would be nothing to
/// persist.
pub async fn generate_mcqs<M: QuestionModel>(
    model: &M,
    text: &str,
) -> Result<ModelReply, McqError> {
    let prompt = build_mcq_prompt(text);
    debug!("Prompt: {} chars", prompt.len());

    let start = Instant::now();
    let reply = model.invoke(&prompt).await?;
    info!(
        "{}: {} input tokens, {} output tokens, {:?}",
        model.name(),
        reply.prompt_tokens,
        reply.completion_tokens,
        start.elapsed()
    );

    if reply.content.is_empty() {
        return Err(McqError::EmptyResponse);
    }
    Ok(reply)
}

/// Build `CompletionOptions` from the config; unset fields keep provider
/// defaults.
fn build_options(config: &McqConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct EchoModel {
        reply: String,
        prompts: RefCell<Vec<String>>,
    }

    impl QuestionModel for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        async fn invoke(&self, prompt: &str) -> Result<ModelReply, McqError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            Ok(ModelReply::text(self.reply.clone()))
        }
    }

    struct DownModel;

    impl QuestionModel for DownModel {
        fn name(&self) -> &str {
            "down"
        }

        async fn invoke(&self, _prompt: &str) -> Result<ModelReply, McqError> {
            Err(McqError::LlmApiError {
                model: "down".into(),
                message: "connection refused".into(),
            })
        }
    }

    #[test]
    fn build_options_defaults() {
        let opts = build_options(&McqConfig::default());
        assert_eq!(opts.temperature, None);
        assert_eq!(opts.max_tokens, None);
    }

    #[test]
    fn build_options_forwards_overrides() {
        let config = McqConfig::builder()
            .temperature(0.2)
            .max_tokens(1024)
            .build()
            .unwrap();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.2));
        assert_eq!(opts.max_tokens, Some(1024));
    }

    #[test]
    fn response_is_passed_through_unchanged() {
        let raw = "  Q1. Only one question\nA) a\n\n  ";
        let model = EchoModel {
            reply: raw.to_string(),
            prompts: RefCell::new(Vec::new()),
        };
        let reply = tokio_test::block_on(generate_mcqs(&model, "Some text")).unwrap();
        assert_eq!(reply.content, raw);

        let prompts = model.prompts.borrow();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], build_mcq_prompt("Some text"));
    }

    #[test]
    fn empty_response_is_an_error() {
        let model = EchoModel {
            reply: String::new(),
            prompts: RefCell::new(Vec::new()),
        };
        let err = tokio_test::block_on(generate_mcqs(&model, "text")).unwrap_err();
        assert!(matches!(err, McqError::EmptyResponse));
    }

    #[test]
    fn model_error_propagates() {
        let err = tokio_test::block_on(generate_mcqs(&DownModel, "text")).unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
