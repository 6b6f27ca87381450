//! Configuration for a PDF-to-MCQ run.
//!
//! All behaviour is controlled through [`McqConfig`], built via
//! [`McqConfigBuilder`]. Defaults reproduce the plain interactive tool: a
//! local Ollama `llama3` model, provider-default sampling, no timeout, and
//! output files written next to the input PDF.

use crate::error::McqError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default provider name passed to `ProviderFactory`.
pub const DEFAULT_PROVIDER: &str = "ollama";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama3";

/// Default suffix appended to the input's stem for the extracted text.
pub const DEFAULT_TEXT_SUFFIX: &str = "_extracted.txt";

/// Default suffix appended to the input's stem for the questions document.
pub const DEFAULT_MCQ_SUFFIX: &str = "_mcqs.docx";

/// Default level-1 heading of the questions document.
pub const DEFAULT_HEADING: &str = "Multiple Choice Questions";

/// Configuration for a single pipeline run.
///
/// # Example
/// ```rust
/// use pdf_mcq::McqConfig;
///
/// let config = McqConfig::builder()
///     .model("llama3.1")
///     .api_timeout_secs(300)
///     .build()
///     .unwrap();
/// assert_eq!(config.provider_name, "ollama");
/// ```
#[derive(Clone)]
pub struct McqConfig {
    /// Model identifier handed to the provider. Default: `llama3`.
    pub model: String,

    /// Provider name (e.g. `"ollama"`, `"openai"`). Default: `ollama`.
    pub provider_name: String,

    /// Pre-constructed provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. `None` keeps the provider default.
    pub temperature: Option<f32>,

    /// Output token cap. `None` keeps the provider default.
    pub max_tokens: Option<usize>,

    /// Timeout for the model call in seconds. `None` waits indefinitely.
    pub api_timeout_secs: Option<u64>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Directory for both artifacts. `None` writes next to the input.
    pub output_dir: Option<PathBuf>,

    /// Suffix of the extracted-text file. Default: `_extracted.txt`.
    pub text_suffix: String,

    /// Suffix of the questions document. Default: `_mcqs.docx`.
    pub mcq_suffix: String,

    /// Heading written at the top of the questions document.
    pub heading: String,

    /// Stage-level progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for McqConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            provider_name: DEFAULT_PROVIDER.to_string(),
            provider: None,
            temperature: None,
            max_tokens: None,
            api_timeout_secs: None,
            password: None,
            output_dir: None,
            text_suffix: DEFAULT_TEXT_SUFFIX.to_string(),
            mcq_suffix: DEFAULT_MCQ_SUFFIX.to_string(),
            heading: DEFAULT_HEADING.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for McqConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McqConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("output_dir", &self.output_dir)
            .field("text_suffix", &self.text_suffix)
            .field("mcq_suffix", &self.mcq_suffix)
            .field("heading", &self.heading)
            .finish()
    }
}

impl McqConfig {
    /// Create a new builder for `McqConfig`.
    pub fn builder() -> McqConfigBuilder {
        McqConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`McqConfig`].
pub struct McqConfigBuilder {
    config: McqConfig,
}

impl McqConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = Some(secs);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn text_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.text_suffix = suffix.into();
        self
    }

    pub fn mcq_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.mcq_suffix = suffix.into();
        self
    }

    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.config.heading = heading.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<McqConfig, McqError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(McqError::InvalidConfig("Model must not be empty".into()));
        }
        if c.provider.is_none() && c.provider_name.trim().is_empty() {
            return Err(McqError::InvalidConfig(
                "Provider name must not be empty".into(),
            ));
        }
        if let Some(t) = c.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(McqError::InvalidConfig(format!(
                    "Temperature must be 0.0–2.0, got {t}"
                )));
            }
        }
        if c.max_tokens == Some(0) {
            return Err(McqError::InvalidConfig("Max tokens must be ≥ 1".into()));
        }
        if c.api_timeout_secs == Some(0) {
            return Err(McqError::InvalidConfig("API timeout must be ≥ 1s".into()));
        }
        if c.text_suffix.is_empty() {
            return Err(McqError::InvalidConfig(
                "Text suffix must not be empty".into(),
            ));
        }
        if !c.mcq_suffix.to_ascii_lowercase().ends_with(".docx") {
            return Err(McqError::InvalidConfig(format!(
                "MCQ suffix must end with .docx, got '{}'",
                c.mcq_suffix
            )));
        }
        if c.text_suffix == c.mcq_suffix {
            return Err(McqError::InvalidConfig(
                "Text and MCQ suffixes must differ".into(),
            ));
        }
        Ok(self.config)
    }
}

impl fmt::Debug for McqConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McqConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_interactive_tool() {
        let c = McqConfig::default();
        assert_eq!(c.model, "llama3");
        assert_eq!(c.provider_name, "ollama");
        assert_eq!(c.text_suffix, "_extracted.txt");
        assert_eq!(c.mcq_suffix, "_mcqs.docx");
        assert_eq!(c.heading, "Multiple Choice Questions");
        assert!(c.api_timeout_secs.is_none());
        assert!(c.temperature.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let c = McqConfig::builder()
            .model("mistral")
            .provider_name("openai")
            .temperature(0.3)
            .max_tokens(2048)
            .output_dir("/tmp/out")
            .heading("Quiz")
            .build()
            .expect("valid config");
        assert_eq!(c.model, "mistral");
        assert_eq!(c.provider_name, "openai");
        assert_eq!(c.temperature, Some(0.3));
        assert_eq!(c.max_tokens, Some(2048));
        assert_eq!(c.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(c.heading, "Quiz");
    }

    #[test]
    fn builder_rejects_bad_values() {
        assert!(McqConfig::builder().temperature(3.0).build().is_err());
        assert!(McqConfig::builder().api_timeout_secs(0).build().is_err());
        assert!(McqConfig::builder().max_tokens(0).build().is_err());
        assert!(McqConfig::builder().mcq_suffix("_q.txt").build().is_err());
        assert!(McqConfig::builder().text_suffix("").build().is_err());
        assert!(McqConfig::builder().model("  ").build().is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let c = McqConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"), "got: {dbg}");
        assert!(dbg.contains("<redacted>"));
    }
}
