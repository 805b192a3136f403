//! Per-request settings.
//!
//! [`RequestConfig`] is an immutable value; build it with
//! [`RequestConfig::builder`], which validates the numeric ranges once so the
//! rest of the pipeline can take them for granted.
//!
//! ```rust
//! use chatterbox_core::config::{ReasoningEffort, RequestConfig};
//!
//! let config = RequestConfig::builder("openai/gpt-oss-120b")
//!     .with_temperature(0.7)
//!     .with_reasoning_effort(ReasoningEffort::High)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_tokens(), 8192);
//! ```
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{ChatterboxError, Result};

pub const DEFAULT_SYSTEM_INSTRUCTIONS: &str = "You are a helpful assistant.";
pub const DEFAULT_TEMPERATURE: f64 = 1.0;
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
pub const MAX_TEMPERATURE: f64 = 2.0;

/// How much effort a reasoning model should spend before answering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningEffort {
    Low,
    #[default]
    Medium,
    High,
}

impl Display for ReasoningEffort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasoningEffort::Low => write!(f, "low"),
            ReasoningEffort::Medium => write!(f, "medium"),
            ReasoningEffort::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    model: String,
    system_instructions: Option<String>,
    temperature: f64,
    max_tokens: u32,
    reasoning_effort: Option<ReasoningEffort>,
}

impl RequestConfig {
    pub fn builder(model: impl Into<String>) -> RequestConfigBuilder {
        RequestConfigBuilder::new(model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_instructions(&self) -> Option<&str> {
        self.system_instructions.as_deref()
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn reasoning_effort(&self) -> Option<ReasoningEffort> {
        self.reasoning_effort
    }
}

/// Builder for [`RequestConfig`].
///
/// Starts from the defaults of the reference chat UI: the stock system
/// instructions, temperature `1.0`, `8192` max tokens and medium effort.
#[derive(Debug, Clone)]
pub struct RequestConfigBuilder {
    model: String,
    system_instructions: Option<String>,
    temperature: f64,
    max_tokens: u32,
    reasoning_effort: Option<ReasoningEffort>,
}

impl RequestConfigBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instructions: Some(DEFAULT_SYSTEM_INSTRUCTIONS.to_owned()),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            reasoning_effort: Some(ReasoningEffort::default()),
        }
    }

    pub fn with_system_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.system_instructions = Some(instructions.into());
        self
    }

    pub fn without_system_instructions(mut self) -> Self {
        self.system_instructions = None;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = Some(effort);
        self
    }

    pub fn without_reasoning_effort(mut self) -> Self {
        self.reasoning_effort = None;
        self
    }

    /// Finalise the builder.
    ///
    /// # Errors
    ///
    /// * [`ChatterboxError::InvalidConfig`] – blank model, temperature
    ///   outside `[0, 2]` or `max_tokens == 0`.
    pub fn build(self) -> Result<RequestConfig> {
        if self.model.trim().is_empty() {
            return Err(ChatterboxError::InvalidConfig(
                "model identifier must not be blank".into(),
            ));
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(ChatterboxError::InvalidConfig(format!(
                "temperature {} is outside [0, {MAX_TEMPERATURE}]",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ChatterboxError::InvalidConfig(
                "max_tokens must be greater than zero".into(),
            ));
        }

        Ok(RequestConfig {
            model: self.model,
            system_instructions: self.system_instructions,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            reasoning_effort: self.reasoning_effort,
        })
    }
}
