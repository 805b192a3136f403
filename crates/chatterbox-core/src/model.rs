//! Model identifiers and the per-model table of optional request fields.
//!
//! Different model families accept different knobs: the flagship reasoning
//! model takes a `reasoning_effort`, the hidden-reasoning models want
//! `reasoning_format = "hidden"`, everything else takes neither. That
//! knowledge lives in a [`ModelExtrasTable`] rather than in branches, so a new
//! model is one more row:
//!
//! ```rust
//! use chatterbox_core::model::{ExtraField, ModelExtrasTable, ReasoningFormat};
//!
//! let table = ModelExtrasTable::default()
//!     .with_model("my-org/thinker-7b", [ExtraField::ReasoningFormat(ReasoningFormat::Hidden)]);
//!
//! assert_eq!(table.fields_for("my-org/thinker-7b").len(), 1);
//! assert!(table.fields_for("unknown").is_empty());
//! ```
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{ReasoningEffort, RequestConfig};

pub const GPT_OSS_120B: &str = "openai/gpt-oss-120b";
pub const QWEN3_32B: &str = "qwen/qwen3-32b";
pub const DEEPSEEK_R1_DISTILL_LLAMA_70B: &str = "deepseek-r1-distill-llama-70b";
pub const LLAMA_3_3_70B_VERSATILE: &str = "llama-3.3-70b-versatile";

/// How a provider should surface the model's reasoning tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningFormat {
    Hidden,
    Raw,
    Parsed,
}

/// An optional request field a model family expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtraField {
    /// Forward [`RequestConfig::reasoning_effort`] when it is set.
    ReasoningEffort,
    /// Fixed nucleus-sampling value.
    TopP(f64),
    ReasoningFormat(ReasoningFormat),
}

/// Optional fields resolved for one concrete request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestExtras {
    pub reasoning_effort: Option<ReasoningEffort>,
    pub top_p: Option<f64>,
    pub reasoning_format: Option<ReasoningFormat>,
}

/// Mapping from model identifier to the extra fields sent with it.
///
/// Unknown models get no extra fields.
#[derive(Debug, Clone)]
pub struct ModelExtrasTable {
    entries: HashMap<String, Vec<ExtraField>>,
}

impl Default for ModelExtrasTable {
    fn default() -> Self {
        Self::empty()
            .with_model(
                GPT_OSS_120B,
                [ExtraField::ReasoningEffort, ExtraField::TopP(1.0)],
            )
            .with_model(
                QWEN3_32B,
                [ExtraField::ReasoningFormat(ReasoningFormat::Hidden)],
            )
            .with_model(
                DEEPSEEK_R1_DISTILL_LLAMA_70B,
                [ExtraField::ReasoningFormat(ReasoningFormat::Hidden)],
            )
    }
}

impl ModelExtrasTable {
    /// A table without any entries.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register (or replace) the extra fields for `model`.
    pub fn with_model(
        mut self,
        model: impl Into<String>,
        fields: impl IntoIterator<Item = ExtraField>,
    ) -> Self {
        self.entries
            .insert(model.into(), fields.into_iter().collect());
        self
    }

    pub fn fields_for(&self, model: &str) -> &[ExtraField] {
        self.entries.get(model).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve the table row for `config.model()` against the config values.
    pub fn resolve(&self, config: &RequestConfig) -> RequestExtras {
        let mut extras = RequestExtras::default();

        for field in self.fields_for(config.model()) {
            match *field {
                ExtraField::ReasoningEffort => extras.reasoning_effort = config.reasoning_effort(),
                ExtraField::TopP(top_p) => extras.top_p = Some(top_p),
                ExtraField::ReasoningFormat(format) => extras.reasoning_format = Some(format),
            }
        }

        extras
    }
}
