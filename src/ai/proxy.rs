//! The `=AI()` formula proxy
//!
//! Sits between the grid's formula evaluator and the completion provider.
//! Each invocation merges the deployment-wide generation defaults with the
//! caller's overrides, issues exactly one provider call, and folds the
//! outcome into [`FormulaOutcome`] so the caller never has to handle a
//! provider exception of its own.

use std::sync::Arc;

use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::ai::provider::{CompletionCall, CompletionProvider};
use crate::error::{RelishError, RelishResult};

/// Fixed content returned to the caller when the provider call fails.
/// The operator-facing detail goes to the log, never to the grid.
pub const GENERATION_ERROR_MESSAGE: &str = "There was an error generating the AI content";

/// Instruction framing every generation as grid-cell content.
pub const CELL_INSTRUCTIONS: &str = "You are an assistant embedded in a spreadsheet of \
restaurant reviews. Answer with concise plain text that fits in a single grid cell. \
Do not use markdown formatting.";

/// One formula invocation as received from the grid.
///
/// Created fresh per call and discarded once the result is produced;
/// nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormulaRequest {
    pub prompt: String,

    #[serde(default)]
    pub temperature: Option<f64>,

    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Deployment-wide generation defaults, merged with each invocation's
/// overrides. Passing this in explicitly keeps the proxy free of mutable
/// process-global state.
#[derive(Debug, Clone)]
pub struct GenerationDefaults {
    pub instructions: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            instructions: CELL_INSTRUCTIONS.to_string(),
            temperature: 1.0,
            max_output_tokens: 100,
        }
    }
}

/// Result of one formula evaluation. Exactly one variant is ever
/// produced per invocation; the enum makes the
/// one-of-content-or-error invariant structural.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaOutcome {
    Content(String),
    Error(String),
}

impl FormulaOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The text the grid displays, success or not.
    pub fn into_text(self) -> String {
        match self {
            Self::Content(text) | Self::Error(text) => text,
        }
    }
}

/// The formula proxy. Stateless across requests: one provider handle plus
/// the immutable defaults.
pub struct FormulaProxy {
    provider: Arc<dyn CompletionProvider>,
    defaults: GenerationDefaults,
}

impl FormulaProxy {
    pub fn new(provider: Arc<dyn CompletionProvider>, defaults: GenerationDefaults) -> Self {
        Self { provider, defaults }
    }

    /// Evaluate one `=AI()` invocation.
    ///
    /// An empty prompt is rejected before any outbound call. Provider
    /// failures are logged and folded into [`FormulaOutcome::Error`];
    /// they never surface as an `Err` from this method, so the transport
    /// layer always has a well-formed result to return.
    pub async fn evaluate(&self, request: FormulaRequest) -> RelishResult<FormulaOutcome> {
        if request.prompt.trim().is_empty() {
            return Err(RelishError::Validation(
                "prompt must not be empty".to_string(),
            ));
        }

        let call = CompletionCall {
            instructions: self.defaults.instructions.clone(),
            input: request.prompt,
            temperature: request.temperature.unwrap_or(self.defaults.temperature),
            max_output_tokens: request
                .max_tokens
                .unwrap_or(self.defaults.max_output_tokens),
        };

        match self.provider.complete(call).await {
            Ok(text) => Ok(FormulaOutcome::Content(text)),
            Err(err) => {
                let correlation_id = Uuid::new_v4();
                error!(%correlation_id, error = %err, "completion provider call failed");
                Ok(FormulaOutcome::Error(GENERATION_ERROR_MESSAGE.to_string()))
            }
        }
    }
}
