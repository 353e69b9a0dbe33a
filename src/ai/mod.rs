//! The `=AI()` formula proxy and its completion provider client.
//!
//! The proxy receives one prompt + generation parameters per invocation,
//! issues exactly one outbound call to the configured provider, and
//! normalizes success or failure into a shape the grid can always render.

pub mod provider;
pub mod proxy;

pub use provider::{
    CompletionCall, CompletionProvider, OpenAiProvider, ProviderConfig, ProviderError,
};
pub use proxy::{
    FormulaOutcome, FormulaProxy, FormulaRequest, GenerationDefaults, GENERATION_ERROR_MESSAGE,
};
