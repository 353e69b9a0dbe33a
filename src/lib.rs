//! Relish - a review grid server with an `=AI()` cell formula
//!
//! This library backs a spreadsheet-like grid of restaurant reviews with a
//! SQLite store and a narrow formula proxy that forwards `=AI(...)` cell
//! prompts to a hosted text-completion provider.
//!
//! # Features
//!
//! - REST endpoints for the grid store (find-all, create, update, delete)
//! - `=AI()` formula proxy with deployment-wide generation defaults
//! - JSON Schema pre-flight validation of grid write batches
//! - JSON seeding of example review data
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use relish::ai::{FormulaProxy, FormulaRequest, GenerationDefaults, OpenAiProvider, ProviderConfig};
//!
//! # async fn demo() -> relish::RelishResult<()> {
//! let provider = OpenAiProvider::new(ProviderConfig::from_env())?;
//! let proxy = FormulaProxy::new(Arc::new(provider), GenerationDefaults::default());
//!
//! let outcome = proxy
//!     .evaluate(FormulaRequest {
//!         prompt: "Summarize this review in five words".to_string(),
//!         temperature: None,
//!         max_tokens: None,
//!     })
//!     .await?;
//!
//! println!("{}", outcome.into_text());
//! # Ok(())
//! # }
//! ```

pub mod ai;
pub mod api;
pub mod cli;
pub mod error;
pub mod store;
pub mod types;
pub mod validate;

// Re-export commonly used types
pub use error::{RelishError, RelishResult};
pub use types::{Review, ReviewFields, ReviewPatch};
