//! Relish HTTP API module
//!
//! REST surface binding the review grid to the store and the `=AI()`
//! formula to the completion proxy. Run with `relish serve`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
