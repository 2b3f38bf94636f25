//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RunState`: lifecycle of one crawl run (running, budget exhausted, frontier empty, interrupted)
//! - `PageOutcome`: what happened to a single frontier entry

mod page_outcome;
mod run_state;

// Re-export main types
pub use page_outcome::{PageOutcome, PageReport};
pub use run_state::RunState;
