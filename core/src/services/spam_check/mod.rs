//! Spam check module for registration screening
//!
//! This module provides:
//! - A fail-open spam checker aggregating per-field reputation signals
//! - Parsing of the loosely typed StopForumSpam payload
//! - The `ReputationSource` seam implemented by the infrastructure layer

mod checker;
mod traits;
pub mod wire;

#[cfg(test)]
mod tests;

pub use checker::{SpamChecker, DEFAULT_LOOKUP_TIMEOUT};
pub use traits::{ReputationQuery, ReputationSource};
pub use wire::{parse_response, ReputationReport};
