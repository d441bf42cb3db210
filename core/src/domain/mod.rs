//! Domain layer containing the verification policy table and business entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
