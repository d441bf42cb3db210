//! Cache Module
//!
//! Pending verification code storage. Keys are derived from a SHA-256 of the
//! code type and recipient so contact addresses never appear as map keys.

pub mod code_store;

pub use code_store::InMemoryCodeStore;
