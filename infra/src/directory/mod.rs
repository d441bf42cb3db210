//! Directory Module
//!
//! Account existence lookups behind
//! `nb_core::services::verification::UserDirectory`.

pub mod memory_directory;

pub use memory_directory::InMemoryUserDirectory;
