//! concierge-core
//!
//! Shared configuration, error types, domain records and collaborator traits
//! for the assistant crates.

pub mod config;
pub mod data_processor;
pub mod error;
pub mod memory;
pub mod traits;
pub mod types;
