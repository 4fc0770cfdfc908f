//! Configuration module for search indexing
//!
//! This module provides the `SearchConfig` struct, its getters and its
//! `with_*` setters, plus JSON loading and validation.

// Sub-modules
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use types::SearchConfig;
