//! Configuration module for PageSpeed lookups
//!
//! This module provides the `PageSpeedConfig` struct and its builder, with
//! validation, environment overrides and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{ENV_API_KEY, ENV_ENDPOINT, ENV_STRATEGY, PageSpeedConfigBuilder};
pub use types::{PageSpeedConfig, Strategy};
