//! Shared types and utilities for site-sync.
//!
//! This crate provides common functionality used across all site-sync crates:
//! - Path normalization and object-key derivation
//! - Shared constants and error types

pub mod constants;
pub mod error;
pub mod path_utils;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::PathError;
pub use path_utils::{
    lexical_normalize, normalize_prefix, relative_key, to_absolute, to_posix_path,
};
