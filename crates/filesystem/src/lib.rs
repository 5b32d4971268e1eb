//! File system operations for site-sync.
//!
//! This crate provides the directory enumeration step of a sync run:
//! - `walk()` - All-or-nothing recursive enumeration of regular files
//! - `WalkedFile` - Absolute path plus root-relative key material
//! - `FileSystemError` - Fatal walk failures

pub mod error;
pub mod walker;

// Re-export main types
pub use error::FileSystemError;
pub use walker::{walk, WalkedFile};
