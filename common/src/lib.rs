//! Common Utilities and Types Library
//!
//! This crate provides shared types used across the UE implementation.

pub mod types;

// Re-export commonly used items
pub use types::*;
