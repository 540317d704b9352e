//! Protocol Stack Layers Library
//!
//! This crate implements the 5G NR UE physical layer procedures according to 3GPP Release 16.

pub mod phy;

use thiserror::Error;

/// Common errors for protocol layers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
