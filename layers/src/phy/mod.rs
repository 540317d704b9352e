//! Physical Layer (PHY) Submodules
//!
//! This module contains the UE-side uplink physical layer procedures
//! according to 3GPP TS 38.211.

pub mod frame_parms;
pub mod tx_buffer;
pub mod srs;

// Re-export commonly used types
pub use frame_parms::FrameParms;
pub use tx_buffer::TxDataF;
pub use srs::{SrsProcessor, SrsOutcome, SrsError};

use serde::{Deserialize, Serialize};

/// Amplitude shift applied to uplink reference signals (Q9 scaling)
pub const AMP_SHIFT: u32 = 9;

/// Reference signal amplitude for 16-bit fixed point samples
pub const AMP: i16 = (1 << AMP_SHIFT) - 1;

/// Cyclic prefix type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclicPrefix {
    #[default]
    Normal,
    Extended,
}
