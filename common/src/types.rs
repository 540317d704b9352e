//! Common Types for the 5G NR UE
//!
//! Defines fundamental types shared between the PHY procedures and the UE driver

use serde::{Deserialize, Serialize};
use num_derive::{FromPrimitive, ToPrimitive};
use std::fmt;

/// Number of OFDM symbols in a slot with normal cyclic prefix
pub const NR_NUMBER_OF_SYMBOLS_PER_SLOT: u8 = 14;

/// Number of OFDM symbols in a slot with extended cyclic prefix
pub const NR_NUMBER_OF_SYMBOLS_PER_SLOT_EXT_CP: u8 = 12;

/// Number of subframes in a 10 ms radio frame
pub const NR_NUMBER_OF_SUBFRAMES_PER_FRAME: u8 = 10;

/// System frame number wraps at 1024
pub const NR_MAX_FRAME_NUMBER: u32 = 1024;

/// Radio Network Temporary Identifier (RNTI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rnti(pub u16);

impl Rnti {
    /// Create a new RNTI
    pub fn new(value: u16) -> Self {
        Self(value)
    }

    /// Get the RNTI value
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Rnti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

/// Subcarrier spacing values in kHz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize, Deserialize)]
pub enum SubcarrierSpacing {
    /// 15 kHz
    Scs15 = 15,
    /// 30 kHz
    Scs30 = 30,
    /// 60 kHz
    Scs60 = 60,
    /// 120 kHz
    Scs120 = 120,
    /// 240 kHz
    Scs240 = 240,
}

impl SubcarrierSpacing {
    /// Map a numerology index (mu, 0..=4) to its subcarrier spacing
    pub fn from_numerology(mu: u8) -> Option<Self> {
        match mu {
            0 => Some(Self::Scs15),
            1 => Some(Self::Scs30),
            2 => Some(Self::Scs60),
            3 => Some(Self::Scs120),
            4 => Some(Self::Scs240),
            _ => None,
        }
    }

    /// Numerology index mu, where SCS = 15 * 2^mu kHz
    pub fn numerology(&self) -> u8 {
        match self {
            Self::Scs15 => 0,
            Self::Scs30 => 1,
            Self::Scs60 => 2,
            Self::Scs120 => 3,
            Self::Scs240 => 4,
        }
    }

    /// Spacing in kHz
    pub fn khz(&self) -> u32 {
        *self as u32
    }

    /// Number of slots per 1 ms subframe
    pub fn slots_per_subframe(&self) -> u8 {
        1 << self.numerology()
    }

    /// Number of slots per 10 ms frame
    pub fn slots_per_frame(&self) -> u16 {
        self.slots_per_subframe() as u16 * NR_NUMBER_OF_SUBFRAMES_PER_FRAME as u16
    }

    /// Slot duration in nanoseconds
    pub fn slot_duration_ns(&self) -> u64 {
        1_000_000 / self.slots_per_subframe() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn test_numerology_mapping() {
        for mu in 0..=4u8 {
            let scs = SubcarrierSpacing::from_numerology(mu).unwrap();
            assert_eq!(scs.numerology(), mu);
            assert_eq!(scs.khz(), 15 << mu);
        }
        assert!(SubcarrierSpacing::from_numerology(5).is_none());
    }

    #[test]
    fn test_slots_per_frame() {
        assert_eq!(SubcarrierSpacing::Scs15.slots_per_frame(), 10);
        assert_eq!(SubcarrierSpacing::Scs30.slots_per_frame(), 20);
        assert_eq!(SubcarrierSpacing::Scs120.slots_per_frame(), 80);
        assert_eq!(SubcarrierSpacing::Scs240.slots_per_frame(), 160);
    }

    #[test]
    fn test_slot_duration() {
        assert_eq!(SubcarrierSpacing::Scs15.slot_duration_ns(), 1_000_000);
        assert_eq!(SubcarrierSpacing::Scs30.slot_duration_ns(), 500_000);
        assert_eq!(SubcarrierSpacing::Scs120.slot_duration_ns(), 125_000);
        assert_eq!(SubcarrierSpacing::Scs240.slot_duration_ns(), 62_500);
    }

    #[test]
    fn test_scs_from_khz() {
        assert_eq!(SubcarrierSpacing::from_u32(30), Some(SubcarrierSpacing::Scs30));
        assert_eq!(SubcarrierSpacing::from_u32(45), None);
    }

    #[test]
    fn test_rnti_display() {
        assert_eq!(Rnti::new(0x4601).to_string(), "0x4601");
    }
}
