//! 5G NR Frame Parameters
//!
//! Slot-invariant numerology of the uplink carrier according to 3GPP TS 38.211

use crate::LayerError;
use super::CyclicPrefix;
use common::types::{
    SubcarrierSpacing, NR_NUMBER_OF_SYMBOLS_PER_SLOT, NR_NUMBER_OF_SYMBOLS_PER_SLOT_EXT_CP,
};
use tracing::debug;

/// Subcarriers per resource block
pub const NR_NB_SC_PER_RB: u16 = 12;

/// Maximum transmission bandwidth in RBs (TS 38.101)
pub const NR_MAX_NB_RB: u16 = 275;

/// FFT sizes supported by the frequency-domain grid
const SUPPORTED_FFT_SIZES: [usize; 6] = [128, 256, 512, 1024, 2048, 4096];

/// Frame parameters of the uplink carrier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameParms {
    /// Subcarrier spacing
    pub scs: SubcarrierSpacing,
    /// Cyclic prefix type
    pub cyclic_prefix: CyclicPrefix,
    /// Number of OFDM symbols per slot
    pub symbols_per_slot: u8,
    /// Number of slots per 10 ms frame
    pub slots_per_frame: u16,
    /// OFDM symbol size in subcarriers (FFT size)
    pub ofdm_symbol_size: usize,
    /// Uplink bandwidth in resource blocks
    pub n_rb_ul: u16,
    /// Index of the first occupied subcarrier in the FFT grid
    pub first_carrier_offset: usize,
    /// Number of transmit antennas
    pub nb_antennas_tx: u8,
}

impl FrameParms {
    /// Derive frame parameters from the carrier numerology
    pub fn new(
        scs: SubcarrierSpacing,
        cyclic_prefix: CyclicPrefix,
        n_rb_ul: u16,
        nb_antennas_tx: u8,
    ) -> Result<Self, LayerError> {
        let ofdm_symbol_size = calculate_ofdm_symbol_size(n_rb_ul)?;
        Self::with_ofdm_symbol_size(scs, cyclic_prefix, n_rb_ul, nb_antennas_tx, ofdm_symbol_size)
    }

    /// Frame parameters with an explicit FFT size (e.g. 3/4 sampling front-ends)
    pub fn with_ofdm_symbol_size(
        scs: SubcarrierSpacing,
        cyclic_prefix: CyclicPrefix,
        n_rb_ul: u16,
        nb_antennas_tx: u8,
        ofdm_symbol_size: usize,
    ) -> Result<Self, LayerError> {
        // Extended CP is only defined for 60 kHz
        if cyclic_prefix == CyclicPrefix::Extended && scs != SubcarrierSpacing::Scs60 {
            return Err(LayerError::InvalidConfiguration(format!(
                "Extended cyclic prefix is not defined for {:?}",
                scs
            )));
        }

        if n_rb_ul == 0 || n_rb_ul > NR_MAX_NB_RB {
            return Err(LayerError::InvalidConfiguration(format!(
                "Invalid uplink bandwidth: {} RBs",
                n_rb_ul
            )));
        }

        let occupied = (n_rb_ul * NR_NB_SC_PER_RB) as usize;
        if ofdm_symbol_size < occupied {
            return Err(LayerError::InvalidConfiguration(format!(
                "OFDM symbol size {} cannot hold {} subcarriers",
                ofdm_symbol_size, occupied
            )));
        }

        if nb_antennas_tx == 0 {
            return Err(LayerError::InvalidConfiguration(
                "At least one transmit antenna is required".to_string(),
            ));
        }

        let symbols_per_slot = match cyclic_prefix {
            CyclicPrefix::Normal => NR_NUMBER_OF_SYMBOLS_PER_SLOT,
            CyclicPrefix::Extended => NR_NUMBER_OF_SYMBOLS_PER_SLOT_EXT_CP,
        };

        // Occupied band is centered on DC, lower half wraps to the top of the FFT
        let first_carrier_offset = ofdm_symbol_size - occupied / 2;

        debug!(
            "Frame parameters: scs={:?}, cp={:?}, N_RB_UL={}, fft={}, first_carrier_offset={}",
            scs, cyclic_prefix, n_rb_ul, ofdm_symbol_size, first_carrier_offset
        );

        Ok(Self {
            scs,
            cyclic_prefix,
            symbols_per_slot,
            slots_per_frame: scs.slots_per_frame(),
            ofdm_symbol_size,
            n_rb_ul,
            first_carrier_offset,
            nb_antennas_tx,
        })
    }

    /// Number of frequency-domain samples of one slot on one antenna port
    pub fn samples_per_slot(&self) -> usize {
        self.symbols_per_slot as usize * self.ofdm_symbol_size
    }

    /// Absolute slot index within the frame sequence, used for periodic occasions
    pub fn absolute_slot(&self, frame: u32, slot: u8) -> u64 {
        frame as u64 * self.slots_per_frame as u64 + slot as u64
    }
}

/// Smallest supported FFT size that fits the occupied subcarriers
pub fn calculate_ofdm_symbol_size(n_rb: u16) -> Result<usize, LayerError> {
    let occupied = n_rb as usize * NR_NB_SC_PER_RB as usize;

    SUPPORTED_FFT_SIZES
        .iter()
        .copied()
        .find(|&size| size >= occupied && occupied > 0)
        .ok_or_else(|| {
            LayerError::InvalidConfiguration(format!("No FFT size for {} RBs", n_rb))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ofdm_symbol_size() {
        assert_eq!(calculate_ofdm_symbol_size(25).unwrap(), 512);
        assert_eq!(calculate_ofdm_symbol_size(52).unwrap(), 1024);
        assert_eq!(calculate_ofdm_symbol_size(106).unwrap(), 2048);
        assert_eq!(calculate_ofdm_symbol_size(273).unwrap(), 4096);
        assert!(calculate_ofdm_symbol_size(0).is_err());
        assert!(calculate_ofdm_symbol_size(400).is_err());
    }

    #[test]
    fn test_frame_parms_normal_cp() {
        let fp = FrameParms::new(SubcarrierSpacing::Scs30, CyclicPrefix::Normal, 106, 1).unwrap();
        assert_eq!(fp.symbols_per_slot, 14);
        assert_eq!(fp.slots_per_frame, 20);
        assert_eq!(fp.ofdm_symbol_size, 2048);
        assert_eq!(fp.first_carrier_offset, 2048 - 636);
        assert_eq!(fp.samples_per_slot(), 14 * 2048);
    }

    #[test]
    fn test_frame_parms_extended_cp() {
        let fp = FrameParms::new(SubcarrierSpacing::Scs60, CyclicPrefix::Extended, 52, 1).unwrap();
        assert_eq!(fp.symbols_per_slot, 12);
        assert_eq!(fp.slots_per_frame, 40);

        // Extended CP requires 60 kHz
        assert!(FrameParms::new(SubcarrierSpacing::Scs15, CyclicPrefix::Extended, 52, 1).is_err());
    }

    #[test]
    fn test_frame_parms_rejects_bad_dimensions() {
        assert!(FrameParms::new(SubcarrierSpacing::Scs15, CyclicPrefix::Normal, 0, 1).is_err());
        assert!(FrameParms::new(SubcarrierSpacing::Scs15, CyclicPrefix::Normal, 52, 0).is_err());
        assert!(FrameParms::with_ofdm_symbol_size(
            SubcarrierSpacing::Scs15,
            CyclicPrefix::Normal,
            106,
            1,
            1024,
        )
        .is_err());

        // 3/4 sampling: 1536 holds 106 RBs
        let fp = FrameParms::with_ofdm_symbol_size(
            SubcarrierSpacing::Scs30,
            CyclicPrefix::Normal,
            106,
            1,
            1536,
        )
        .unwrap();
        assert_eq!(fp.ofdm_symbol_size, 1536);
    }

    #[test]
    fn test_absolute_slot() {
        let fp = FrameParms::new(SubcarrierSpacing::Scs30, CyclicPrefix::Normal, 51, 1).unwrap();
        assert_eq!(fp.absolute_slot(0, 0), 0);
        assert_eq!(fp.absolute_slot(2, 3), 43);
    }
}
