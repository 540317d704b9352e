//! Sounding Reference Signal (SRS) UE procedures
//!
//! Implements the per-slot SRS transmission procedure according to
//! 3GPP TS 38.211 Section 6.4.1.4:
//! - translation of the FAPI SRS PDU into engineering units
//! - SRS symbol occupancy within the slot
//! - dispatch to the SRS sequence generator at the right symbol offset

pub mod config;
pub mod occupancy;
pub mod generator;
pub mod dispatcher;

pub use config::{
    configure_srs_info, GroupOrSequenceHopping, SrsCombSize, SrsConfigPdu, SrsInfo,
    SrsPortsCode, SrsRepetitionCode, SrsResourceType, SrsSymbolsCode,
};
pub use occupancy::{mark_symbols_used, SrsSymbolRange, NUM_SRS_SYMBOLS};
pub use generator::{SrsGenerationRequest, SrsGenerator};
pub use dispatcher::{
    compute_symbol_offset, dispatch, is_active, numerology_matches, NotTransmittedReason,
    SrsOutcome, SrsProcessor, SrsVars, UeTxSlot,
};

use thiserror::Error;

/// Errors raised by the SRS procedure before any shared state is touched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SrsError {
    #[error("Invalid {field} code {code}")]
    InvalidExponent { field: &'static str, code: u8 },

    #[error("SRS symbols [{first}, {first} + {count}) do not fit in a {symbols_per_slot}-symbol slot")]
    SymbolRangeOutOfSlot {
        first: i16,
        count: u8,
        symbols_per_slot: u8,
    },

    #[error("Symbol occupancy map has {len} entries, {required} required")]
    OccupancyMapTooShort { len: usize, required: usize },

    #[error("Transmit buffer has {ports} ports x {samples} samples, {required_ports} x {required_samples} required")]
    TxBufferTooSmall {
        ports: usize,
        samples: usize,
        required_ports: usize,
        required_samples: usize,
    },

    #[error("Transmit buffer symbol size {actual} does not match OFDM symbol size {expected}")]
    TxBufferLayout { expected: usize, actual: usize },
}
