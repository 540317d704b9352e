//! SRS sequence generator seam
//!
//! Sequence generation, cyclic shifts and hopping live behind this trait.
//! The slot procedure only decides where and with which parameters the
//! generator writes.

use super::config::SrsInfo;
use crate::phy::{FrameParms, TxDataF};

/// Everything the generator needs to place the SRS of one slot
#[derive(Debug)]
pub struct SrsGenerationRequest<'a> {
    pub frame_parms: &'a FrameParms,
    pub txdata_f: &'a mut TxDataF,
    /// Sample offset of the first SRS symbol in each port's buffer
    pub symbol_offset: usize,
    pub bwp_start: u16,
    pub srs_info: &'a SrsInfo,
    pub amplitude: i16,
    pub frame: u32,
    pub slot: u8,
}

/// SRS waveform generation backend
pub trait SrsGenerator {
    /// Write the SRS into `request.txdata_f`, returning `false` on failure
    fn generate(&mut self, request: SrsGenerationRequest<'_>) -> bool;
}

impl<F> SrsGenerator for F
where
    F: FnMut(SrsGenerationRequest<'_>) -> bool,
{
    fn generate(&mut self, request: SrsGenerationRequest<'_>) -> bool {
        self(request)
    }
}
