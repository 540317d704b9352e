//! Dry-run SRS generator
//!
//! Stands in for the sequence generator when the driver runs without a
//! signal-processing backend: it accepts every request, logs it and leaves
//! the transmit buffer untouched.

use layers::phy::srs::{SrsGenerationRequest, SrsGenerator};
use tracing::debug;

#[derive(Debug, Default)]
pub struct DryRunGenerator {
    requests: u64,
}

impl DryRunGenerator {
    /// Number of generation requests seen so far
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl SrsGenerator for DryRunGenerator {
    fn generate(&mut self, request: SrsGenerationRequest<'_>) -> bool {
        self.requests += 1;
        debug!(
            "SRS request {}.{}: offset={} bwp_start={} first_carrier={} C_SRS={} B_SRS={} K_TC_overbar={} n_cs={} n_ID={} ports={} symbols={} R={} amp={}",
            request.frame,
            request.slot,
            request.symbol_offset,
            request.bwp_start,
            request.frame_parms.first_carrier_offset,
            request.srs_info.c_srs,
            request.srs_info.b_srs,
            request.srs_info.k_tc_overbar,
            request.srs_info.n_srs_cs,
            request.srs_info.n_id_srs,
            request.srs_info.n_srs_ports,
            request.srs_info.n_symb_srs,
            request.srs_info.r,
            request.amplitude
        );
        true
    }
}
