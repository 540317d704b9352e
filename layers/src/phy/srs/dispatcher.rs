//! SRS slot procedure
//!
//! Entry point of the UE SRS transmission for one uplink slot. Runs once per
//! slot, synchronously, and keeps no state between slots apart from the last
//! engineered configuration handed to the generator.

use super::config::{SrsConfigPdu, SrsInfo};
use super::generator::{SrsGenerationRequest, SrsGenerator};
use super::occupancy::{mark_symbols_used, SrsSymbolRange};
use super::SrsError;
use crate::phy::{CyclicPrefix, FrameParms, TxDataF, AMP};
use tracing::{debug, trace, warn};

/// Per-slot SRS input from the UL_CONFIG handling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SrsVars {
    /// SRS scheduled in this slot
    pub active: bool,
    pub config_pdu: SrsConfigPdu,
}

/// Transmit slot being processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UeTxSlot {
    pub frame_tx: u32,
    pub slot_tx: u8,
}

/// Why no SRS went out in a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotTransmittedReason {
    /// No SRS scheduled for the slot
    Inactive,
    /// The generator rejected the configuration
    GenerationFailed,
}

/// Result of the slot procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrsOutcome {
    Transmitted,
    NotTransmitted(NotTransmittedReason),
}

impl SrsOutcome {
    pub fn is_transmitted(&self) -> bool {
        matches!(self, SrsOutcome::Transmitted)
    }
}

/// Whether SRS is scheduled for the slot
pub fn is_active(srs_vars: &SrsVars) -> bool {
    srs_vars.active
}

/// Sample offset of `first_symbol` in a per-port frequency-domain buffer
pub fn compute_symbol_offset(first_symbol: u8, ofdm_symbol_size: usize) -> usize {
    first_symbol as usize * ofdm_symbol_size
}

/// Whether the PDU's numerology codes agree with the carrier
pub fn numerology_matches(pdu: &SrsConfigPdu, frame_parms: &FrameParms) -> bool {
    let cyclic_prefix = match pdu.cyclic_prefix {
        0 => Some(CyclicPrefix::Normal),
        1 => Some(CyclicPrefix::Extended),
        _ => None,
    };
    pdu.subcarrier_spacing == frame_parms.scs.numerology()
        && cyclic_prefix == Some(frame_parms.cyclic_prefix)
}

/// Hand the request to the generator and map its verdict
pub fn dispatch<G: SrsGenerator + ?Sized>(
    generator: &mut G,
    request: SrsGenerationRequest<'_>,
) -> SrsOutcome {
    let (frame, slot, symbol_offset) = (request.frame, request.slot, request.symbol_offset);

    if generator.generate(request) {
        trace!("SRS generated at offset {} ({}.{})", symbol_offset, frame, slot);
        SrsOutcome::Transmitted
    } else {
        warn!("SRS generation failed in {}.{}", frame, slot);
        SrsOutcome::NotTransmitted(NotTransmittedReason::GenerationFailed)
    }
}

/// UE SRS slot processor
pub struct SrsProcessor<G> {
    generator: G,
    srs_info: SrsInfo,
    amplitude: i16,
}

impl<G: SrsGenerator> SrsProcessor<G> {
    /// Create a processor around a sequence generator
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            srs_info: SrsInfo::default(),
            amplitude: AMP,
        }
    }

    /// Override the reference signal amplitude
    pub fn with_amplitude(mut self, amplitude: i16) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Engineered configuration of the last active slot
    pub fn srs_info(&self) -> &SrsInfo {
        &self.srs_info
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Run the SRS procedure for one transmit slot
    ///
    /// Configuration errors are reported before `was_symbol_used` or
    /// `txdata_f` are touched. Once the configuration is valid the SRS
    /// symbols stay marked in `was_symbol_used`, also when generation fails:
    /// the marking reserves the region for the slot.
    pub fn process_slot(
        &mut self,
        tx_slot: &UeTxSlot,
        frame_parms: &FrameParms,
        srs_vars: &SrsVars,
        txdata_f: &mut TxDataF,
        was_symbol_used: &mut [bool],
    ) -> Result<SrsOutcome, SrsError> {
        if !is_active(srs_vars) {
            return Ok(SrsOutcome::NotTransmitted(NotTransmittedReason::Inactive));
        }

        let pdu = &srs_vars.config_pdu;
        pdu.log_debug(tx_slot.frame_tx, tx_slot.slot_tx);

        // The slot geometry comes from the carrier, the PDU codes are informational
        if !numerology_matches(pdu, frame_parms) {
            warn!(
                "SRS PDU numerology (mu={}, cp={}) differs from carrier ({:?}, {:?}) in {}.{}",
                pdu.subcarrier_spacing,
                pdu.cyclic_prefix,
                frame_parms.scs,
                frame_parms.cyclic_prefix,
                tx_slot.frame_tx,
                tx_slot.slot_tx
            );
        }

        let range = SrsSymbolRange::compute(
            frame_parms.symbols_per_slot,
            pdu.time_start_position,
            pdu.num_symbols,
        )?;
        range.check_map(was_symbol_used)?;

        let srs_info = SrsInfo::try_from(pdu)?;
        let symbol_offset = compute_symbol_offset(range.first(), frame_parms.ofdm_symbol_size);
        check_tx_buffer(txdata_f, frame_parms, &srs_info, symbol_offset, range)?;

        mark_symbols_used(was_symbol_used, range)?;
        self.srs_info = srs_info;

        debug!(
            "SRS {}.{}: rnti={} symbols {}..={} ports={} offset={}",
            tx_slot.frame_tx,
            tx_slot.slot_tx,
            pdu.rnti,
            range.first(),
            range.last(),
            self.srs_info.n_srs_ports,
            symbol_offset
        );

        let request = SrsGenerationRequest {
            frame_parms,
            txdata_f,
            symbol_offset,
            bwp_start: pdu.bwp_start,
            srs_info: &self.srs_info,
            amplitude: self.amplitude,
            frame: tx_slot.frame_tx,
            slot: tx_slot.slot_tx,
        };

        Ok(dispatch(&mut self.generator, request))
    }
}

/// The generator writes every SRS symbol on every SRS port
fn check_tx_buffer(
    txdata_f: &TxDataF,
    frame_parms: &FrameParms,
    srs_info: &SrsInfo,
    symbol_offset: usize,
    range: SrsSymbolRange,
) -> Result<(), SrsError> {
    if txdata_f.ofdm_symbol_size() != frame_parms.ofdm_symbol_size {
        return Err(SrsError::TxBufferLayout {
            expected: frame_parms.ofdm_symbol_size,
            actual: txdata_f.ofdm_symbol_size(),
        });
    }

    let required_ports = srs_info.n_srs_ports as usize;
    let len = range.count() as usize * frame_parms.ofdm_symbol_size;
    if !txdata_f.fits(required_ports, symbol_offset, len) {
        return Err(SrsError::TxBufferTooSmall {
            ports: txdata_f.num_ports(),
            samples: txdata_f.samples_per_port(),
            required_ports,
            required_samples: symbol_offset + len,
        });
    }

    Ok(())
}
