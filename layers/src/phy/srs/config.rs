/// SRS configuration: FAPI UL_CONFIG SRS PDU and its engineering-unit form
/// Based on 3GPP TS 38.211 Section 6.4.1.4 and SCF FAPI 222

use super::SrsError;
use common::types::Rnti;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// SRS PDU as delivered by the MAC in UL_CONFIG.request
///
/// Most fields are codes into 3GPP enumerations rather than values.
/// `num_ant_ports`, `num_symbols` and `num_repetitions` are exponent
/// codes: the value is `2^code` (with `num_symbols = 4` meaning 12).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SrsConfigPdu {
    pub rnti: Rnti,
    pub handle: u32,
    pub bwp_size: u16,
    pub bwp_start: u16,
    /// Numerology index mu
    pub subcarrier_spacing: u8,
    /// 0: normal, 1: extended
    pub cyclic_prefix: u8,
    /// 0 = 1 port, 1 = 2 ports, 2 = 4 ports
    pub num_ant_ports: u8,
    /// 0 = 1 symbol, 1 = 2, 2 = 4, 3 = 8, 4 = 12
    pub num_symbols: u8,
    /// 0 = 1, 1 = 2, 2 = 4
    pub num_repetitions: u8,
    /// l_offset, counted back from the last symbol of the slot
    pub time_start_position: u8,
    /// C_SRS
    pub config_index: u8,
    /// n_ID^SRS
    pub sequence_id: u16,
    /// B_SRS
    pub bandwidth_index: u8,
    /// 0 = comb 2, 1 = comb 4, 2 = comb 8
    pub comb_size: u8,
    /// K_TC overbar
    pub comb_offset: u8,
    /// n_SRS^cs
    pub cyclic_shift: u8,
    /// n_shift
    pub frequency_position: u8,
    /// n_RRC
    pub frequency_shift: u16,
    /// b_hop
    pub frequency_hopping: u8,
    /// 0 = neither, 1 = group hopping, 2 = sequence hopping
    pub group_or_sequence_hopping: u8,
    /// 0 = aperiodic, 1 = semi-persistent, 2 = periodic
    pub resource_type: u8,
    /// Periodicity in slots
    pub t_srs: u16,
    /// Slot offset within the period
    pub t_offset: u16,
}

/// SRS resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum SrsResourceType {
    Aperiodic = 0,
    SemiPersistent = 1,
    Periodic = 2,
}

/// Transmission comb
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum SrsCombSize {
    Comb2 = 0,
    Comb4 = 1,
    Comb8 = 2,
}

impl SrsCombSize {
    /// K_TC, the comb spacing in subcarriers
    pub fn k_tc(&self) -> u8 {
        2 << (*self as u8)
    }
}

/// groupOrSequenceHopping
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum GroupOrSequenceHopping {
    Neither = 0,
    GroupHopping = 1,
    SequenceHopping = 2,
}

/// nrofSRS-Ports code
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum SrsPortsCode {
    One = 0,
    Two = 1,
    Four = 2,
}

impl SrsPortsCode {
    pub fn decode(code: u8) -> Result<Self, SrsError> {
        Self::from_u8(code).ok_or(SrsError::InvalidExponent { field: "num_ant_ports", code })
    }

    /// Number of antenna ports
    pub fn count(&self) -> u8 {
        1 << (*self as u8)
    }
}

/// repetitionFactor code
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum SrsRepetitionCode {
    One = 0,
    Two = 1,
    Four = 2,
}

impl SrsRepetitionCode {
    pub fn decode(code: u8) -> Result<Self, SrsError> {
        Self::from_u8(code).ok_or(SrsError::InvalidExponent { field: "num_repetitions", code })
    }

    /// Repetition factor R
    pub fn count(&self) -> u8 {
        1 << (*self as u8)
    }
}

/// nrofSymbols code
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum SrsSymbolsCode {
    One = 0,
    Two = 1,
    Four = 2,
    Eight = 3,
    Twelve = 4,
}

impl SrsSymbolsCode {
    pub fn decode(code: u8) -> Result<Self, SrsError> {
        Self::from_u8(code).ok_or(SrsError::InvalidExponent { field: "num_symbols", code })
    }

    /// Number of consecutive SRS symbols N_symb^SRS
    pub fn count(&self) -> u8 {
        super::occupancy::NUM_SRS_SYMBOLS[*self as usize]
    }
}

impl SrsConfigPdu {
    pub fn srs_resource_type(&self) -> Option<SrsResourceType> {
        SrsResourceType::from_u8(self.resource_type)
    }

    pub fn srs_comb_size(&self) -> Option<SrsCombSize> {
        SrsCombSize::from_u8(self.comb_size)
    }

    pub fn hopping_mode(&self) -> Option<GroupOrSequenceHopping> {
        GroupOrSequenceHopping::from_u8(self.group_or_sequence_hopping)
    }

    /// Dump the full PDU for offline debugging
    pub fn log_debug(&self, frame: u32, slot: u8) {
        debug!(
            frame,
            slot,
            rnti = %self.rnti,
            handle = self.handle,
            bwp_size = self.bwp_size,
            bwp_start = self.bwp_start,
            subcarrier_spacing = self.subcarrier_spacing,
            cyclic_prefix = self.cyclic_prefix,
            num_ant_ports = self.num_ant_ports,
            num_symbols = self.num_symbols,
            num_repetitions = self.num_repetitions,
            time_start_position = self.time_start_position,
            config_index = self.config_index,
            sequence_id = self.sequence_id,
            bandwidth_index = self.bandwidth_index,
            comb_size = ?self.srs_comb_size(),
            comb_offset = self.comb_offset,
            cyclic_shift = self.cyclic_shift,
            frequency_position = self.frequency_position,
            frequency_shift = self.frequency_shift,
            frequency_hopping = self.frequency_hopping,
            group_or_sequence_hopping = ?self.hopping_mode(),
            resource_type = ?self.srs_resource_type(),
            t_srs = self.t_srs,
            t_offset = self.t_offset,
            "SRS config PDU"
        );
    }
}

/// SRS parameters in 38.211 notation, consumed by the sequence generator
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SrsInfo {
    /// B_SRS
    pub b_srs: u8,
    /// C_SRS
    pub c_srs: u8,
    pub b_hop: u8,
    /// Raw comb size code
    pub comb_size: u8,
    pub k_tc_overbar: u8,
    pub n_srs_cs: u8,
    pub n_id_srs: u16,
    /// Aligns the allocation with the CRB grid in multiples of four
    pub n_shift: u8,
    pub n_rrc: u16,
    pub group_or_sequence_hopping: u8,
    pub l_offset: u8,
    pub t_srs: u16,
    pub t_offset: u16,
    /// Repetition factor R
    pub r: u8,
    /// Number of consecutive OFDM symbols
    pub n_symb_srs: u8,
    /// Number of antenna ports for transmission
    pub n_srs_ports: u8,
    pub resource_type: u8,
}

/// Translate the PDU into `srs_info`
///
/// `srs_info` is left untouched when an exponent code is out of range.
pub fn configure_srs_info(pdu: &SrsConfigPdu, srs_info: &mut SrsInfo) -> Result<(), SrsError> {
    *srs_info = SrsInfo::try_from(pdu)?;
    Ok(())
}

impl TryFrom<&SrsConfigPdu> for SrsInfo {
    type Error = SrsError;

    fn try_from(pdu: &SrsConfigPdu) -> Result<Self, Self::Error> {
        let repetitions = SrsRepetitionCode::decode(pdu.num_repetitions)?;
        let symbols = SrsSymbolsCode::decode(pdu.num_symbols)?;
        let ports = SrsPortsCode::decode(pdu.num_ant_ports)?;

        Ok(Self {
            b_srs: pdu.bandwidth_index,
            c_srs: pdu.config_index,
            b_hop: pdu.frequency_hopping,
            comb_size: pdu.comb_size,
            k_tc_overbar: pdu.comb_offset,
            n_srs_cs: pdu.cyclic_shift,
            n_id_srs: pdu.sequence_id,
            n_shift: pdu.frequency_position,
            n_rrc: pdu.frequency_shift,
            group_or_sequence_hopping: pdu.group_or_sequence_hopping,
            l_offset: pdu.time_start_position,
            t_srs: pdu.t_srs,
            t_offset: pdu.t_offset,
            r: repetitions.count(),
            n_symb_srs: symbols.count(),
            n_srs_ports: ports.count(),
            resource_type: pdu.resource_type,
        })
    }
}
