//! YAML Configuration Structures for the UE SRS driver
//!
//! The `srs` section is the UL_CONFIG SRS PDU the MAC would deliver every
//! SRS occasion; the `cell` section carries the uplink carrier numerology.

use anyhow::anyhow;
use common::types::SubcarrierSpacing;
use layers::phy::srs::{SrsConfigPdu, SrsResourceType};
use layers::phy::{CyclicPrefix, FrameParms};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UeConfig {
    /// Uplink carrier configuration
    pub cell: CellConfig,
    /// SRS PDU
    pub srs: SrsConfigPdu,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

/// Uplink carrier configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CellConfig {
    /// Common subcarrier spacing in kHz
    pub common_scs: u32,
    /// Cyclic prefix ("normal" or "extended")
    #[serde(default)]
    pub cyclic_prefix: CyclicPrefix,
    /// Uplink bandwidth in resource blocks
    pub n_rb_ul: u16,
    /// Number of transmit antennas
    #[serde(default = "default_nb_antennas_tx")]
    pub nb_antennas_tx: u8,
    /// FFT size override, derived from the bandwidth when absent
    #[serde(default)]
    pub ofdm_symbol_size: Option<usize>,
}

fn default_nb_antennas_tx() -> u8 {
    1
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Level applied when neither RUST_LOG nor --log-level is given
    #[serde(default = "default_log_level")]
    pub all_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            all_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl UeConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> anyhow::Result<Self> {
        let config: UeConfig = serde_yaml::from_str(contents)?;
        Ok(config)
    }
}

impl CellConfig {
    /// Build the frame parameters of the uplink carrier
    pub fn frame_parms(&self) -> anyhow::Result<FrameParms> {
        let scs = SubcarrierSpacing::from_u32(self.common_scs)
            .ok_or_else(|| anyhow!("Invalid subcarrier spacing: {} kHz", self.common_scs))?;

        let frame_parms = match self.ofdm_symbol_size {
            Some(size) => FrameParms::with_ofdm_symbol_size(
                scs,
                self.cyclic_prefix,
                self.n_rb_ul,
                self.nb_antennas_tx,
                size,
            )?,
            None => FrameParms::new(scs, self.cyclic_prefix, self.n_rb_ul, self.nb_antennas_tx)?,
        };

        Ok(frame_parms)
    }
}

/// Whether the SRS resource is due in `frame.slot` (TS 38.211 Section 6.4.1.4.4)
///
/// Aperiodic resources have no periodicity; the driver treats them as
/// triggered in every slot.
pub fn is_srs_occasion(pdu: &SrsConfigPdu, frame_parms: &FrameParms, frame: u32, slot: u8) -> bool {
    match pdu.srs_resource_type() {
        Some(SrsResourceType::Aperiodic) => true,
        Some(SrsResourceType::Periodic) | Some(SrsResourceType::SemiPersistent) => {
            if pdu.t_srs == 0 {
                return false;
            }
            let n = frame_parms.absolute_slot(frame, slot) as i64 - pdu.t_offset as i64;
            n.rem_euclid(pdu.t_srs as i64) == 0
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
cell:
  common_scs: 30
  n_rb_ul: 106
srs:
  rnti: 17921
  bwp_size: 106
  num_symbols: 2
  time_start_position: 4
  config_index: 13
  sequence_id: 40
  resource_type: 2
  t_srs: 10
  t_offset: 3
"#;

    #[test]
    fn test_parse_sample() {
        let config = UeConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.cell.common_scs, 30);
        assert_eq!(config.cell.cyclic_prefix, CyclicPrefix::Normal);
        assert_eq!(config.cell.nb_antennas_tx, 1);
        assert_eq!(config.srs.rnti.value(), 17921);
        assert_eq!(config.srs.num_symbols, 2);
        assert_eq!(config.srs.num_ant_ports, 0);
        assert_eq!(config.log.all_level, "info");

        let fp = config.cell.frame_parms().unwrap();
        assert_eq!(fp.ofdm_symbol_size, 2048);
        assert_eq!(fp.slots_per_frame, 20);
    }

    #[test]
    fn test_invalid_scs() {
        let mut config = UeConfig::from_yaml_str(SAMPLE).unwrap();
        config.cell.common_scs = 45;
        assert!(config.cell.frame_parms().is_err());
    }

    #[test]
    fn test_periodic_occasions() {
        let config = UeConfig::from_yaml_str(SAMPLE).unwrap();
        let fp = config.cell.frame_parms().unwrap();

        let occasions: Vec<(u32, u8)> = (0..2u32)
            .flat_map(|frame| (0..20u8).map(move |slot| (frame, slot)))
            .filter(|&(frame, slot)| is_srs_occasion(&config.srs, &fp, frame, slot))
            .collect();
        assert_eq!(occasions, vec![(0, 3), (0, 13), (1, 3), (1, 13)]);
    }

    #[test]
    fn test_aperiodic_and_unknown_resources() {
        let mut config = UeConfig::from_yaml_str(SAMPLE).unwrap();
        let fp = config.cell.frame_parms().unwrap();

        config.srs.resource_type = 0;
        assert!(is_srs_occasion(&config.srs, &fp, 5, 0));

        config.srs.resource_type = 7;
        assert!(!is_srs_occasion(&config.srs, &fp, 5, 3));

        config.srs.resource_type = 2;
        config.srs.t_srs = 0;
        assert!(!is_srs_occasion(&config.srs, &fp, 0, 3));
    }
}
