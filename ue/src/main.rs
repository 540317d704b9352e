//! Albor Space 5G NR UE SRS driver
//!
//! Runs the UE uplink SRS slot procedure over a number of frames for the
//! SRS resource described in the configuration file.

mod config;
mod generator;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use std::time::Duration;

use common::types::NR_MAX_FRAME_NUMBER;
use config::{is_srs_occasion, UeConfig};
use generator::DryRunGenerator;
use layers::phy::srs::{NotTransmittedReason, SrsOutcome, SrsProcessor, SrsVars, UeTxSlot};
use layers::phy::{FrameParms, TxDataF};

/// Albor Space 5G NR UE SRS driver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "ue_srs.yml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Number of frames to process
    #[arg(long, default_value = "1")]
    frames: u32,

    /// First system frame number (0..1023)
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(..NR_MAX_FRAME_NUMBER as i64))]
    start_frame: u32,

    /// Pace slots at the numerology's slot duration
    #[arg(long)]
    realtime: bool,
}

/// Per-run SRS counters
#[derive(Debug, Default)]
struct SrsStats {
    slots: u64,
    transmitted: u64,
    inactive: u64,
    generation_failed: u64,
    rejected: u64,
}

impl SrsStats {
    fn record(&mut self, outcome: SrsOutcome) {
        match outcome {
            SrsOutcome::Transmitted => self.transmitted += 1,
            SrsOutcome::NotTransmitted(NotTransmittedReason::Inactive) => self.inactive += 1,
            SrsOutcome::NotTransmitted(NotTransmittedReason::GenerationFailed) => {
                self.generation_failed += 1
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = UeConfig::from_yaml_file(&args.config)?;

    // Initialize logging
    let level = args.log_level.clone().unwrap_or_else(|| config.log.all_level.clone());
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&level));

    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    info!("Starting Albor Space 5G NR UE SRS driver");
    info!("Configuration file: {}", args.config);

    let frame_parms = config.cell.frame_parms()?;

    info!("Uplink carrier:");
    info!("  Subcarrier spacing: {:?}", frame_parms.scs);
    info!("  Cyclic prefix: {:?}", frame_parms.cyclic_prefix);
    info!("  N_RB_UL: {}", frame_parms.n_rb_ul);
    info!("  OFDM symbol size: {}", frame_parms.ofdm_symbol_size);
    info!("  First carrier offset: {}", frame_parms.first_carrier_offset);
    info!("  Symbols per slot: {}", frame_parms.symbols_per_slot);
    info!("SRS resource:");
    info!("  RNTI: {}", config.srs.rnti);
    info!("  Resource type: {:?}", config.srs.srs_resource_type());
    info!("  Periodicity: {} slots, offset {}", config.srs.t_srs, config.srs.t_offset);

    let mut processor = SrsProcessor::new(DryRunGenerator::default());
    let slot_loop = run_slots(&args, &config, &frame_parms, &mut processor);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        result = slot_loop => {
            let stats = result?;
            info!("SRS statistics:");
            info!("  Slots processed: {}", stats.slots);
            info!("  Transmitted: {}", stats.transmitted);
            info!("  Inactive: {}", stats.inactive);
            info!("  Generation failed: {}", stats.generation_failed);
            info!("  Rejected configuration: {}", stats.rejected);
        }
    }

    info!("UE SRS driver shutdown complete");
    Ok(())
}

/// Run the SRS procedure for every slot of the requested frames
async fn run_slots(
    args: &Args,
    config: &UeConfig,
    frame_parms: &FrameParms,
    processor: &mut SrsProcessor<DryRunGenerator>,
) -> Result<SrsStats> {
    let mut txdata_f = TxDataF::new(frame_parms.nb_antennas_tx as usize, frame_parms)?;
    let mut srs_vars = SrsVars {
        active: false,
        config_pdu: config.srs.clone(),
    };

    let mut interval = args.realtime.then(|| {
        tokio::time::interval(Duration::from_nanos(frame_parms.scs.slot_duration_ns()))
    });

    let mut stats = SrsStats::default();

    for n in 0..args.frames {
        let frame = system_frame(args.start_frame, n);

        for slot in 0..frame_parms.slots_per_frame as u8 {
            if let Some(interval) = interval.as_mut() {
                interval.tick().await;
            }

            txdata_f.clear();
            let mut was_symbol_used = vec![false; frame_parms.symbols_per_slot as usize];
            srs_vars.active = is_srs_occasion(&srs_vars.config_pdu, frame_parms, frame, slot);

            let tx_slot = UeTxSlot { frame_tx: frame, slot_tx: slot };
            stats.slots += 1;

            match processor.process_slot(&tx_slot, frame_parms, &srs_vars, &mut txdata_f, &mut was_symbol_used) {
                Ok(outcome) => {
                    if outcome.is_transmitted() {
                        info!(
                            "SRS transmitted in {}.{}, symbols {:?}",
                            frame,
                            slot,
                            used_symbols(&was_symbol_used)
                        );
                    }
                    stats.record(outcome);
                }
                Err(e) => {
                    error!("SRS configuration rejected in {}.{}: {}", frame, slot, e);
                    stats.rejected += 1;
                }
            }
        }
    }

    if processor.generator().requests() != stats.transmitted + stats.generation_failed {
        warn!(
            "Generator saw {} requests for {} dispatched slots",
            processor.generator().requests(),
            stats.transmitted + stats.generation_failed
        );
    }

    Ok(stats)
}

/// System frame number `n` frames after `start_frame`, wrapped at 1024
fn system_frame(start_frame: u32, n: u32) -> u32 {
    (start_frame % NR_MAX_FRAME_NUMBER + n % NR_MAX_FRAME_NUMBER) % NR_MAX_FRAME_NUMBER
}

fn used_symbols(was_symbol_used: &[bool]) -> Vec<usize> {
    was_symbol_used
        .iter()
        .enumerate()
        .filter_map(|(symbol, &used)| used.then_some(symbol))
        .collect()
}
