//! Frequency-domain transmit buffer
//!
//! Holds one slot of frequency-domain samples per antenna port, laid out
//! symbol after symbol, each symbol `ofdm_symbol_size` samples long.

use crate::LayerError;
use super::FrameParms;
use ndarray::{s, Array2, ArrayView1, ArrayViewMut1};
use num_complex::Complex;
use tracing::{debug, warn};

/// 16-bit fixed point complex sample
pub type C16 = Complex<i16>;

/// Per-port frequency-domain slot buffer: [port, sample]
#[derive(Debug, Clone)]
pub struct TxDataF {
    data: Array2<C16>,
    ofdm_symbol_size: usize,
    symbols_per_slot: u8,
}

impl TxDataF {
    /// Allocate a zeroed buffer for `num_ports` antenna ports
    pub fn new(num_ports: usize, frame_parms: &FrameParms) -> Result<Self, LayerError> {
        Self::with_dimensions(num_ports, frame_parms.symbols_per_slot, frame_parms.ofdm_symbol_size)
    }

    /// Allocate a zeroed buffer with explicit dimensions
    pub fn with_dimensions(
        num_ports: usize,
        symbols_per_slot: u8,
        ofdm_symbol_size: usize,
    ) -> Result<Self, LayerError> {
        if num_ports == 0 || symbols_per_slot == 0 || ofdm_symbol_size == 0 {
            return Err(LayerError::InvalidConfiguration(format!(
                "Invalid transmit buffer dimensions: ports={}, symbols={}, fft={}",
                num_ports, symbols_per_slot, ofdm_symbol_size
            )));
        }

        let samples = symbols_per_slot as usize * ofdm_symbol_size;
        debug!("Creating txdataF with dimensions: ({}, {})", num_ports, samples);

        Ok(Self {
            data: Array2::zeros((num_ports, samples)),
            ofdm_symbol_size,
            symbols_per_slot,
        })
    }

    /// Number of antenna ports
    pub fn num_ports(&self) -> usize {
        self.data.nrows()
    }

    /// Number of samples per antenna port
    pub fn samples_per_port(&self) -> usize {
        self.data.ncols()
    }

    pub fn ofdm_symbol_size(&self) -> usize {
        self.ofdm_symbol_size
    }

    /// Zero the whole slot on every port
    pub fn clear(&mut self) {
        self.data.fill(C16::new(0, 0));
    }

    /// Samples of one antenna port
    pub fn port(&self, port: usize) -> Option<ArrayView1<'_, C16>> {
        (port < self.num_ports()).then(|| self.data.row(port))
    }

    /// Samples of one OFDM symbol on one port
    pub fn symbol(&self, port: usize, symbol: u8) -> Option<ArrayView1<'_, C16>> {
        if port >= self.num_ports() || symbol >= self.symbols_per_slot {
            return None;
        }
        let start = symbol as usize * self.ofdm_symbol_size;
        Some(self.data.slice(s![port, start..start + self.ofdm_symbol_size]))
    }

    /// Mutable samples of one OFDM symbol on one port
    pub fn symbol_mut(&mut self, port: usize, symbol: u8) -> Option<ArrayViewMut1<'_, C16>> {
        if port >= self.num_ports() || symbol >= self.symbols_per_slot {
            warn!(
                "Attempting to access invalid port/symbol {}/{} (ports: {}, symbols: {})",
                port,
                symbol,
                self.num_ports(),
                self.symbols_per_slot
            );
            return None;
        }
        let start = symbol as usize * self.ofdm_symbol_size;
        Some(self.data.slice_mut(s![port, start..start + self.ofdm_symbol_size]))
    }

    /// Mutable window of `len` samples starting at `offset` on one port
    pub fn region_mut(&mut self, port: usize, offset: usize, len: usize) -> Option<ArrayViewMut1<'_, C16>> {
        if !self.fits(port + 1, offset, len) {
            return None;
        }
        Some(self.data.slice_mut(s![port, offset..offset + len]))
    }

    /// Whether `num_ports` ports each have room for `len` samples from `offset`
    pub fn fits(&self, num_ports: usize, offset: usize, len: usize) -> bool {
        num_ports <= self.num_ports()
            && offset
                .checked_add(len)
                .is_some_and(|end| end <= self.samples_per_port())
    }

    /// Whether every sample of the symbol is zero on every port
    pub fn is_symbol_empty(&self, symbol: u8) -> bool {
        (0..self.num_ports()).all(|port| {
            self.symbol(port, symbol)
                .map(|samples| samples.iter().all(|c| c.re == 0 && c.im == 0))
                .unwrap_or(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phy::CyclicPrefix;
    use common::types::SubcarrierSpacing;

    #[test]
    fn test_tx_buffer_creation() {
        let fp = FrameParms::new(SubcarrierSpacing::Scs30, CyclicPrefix::Normal, 106, 2).unwrap();
        let buf = TxDataF::new(2, &fp).unwrap();

        assert_eq!(buf.num_ports(), 2);
        assert_eq!(buf.samples_per_port(), 14 * 2048);
        assert_eq!(buf.ofdm_symbol_size(), 2048);
        assert!(buf.is_symbol_empty(0));

        assert!(TxDataF::with_dimensions(0, 14, 2048).is_err());
    }

    #[test]
    fn test_symbol_access() {
        let mut buf = TxDataF::with_dimensions(1, 14, 64).unwrap();

        buf.symbol_mut(0, 3).unwrap()[5] = C16::new(511, -511);
        assert!(!buf.is_symbol_empty(3));
        assert!(buf.is_symbol_empty(2));
        assert!(buf.is_symbol_empty(4));
        assert_eq!(buf.port(0).unwrap()[3 * 64 + 5], C16::new(511, -511));

        assert!(buf.symbol(0, 14).is_none());
        assert!(buf.symbol_mut(1, 0).is_none());

        buf.clear();
        assert!(buf.is_symbol_empty(3));
    }

    #[test]
    fn test_region_bounds() {
        let mut buf = TxDataF::with_dimensions(2, 14, 64).unwrap();

        assert!(buf.fits(2, 13 * 64, 64));
        assert!(!buf.fits(2, 13 * 64, 65));
        assert!(!buf.fits(3, 0, 64));
        assert!(!buf.fits(1, usize::MAX, 2));

        let mut region = buf.region_mut(1, 64, 128).unwrap();
        region.fill(C16::new(1, 1));
        assert!(!buf.is_symbol_empty(1));
        assert!(!buf.is_symbol_empty(2));
        assert!(buf.is_symbol_empty(3));
        assert!(buf.region_mut(2, 0, 1).is_none());
    }
}
