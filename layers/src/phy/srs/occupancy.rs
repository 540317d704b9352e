//! SRS symbol occupancy within the slot
//!
//! The SRS occupies `N_symb^SRS` consecutive symbols starting at
//! `l0 = N_symb^slot - 1 - l_offset` (TS 38.211 Section 6.4.1.4.1).

use super::config::SrsSymbolsCode;
use super::SrsError;
use std::ops::Range;
use tracing::{debug, trace};

/// Number of consecutive SRS symbols per nrofSymbols code
pub const NUM_SRS_SYMBOLS: [u8; 5] = [1, 2, 4, 8, 12];

/// Contiguous range of SRS symbols, validated against the slot length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrsSymbolRange {
    first: u8,
    count: u8,
}

impl SrsSymbolRange {
    /// Compute the SRS symbols of the slot
    pub fn compute(
        symbols_per_slot: u8,
        time_start_position: u8,
        num_symbols_code: u8,
    ) -> Result<Self, SrsError> {
        let count = SrsSymbolsCode::decode(num_symbols_code)?.count();
        let first = symbols_per_slot as i16 - 1 - time_start_position as i16;
        let last = first + count as i16 - 1;

        if first < 0 || last >= symbols_per_slot as i16 {
            return Err(SrsError::SymbolRangeOutOfSlot {
                first,
                count,
                symbols_per_slot,
            });
        }

        trace!("SRS symbols {}..={} of {}", first, last, symbols_per_slot);

        Ok(Self {
            first: first as u8,
            count,
        })
    }

    pub fn first(&self) -> u8 {
        self.first
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn last(&self) -> u8 {
        self.first + self.count - 1
    }

    /// Symbol indices as a half-open range
    pub fn symbols(&self) -> Range<usize> {
        self.first as usize..self.first as usize + self.count as usize
    }

    pub fn contains(&self, symbol: u8) -> bool {
        symbol >= self.first && symbol <= self.last()
    }

    /// Check that `was_symbol_used` covers this range
    pub fn check_map(&self, was_symbol_used: &[bool]) -> Result<(), SrsError> {
        let required = self.symbols().end;
        if was_symbol_used.len() < required {
            return Err(SrsError::OccupancyMapTooShort {
                len: was_symbol_used.len(),
                required,
            });
        }
        Ok(())
    }
}

/// Flag the SRS symbols in the per-slot occupancy map
///
/// Only entries inside `range` are written. Nothing is written if the
/// map is too short for the range.
pub fn mark_symbols_used(was_symbol_used: &mut [bool], range: SrsSymbolRange) -> Result<(), SrsError> {
    range.check_map(was_symbol_used)?;

    for (symbol, used) in was_symbol_used[range.symbols()].iter_mut().enumerate() {
        if *used {
            debug!(
                "Symbol {} already used by another channel, SRS shares it",
                range.first as usize + symbol
            );
        }
        *used = true;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_count_table() {
        for (code, &expected) in NUM_SRS_SYMBOLS.iter().enumerate() {
            let range = SrsSymbolRange::compute(14, 13, code as u8).unwrap();
            assert_eq!(range.count(), expected);
        }
        assert!(matches!(
            SrsSymbolRange::compute(14, 13, 5),
            Err(SrsError::InvalidExponent { field: "num_symbols", code: 5 })
        ));
    }

    #[test]
    fn test_four_symbols_end_of_slot() {
        let range = SrsSymbolRange::compute(14, 4, 2).unwrap();
        assert_eq!(range.first(), 9);
        assert_eq!(range.last(), 12);
        assert_eq!(range.symbols(), 9..13);

        let mut map = [false; 14];
        mark_symbols_used(&mut map, range).unwrap();
        for (symbol, &used) in map.iter().enumerate() {
            assert_eq!(used, (9..=12).contains(&symbol), "symbol {}", symbol);
        }
    }

    #[test]
    fn test_last_symbol_single() {
        let range = SrsSymbolRange::compute(14, 0, 0).unwrap();
        assert_eq!(range.first(), 13);
        assert_eq!(range.last(), 13);
        assert!(range.contains(13));
        assert!(!range.contains(12));
    }

    #[test]
    fn test_range_leaving_slot_is_rejected() {
        // l_offset = 0 leaves room for a single symbol only
        assert_eq!(
            SrsSymbolRange::compute(14, 0, 2),
            Err(SrsError::SymbolRangeOutOfSlot {
                first: 13,
                count: 4,
                symbols_per_slot: 14,
            })
        );

        // l_offset beyond the slot start
        assert_eq!(
            SrsSymbolRange::compute(14, 14, 0),
            Err(SrsError::SymbolRangeOutOfSlot {
                first: -1,
                count: 1,
                symbols_per_slot: 14,
            })
        );

        // 12 symbols need l_offset >= 11
        assert!(SrsSymbolRange::compute(14, 10, 4).is_err());
        let range = SrsSymbolRange::compute(14, 13, 4).unwrap();
        assert_eq!((range.first(), range.last()), (0, 11));

        // Extended CP
        assert!(SrsSymbolRange::compute(12, 12, 0).is_err());
        assert_eq!(SrsSymbolRange::compute(12, 11, 0).unwrap().first(), 0);
    }

    #[test]
    fn test_short_map_is_not_written() {
        let range = SrsSymbolRange::compute(14, 4, 2).unwrap();
        let mut map = [false; 12];

        assert_eq!(
            mark_symbols_used(&mut map, range),
            Err(SrsError::OccupancyMapTooShort { len: 12, required: 13 })
        );
        assert!(map.iter().all(|&used| !used));
    }

    #[test]
    fn test_existing_marks_are_preserved() {
        let mut map = [false; 14];
        map[0] = true;
        map[2] = true;
        map[10] = true;

        let range = SrsSymbolRange::compute(14, 3, 1).unwrap();
        assert_eq!(range.symbols(), 10..12);
        mark_symbols_used(&mut map, range).unwrap();

        let used: Vec<usize> = (0..14).filter(|&i| map[i]).collect();
        assert_eq!(used, vec![0, 2, 10, 11]);
    }
}
