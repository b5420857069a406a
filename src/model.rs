//! Frequency modeling and the embedded model header
//!
//! Every compressed block starts with a serialized frequency model so the
//! decoder can rebuild the encoder's exact statistics without external
//! metadata. The header is fixed-width binary: a `u16` LE record count,
//! then one record per symbol present — `u8` symbol value followed by its
//! `u32` LE frequency. The sum of frequencies is the original block length,
//! so no separate length field is needed.

use crate::error::{CodecError, Result};

/// Bytes per serialized record: symbol value plus frequency.
const RECORD_LEN: usize = 1 + 4;

/// Occurrence counts for every byte value in one input block.
///
/// Symbols with zero count are never serialized and never reported by
/// [`FrequencyModel::symbols`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyModel {
    counts: [u64; 256],
    total: u64,
}

impl FrequencyModel {
    /// Count symbol occurrences in `data`. Empty input yields an empty model.
    pub fn build(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &b in data {
            counts[b as usize] += 1;
        }
        Self {
            counts,
            total: data.len() as u64,
        }
    }

    pub fn frequency(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Sum of all frequencies, i.e. the original block length in symbols.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct symbols present.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Present symbols with their frequencies, in ascending symbol order.
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(s, &c)| (s as u8, c))
    }

    /// Serialize to the binary header format.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let distinct = self.distinct();
        let mut out = Vec::with_capacity(2 + distinct * RECORD_LEN);
        out.extend_from_slice(&(distinct as u16).to_le_bytes());
        for (symbol, freq) in self.symbols() {
            let freq = u32::try_from(freq).map_err(|_| {
                CodecError::UnsupportedAlphabet(format!(
                    "frequency of symbol {symbol:#04x} exceeds 32-bit header field"
                ))
            })?;
            out.push(symbol);
            out.extend_from_slice(&freq.to_le_bytes());
        }
        Ok(out)
    }

    /// Parse a header from the front of `data`, returning the model and the
    /// number of bytes consumed.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < 2 {
            return Err(CodecError::ModelParse(
                "header shorter than record count".into(),
            ));
        }
        let records = u16::from_le_bytes([data[0], data[1]]) as usize;
        if records > 256 {
            return Err(CodecError::ModelParse(format!(
                "record count {records} exceeds alphabet size"
            )));
        }
        let table_len = records * RECORD_LEN;
        if data.len() < 2 + table_len {
            return Err(CodecError::ModelParse(format!(
                "record count {records} exceeds available bytes"
            )));
        }

        let mut counts = [0u64; 256];
        let mut total = 0u64;
        for record in data[2..2 + table_len].chunks_exact(RECORD_LEN) {
            let symbol = record[0];
            let freq = u32::from_le_bytes([record[1], record[2], record[3], record[4]]);
            if freq == 0 {
                return Err(CodecError::ModelParse(format!(
                    "zero frequency for symbol {symbol:#04x}"
                )));
            }
            if counts[symbol as usize] != 0 {
                return Err(CodecError::ModelParse(format!(
                    "duplicate record for symbol {symbol:#04x}"
                )));
            }
            counts[symbol as usize] = freq as u64;
            total += freq as u64;
        }

        Ok((Self { counts, total }, 2 + table_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_counts() {
        let model = FrequencyModel::build(b"AAAAAAAAB");
        assert_eq!(model.frequency(b'A'), 8);
        assert_eq!(model.frequency(b'B'), 1);
        assert_eq!(model.frequency(b'C'), 0);
        assert_eq!(model.total(), 9);
        assert_eq!(model.distinct(), 2);
    }

    #[test]
    fn test_empty_model() {
        let model = FrequencyModel::build(b"");
        assert!(model.is_empty());
        let bytes = model.to_bytes().unwrap();
        assert_eq!(bytes, vec![0, 0]);
        let (parsed, consumed) = FrequencyModel::from_bytes(&bytes).unwrap();
        assert!(parsed.is_empty());
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_header_roundtrip() {
        let model = FrequencyModel::build(b"abracadabra");
        let bytes = model.to_bytes().unwrap();
        let (parsed, consumed) = FrequencyModel::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, model);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_symbols_in_ascending_order() {
        let model = FrequencyModel::build(b"zebra");
        let order: Vec<u8> = model.symbols().map(|(s, _)| s).collect();
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(order, sorted);
    }

    #[test]
    fn test_record_count_exceeds_bytes() {
        // Declares 5 records but carries none.
        let err = FrequencyModel::from_bytes(&[5, 0]).unwrap_err();
        assert!(matches!(err, CodecError::ModelParse(_)));
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let mut bytes = vec![1, 0];
        bytes.push(b'x');
        bytes.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            FrequencyModel::from_bytes(&bytes).unwrap_err(),
            CodecError::ModelParse(_)
        ));
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let mut bytes = vec![2, 0];
        for _ in 0..2 {
            bytes.push(b'x');
            bytes.extend_from_slice(&3u32.to_le_bytes());
        }
        assert!(matches!(
            FrequencyModel::from_bytes(&bytes).unwrap_err(),
            CodecError::ModelParse(_)
        ));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            FrequencyModel::from_bytes(&[1]).unwrap_err(),
            CodecError::ModelParse(_)
        ));
    }
}
