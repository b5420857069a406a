//! Arithmetic (interval) compression and decompression
//!
//! Encodes a block as a single binary fraction inside the interval obtained
//! by repeatedly narrowing [0,1) to each symbol's cumulative sub-range.
//! Working precision is a fixed 32-bit window renormalized incrementally:
//! whenever the leading bits of `low` and `high` agree the bit is emitted
//! and the interval rescaled by 2, so precision never depends on input
//! length. Near-half straddles are tracked as pending bits and resolved by
//! the next determined bit.
//!
//! Block layout matches the Huffman engine: model header, one padding-count
//! byte, then the packed interval bits. The header's frequency sum doubles
//! as the symbol count, so decode knows exactly how many symbols to emit.

use crate::bitstream::{BitReader, BitWriter};
use crate::error::{CodecError, Result};
use crate::model::FrequencyModel;

const STATE_BITS: u32 = 32;
const HALF: u64 = 1 << (STATE_BITS - 1);
const QUARTER: u64 = 1 << (STATE_BITS - 2);
const THREE_QUARTERS: u64 = HALF + QUARTER;
const MAX_CODE: u64 = (1 << STATE_BITS) - 1;

/// Largest total frequency the 32-bit state can carry without overflowing
/// 64-bit intermediates or starving a symbol of range.
const MAX_TOTAL: u64 = QUARTER;

/// Disjoint cumulative sub-intervals tiling [0, total), one per present
/// symbol, in ascending symbol order.
#[derive(Debug)]
struct CumulativePartition {
    symbols: Vec<u8>,
    cum: Vec<u64>,
}

impl CumulativePartition {
    fn from_model(model: &FrequencyModel) -> Self {
        let mut symbols = Vec::with_capacity(model.distinct());
        let mut cum = Vec::with_capacity(model.distinct() + 1);
        cum.push(0);
        let mut running = 0u64;
        for (symbol, freq) in model.symbols() {
            symbols.push(symbol);
            running += freq;
            cum.push(running);
        }
        Self { symbols, cum }
    }

    fn total(&self) -> u64 {
        self.cum[self.cum.len() - 1]
    }

    /// Cumulative bounds of `symbol`, if present.
    fn interval(&self, symbol: u8) -> Option<(u64, u64)> {
        let i = self.symbols.binary_search(&symbol).ok()?;
        Some((self.cum[i], self.cum[i + 1]))
    }

    /// The symbol whose sub-interval contains `value`, with its bounds.
    /// `value` is clamped into [0, total) first.
    fn locate(&self, value: u64) -> (u8, u64, u64) {
        let i = self
            .cum
            .partition_point(|&c| c <= value)
            .saturating_sub(1)
            .min(self.symbols.len() - 1);
        (self.symbols[i], self.cum[i], self.cum[i + 1])
    }
}

struct Encoder {
    low: u64,
    high: u64,
    pending: u64,
    writer: BitWriter,
}

impl Encoder {
    fn new() -> Self {
        Self {
            low: 0,
            high: MAX_CODE,
            pending: 0,
            writer: BitWriter::new(),
        }
    }

    fn encode(&mut self, cum_low: u64, cum_high: u64, total: u64) {
        let range = self.high - self.low + 1;
        self.high = self.low + range * cum_high / total - 1;
        self.low += range * cum_low / total;

        loop {
            if self.high < HALF {
                self.emit(false);
            } else if self.low >= HALF {
                self.emit(true);
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= QUARTER && self.high < THREE_QUARTERS {
                self.pending += 1;
                self.low -= QUARTER;
                self.high -= QUARTER;
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
        }
    }

    fn emit(&mut self, bit: bool) {
        self.writer.write_bit(bit);
        for _ in 0..self.pending {
            self.writer.write_bit(!bit);
        }
        self.pending = 0;
    }

    /// Emit enough bits to pin the final interval, then flush.
    fn finish(mut self) -> (Vec<u8>, u8) {
        self.pending += 1;
        let bit = self.low >= QUARTER;
        self.emit(bit);
        self.writer.finish()
    }
}

struct Decoder<'a> {
    low: u64,
    high: u64,
    code: u64,
    reader: BitReader<'a>,
    overdraft: u32,
}

impl<'a> Decoder<'a> {
    fn new(reader: BitReader<'a>) -> Result<Self> {
        let mut decoder = Self {
            low: 0,
            high: MAX_CODE,
            code: 0,
            reader,
            overdraft: 0,
        };
        for _ in 0..STATE_BITS {
            decoder.code = (decoder.code << 1) | decoder.next_bit()?;
        }
        Ok(decoder)
    }

    /// Next payload bit, zero-filling past the end. A valid stream never
    /// needs more than `STATE_BITS` fill bits (the initial state load minus
    /// the encoder's final flush); beyond that the stream is truncated.
    fn next_bit(&mut self) -> Result<u64> {
        match self.reader.read_bit() {
            Some(true) => Ok(1),
            Some(false) => Ok(0),
            None => {
                self.overdraft += 1;
                if self.overdraft > STATE_BITS {
                    Err(CodecError::TruncatedStream)
                } else {
                    Ok(0)
                }
            }
        }
    }

    fn decode_symbol(&mut self, partition: &CumulativePartition) -> Result<u8> {
        let total = partition.total();
        let range = self.high - self.low + 1;
        // Corrupt streams can push the code outside [low, high]; clamp
        // instead of overflowing.
        let offset = self.code.saturating_sub(self.low);
        let value = ((offset + 1) * total - 1) / range;
        let (symbol, cum_low, cum_high) = partition.locate(value);

        self.high = self.low + range * cum_high / total - 1;
        self.low += range * cum_low / total;

        loop {
            if self.high < HALF {
                // leading bit determined as 0, nothing to subtract
            } else if self.low >= HALF {
                self.low -= HALF;
                self.high -= HALF;
                self.code = self.code.saturating_sub(HALF);
            } else if self.low >= QUARTER && self.high < THREE_QUARTERS {
                self.low -= QUARTER;
                self.high -= QUARTER;
                self.code = self.code.saturating_sub(QUARTER);
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
            self.code = (self.code << 1) | self.next_bit()?;
        }

        Ok(symbol)
    }
}

/// Compress a block using arithmetic coding.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let model = FrequencyModel::build(data);
    let mut output = model.to_bytes()?;
    if model.is_empty() {
        return Ok(output);
    }
    if model.total() > MAX_TOTAL {
        return Err(CodecError::UnsupportedAlphabet(format!(
            "block of {} symbols exceeds coder precision (max {MAX_TOTAL})",
            model.total()
        )));
    }
    if model.distinct() == 1 {
        // The interval never narrows: the symbol count in the header is
        // all the decoder needs.
        output.push(0);
        return Ok(output);
    }

    let partition = CumulativePartition::from_model(&model);
    let total = partition.total();
    let mut encoder = Encoder::new();
    for &b in data {
        let (cum_low, cum_high) = partition
            .interval(b)
            .ok_or_else(|| CodecError::ModelParse("symbol absent from partition".into()))?;
        encoder.encode(cum_low, cum_high, total);
    }
    let (payload, padding) = encoder.finish();
    output.push(padding);
    output.extend_from_slice(&payload);
    Ok(output)
}

/// Decompress an arithmetic-encoded block.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let (model, consumed) = FrequencyModel::from_bytes(data)?;
    if model.is_empty() {
        return Ok(Vec::new());
    }
    if model.total() > MAX_TOTAL {
        return Err(CodecError::ModelParse(format!(
            "declared symbol count {} exceeds coder precision",
            model.total()
        )));
    }
    let total = model.total() as usize;
    if model.distinct() == 1 {
        if let Some((symbol, _)) = model.symbols().next() {
            return Ok(vec![symbol; total]);
        }
    }

    let (&padding, payload) = data[consumed..]
        .split_first()
        .ok_or(CodecError::TruncatedStream)?;
    let reader = BitReader::new(payload, padding)?;
    let partition = CumulativePartition::from_model(&model);

    let mut decoder = Decoder::new(reader)?;
    // A hostile header can declare far more symbols than the payload
    // supports; grow the buffer instead of pre-allocating the claim.
    let mut output = Vec::with_capacity(total.min(1 << 20));
    for _ in 0..total {
        output.push(decoder.decode_symbol(&partition)?);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_arithmetic_roundtrip() {
        let data = b"hello world hello world hello";
        let compressed = compress(data).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_empty_input_roundtrip() {
        let compressed = compress(b"").unwrap();
        assert_eq!(compressed, vec![0, 0]);
        assert_eq!(decompress(&compressed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_single_symbol_has_empty_payload() {
        // "CCCC": one partition entry spanning the whole range, so the
        // block is just the header plus a zero padding byte.
        let compressed = compress(b"CCCC").unwrap();
        assert_eq!(compressed.len(), 2 + 5 + 1);
        assert_eq!(compressed[compressed.len() - 1], 0);
        assert_eq!(decompress(&compressed).unwrap(), b"CCCC");
    }

    #[test]
    fn test_all_byte_values() {
        let data: Vec<u8> = (0..=255).collect();
        let compressed = compress(&data).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_two_symbol_alphabet() {
        let data = b"ababababbbaaab";
        let compressed = compress(data).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_random_roundtrip() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for len in [1usize, 2, 17, 300, 5000] {
            let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let compressed = compress(&data).unwrap();
            assert_eq!(decompress(&compressed).unwrap(), data, "len {len}");
        }
    }

    #[test]
    fn test_skewed_input_beats_raw_bits() {
        let mut data = vec![b'a'; 4000];
        data.extend_from_slice(b"bcbcbc");
        let model = FrequencyModel::build(&data);
        let header_len = model.to_bytes().unwrap().len();
        let compressed = compress(&data).unwrap();
        let payload_bits = (compressed.len() - header_len - 1) * 8;
        assert!(payload_bits < 8 * data.len());
    }

    #[test]
    fn test_long_repetitive_input() {
        // Interval width decays exponentially; renormalization must keep
        // the coder exact regardless of length.
        let data: Vec<u8> = b"abcabcabd".iter().cycle().take(50_000).copied().collect();
        let compressed = compress(&data).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_truncated_payload() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let mut compressed = compress(data).unwrap();
        let keep = compressed.len() - 8;
        compressed.truncate(keep);
        assert!(matches!(
            decompress(&compressed).unwrap_err(),
            CodecError::TruncatedStream
        ));
    }

    #[test]
    fn test_malformed_header() {
        assert!(matches!(
            decompress(&[9, 0, b'a']).unwrap_err(),
            CodecError::ModelParse(_)
        ));
    }

    #[test]
    fn test_partition_tiles_total() {
        let model = FrequencyModel::build(b"mississippi");
        let partition = CumulativePartition::from_model(&model);
        assert_eq!(partition.total(), 11);
        for (symbol, freq) in model.symbols() {
            let (lo, hi) = partition.interval(symbol).unwrap();
            assert_eq!(hi - lo, freq);
        }
        let (s, lo, _) = partition.locate(0);
        assert_eq!((s, lo), (b'i', 0));
    }
}
