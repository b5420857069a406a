//! Single-bit stream packing and unpacking
//!
//! Bits are packed MSB-first: the first bit written lands in the highest
//! bit of the first byte. The writer reports how many low bits of the
//! final byte are padding so the reader can stop before them.

use crate::error::{CodecError, Result};

/// Accumulates single bits into a byte buffer, MSB-first.
#[derive(Debug, Default)]
pub struct BitWriter {
    buf: Vec<u8>,
    cur: u8,
    used: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.cur |= 1 << (7 - self.used);
        }
        self.used += 1;
        if self.used == 8 {
            self.buf.push(self.cur);
            self.cur = 0;
            self.used = 0;
        }
    }

    /// Total number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.buf.len() * 8 + self.used as usize
    }

    /// Flush the final partial byte and return the packed bytes together
    /// with the count (0-7) of unused low bits in the last byte.
    pub fn finish(mut self) -> (Vec<u8>, u8) {
        if self.used == 0 {
            (self.buf, 0)
        } else {
            let padding = 8 - self.used;
            self.buf.push(self.cur);
            (self.buf, padding)
        }
    }
}

/// Reads single bits from a byte slice, MSB-first, stopping before the
/// declared padding bits of the final byte.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit_len: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8], padding_bits: u8) -> Result<Self> {
        if padding_bits > 7 {
            return Err(CodecError::ModelParse(format!(
                "padding count {padding_bits} out of range"
            )));
        }
        if data.is_empty() && padding_bits > 0 {
            return Err(CodecError::ModelParse(
                "padding declared for an empty payload".into(),
            ));
        }
        Ok(Self {
            data,
            pos: 0,
            bit_len: data.len() * 8 - padding_bits as usize,
        })
    }

    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.pos >= self.bit_len {
            return None;
        }
        let bit = (self.data[self.pos / 8] >> (7 - (self.pos % 8))) & 1 == 1;
        self.pos += 1;
        Some(bit)
    }

    /// Number of readable bits left.
    pub fn remaining(&self) -> usize {
        self.bit_len - self.pos
    }
}
