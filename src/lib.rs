//! bitpress: lossless block compression with interchangeable entropy-coding engines.
//!
//! Two whole-block codecs behind one interface:
//! - Huffman coding: deterministic prefix-code trees, fast to encode and decode
//! - Arithmetic coding: renormalizing interval coder, fractional bits per symbol
//!
//! Every compressed block is self-describing: it embeds the frequency model
//! the decoder needs, so `decompress` takes nothing but the block bytes.
//! Engines are selectable by name through [`Engine`], or through the
//! [`Codec`] front-end which also reports sizes, ratio, and entropy.

pub mod arithmetic;
pub mod bitstream;
pub mod config;
pub mod error;
pub mod huffman;
pub mod model;

pub use error::{CodecError, Result};

use crate::config::CodecConfig;
use tracing::debug;

/// Entropy-coding engine selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Engine {
    Huffman,
    Arithmetic,
}

impl Engine {
    /// Every available engine, in registry order.
    pub const ALL: [Engine; 2] = [Engine::Huffman, Engine::Arithmetic];

    /// The registry name of this engine.
    pub fn name(&self) -> &'static str {
        match self {
            Engine::Huffman => "huffman",
            Engine::Arithmetic => "arithmetic",
        }
    }

    /// Look an engine up by its registry name.
    pub fn from_name(name: &str) -> Result<Engine> {
        Engine::ALL
            .iter()
            .copied()
            .find(|e| e.name() == name)
            .ok_or_else(|| CodecError::UnknownEngine(name.to_string()))
    }

    /// Compress a whole block with this engine.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Engine::Huffman => huffman::compress(data),
            Engine::Arithmetic => arithmetic::compress(data),
        }
    }

    /// Decompress a whole block produced by this engine.
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Engine::Huffman => huffman::decompress(data),
            Engine::Arithmetic => arithmetic::decompress(data),
        }
    }
}

/// Compressed output container
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CompressedBlock {
    pub engine: Engine,
    pub original_size: usize,
    pub compressed_size: usize,
    pub data: Vec<u8>,
    pub ratio: f64,
    pub entropy_bits: f64,
}

/// The main codec front-end
pub struct Codec {
    config: CodecConfig,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

impl Codec {
    /// Create a codec with the given configuration
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Compress a block with the selected engine
    pub fn compress(&self, data: &[u8], engine: Engine) -> Result<CompressedBlock> {
        if data.len() > self.config.max_block_len {
            return Err(CodecError::BlockTooLarge {
                len: data.len(),
                max: self.config.max_block_len,
            });
        }

        let compressed = engine.compress(data)?;
        let ratio = if data.is_empty() {
            1.0
        } else {
            compressed.len() as f64 / data.len() as f64
        };
        debug!(
            engine = engine.name(),
            original = data.len(),
            compressed = compressed.len(),
            ratio,
            "compressed block"
        );

        Ok(CompressedBlock {
            engine,
            original_size: data.len(),
            compressed_size: compressed.len(),
            data: compressed,
            ratio,
            entropy_bits: shannon_entropy(data),
        })
    }

    /// Decompress a block, verifying the recorded original size
    pub fn decompress(&self, block: &CompressedBlock) -> Result<Vec<u8>> {
        let data = block.engine.decompress(&block.data)?;
        if data.len() != block.original_size {
            return Err(CodecError::SizeMismatch {
                expected: block.original_size,
                actual: data.len(),
            });
        }
        debug!(
            engine = block.engine.name(),
            restored = data.len(),
            "decompressed block"
        );
        Ok(data)
    }
}

/// Shannon entropy of data in bits per byte
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut freq = [0u64; 256];
    for &b in data {
        freq[b as usize] += 1;
    }
    let len = data.len() as f64;
    let mut entropy = 0.0;
    for &f in &freq {
        if f > 0 {
            let p = f as f64 / len;
            entropy -= p * p.log2();
        }
    }
    entropy
}
