//! Huffman compression and decompression
//!
//! Classic prefix coding over whole blocks. Tree construction is
//! deterministic: leaves enter the priority queue in ascending symbol
//! order and every queue entry carries a strictly increasing sequence
//! number, so ties on frequency always merge in insertion order and the
//! decoder rebuilds the identical tree shape from the model header alone.
//!
//! Block layout: model header, one padding-count byte, then the packed
//! codeword bits (MSB-first).

use crate::bitstream::{BitReader, BitWriter};
use crate::error::{CodecError, Result};
use crate::model::FrequencyModel;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Leaf {
        symbol: u8,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Priority-queue entry. `seq` is the insertion sequence number used to
/// break frequency ties deterministically.
#[derive(Debug, PartialEq, Eq)]
struct QueueEntry {
    freq: u64,
    seq: u32,
    node: Node,
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on (freq, seq)
        other
            .freq
            .cmp(&self.freq)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Build the prefix-code tree by repeated minimum-pair merge. Returns
/// `None` for an empty model; a single-symbol model yields a lone leaf.
fn build_tree(model: &FrequencyModel) -> Option<Node> {
    let mut heap = BinaryHeap::new();
    let mut seq = 0u32;
    for (symbol, freq) in model.symbols() {
        heap.push(QueueEntry {
            freq,
            seq,
            node: Node::Leaf { symbol, freq },
        });
        seq += 1;
    }

    while heap.len() > 1 {
        let left = heap.pop().unwrap();
        let right = heap.pop().unwrap();
        let freq = left.freq + right.freq;
        heap.push(QueueEntry {
            freq,
            seq,
            node: Node::Internal {
                freq,
                left: Box::new(left.node),
                right: Box::new(right.node),
            },
        });
        seq += 1;
    }

    heap.pop().map(|entry| entry.node)
}

/// Derive codewords by iterative depth-first traversal: bit 0 descends
/// left, bit 1 descends right. A lone leaf at the root gets the reserved
/// one-bit codeword `0`.
fn assign_codes(root: &Node) -> Vec<Vec<u8>> {
    let mut codes = vec![Vec::new(); 256];
    if let Node::Leaf { symbol, .. } = root {
        codes[*symbol as usize] = vec![0];
        return codes;
    }

    let mut stack = vec![(root, Vec::new())];
    while let Some((node, prefix)) = stack.pop() {
        match node {
            Node::Leaf { symbol, .. } => {
                codes[*symbol as usize] = prefix;
            }
            Node::Internal { left, right, .. } => {
                let mut left_prefix = prefix.clone();
                left_prefix.push(0);
                let mut right_prefix = prefix;
                right_prefix.push(1);
                stack.push((right.as_ref(), right_prefix));
                stack.push((left.as_ref(), left_prefix));
            }
        }
    }
    codes
}

/// Compress a block using Huffman coding.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let model = FrequencyModel::build(data);
    let mut output = model.to_bytes()?;
    let root = match build_tree(&model) {
        Some(root) => root,
        None => return Ok(output), // empty block: header only
    };
    let codes = assign_codes(&root);

    let mut writer = BitWriter::new();
    for &b in data {
        for &bit in &codes[b as usize] {
            writer.write_bit(bit == 1);
        }
    }
    let (payload, padding) = writer.finish();
    output.push(padding);
    output.extend_from_slice(&payload);
    Ok(output)
}

/// Decompress a Huffman-encoded block.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let (model, consumed) = FrequencyModel::from_bytes(data)?;
    let root = match build_tree(&model) {
        Some(root) => root,
        None => return Ok(Vec::new()),
    };
    let total = model.total() as usize;

    let (&padding, payload) = data[consumed..]
        .split_first()
        .ok_or(CodecError::TruncatedStream)?;
    let mut reader = BitReader::new(payload, padding)?;
    // Every codeword is at least one bit.
    if reader.remaining() < total {
        return Err(CodecError::TruncatedStream);
    }

    let mut output = Vec::with_capacity(total);
    while output.len() < total {
        let mut node = &root;
        if let Node::Leaf { symbol, .. } = node {
            // Single-symbol tree: the reserved codeword is one bit.
            reader.read_bit().ok_or(CodecError::TruncatedStream)?;
            output.push(*symbol);
            continue;
        }
        loop {
            let bit = reader.read_bit().ok_or(CodecError::TruncatedStream)?;
            node = match node {
                Node::Internal { left, right, .. } => {
                    if bit {
                        right.as_ref()
                    } else {
                        left.as_ref()
                    }
                }
                Node::Leaf { .. } => unreachable!("traversal restarts at an internal root"),
            };
            if let Node::Leaf { symbol, .. } = node {
                output.push(*symbol);
                break;
            }
        }
    }

    Ok(output)
}
