//! Configuration for bitpress

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Maximum accepted block length in bytes. The arithmetic coder's
    /// 32-bit state requires the total symbol count to stay below 2^30.
    pub max_block_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_block_len: (1 << 30) - 1,
        }
    }
}
