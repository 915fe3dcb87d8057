use crate::CHUNK_SIZE;
use crate::COMPRESSION_RATIO;
use crate::Error;
use crate::MEMORY_BUDGET;
use crate::MEMORY_MAX_ENTRIES;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryOptions {
    /// Samples per chunk.
    pub chunk_size: usize,
    /// Stored bytes allowed before eviction.
    pub budget: usize,
    pub max_entries: usize,
    pub compression: bool,
    /// Compressed form is kept only when smaller than this fraction of raw.
    pub compression_ratio: f64,
}

impl Default for MemoryOptions {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            budget: MEMORY_BUDGET,
            max_entries: MEMORY_MAX_ENTRIES,
            compression: true,
            compression_ratio: COMPRESSION_RATIO,
        }
    }
}

impl MemoryOptions {
    pub fn validate(&self) -> crate::Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::config("memory chunk size must be positive"));
        }
        if self.max_entries == 0 || self.budget == 0 {
            return Err(Error::config("memory budget and entry ceiling must be positive"));
        }
        if !(self.compression_ratio > 0.0 && self.compression_ratio <= 1.0) {
            return Err(Error::config("compression ratio must lie in (0, 1]"));
        }
        Ok(())
    }
}
