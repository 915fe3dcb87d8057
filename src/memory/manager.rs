use super::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Occupancy counters reported with advanced results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub chunks: usize,
    pub bytes: usize,
    pub raw_bytes: usize,
    pub compressed_chunks: usize,
    pub evictions: usize,
}

/// Owns every stored chunk and enforces the byte budget and entry ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manager {
    options: MemoryOptions,
    chunks: BTreeMap<u64, Chunk>,
    bytes: usize,
    clock: u64,
    next: u64,
    evictions: usize,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new(MemoryOptions::default())
    }
}

impl Manager {
    pub fn new(options: MemoryOptions) -> Self {
        Self {
            options,
            chunks: BTreeMap::new(),
            bytes: 0,
            clock: 0,
            next: 0,
            evictions: 0,
        }
    }

    pub fn options(&self) -> &MemoryOptions {
        &self.options
    }

    /// Pack and retain `samples`, evicting as needed. Returns the chunk id.
    pub fn store(&mut self, samples: &[f64], priority: Priority) -> u64 {
        let id = self.next;
        self.next += 1;
        let ratio = self
            .options
            .compression
            .then_some(self.options.compression_ratio);
        let mut chunk = Chunk::pack(id, samples, priority, ratio);
        chunk.touch(self.tick());
        self.bytes += chunk.size();
        self.chunks.insert(id, chunk);
        self.evict();
        id
    }

    /// Unpack a chunk and mark it recently used; `None` once evicted.
    pub fn load(&mut self, id: u64) -> Option<Vec<f64>> {
        let clock = self.tick();
        let chunk = self.chunks.get_mut(&id)?;
        chunk.touch(clock);
        match chunk.unpack() {
            Ok(samples) => Some(samples),
            Err(e) => {
                log::warn!("chunk {} unreadable: {}", id, e);
                None
            }
        }
    }

    /// Read a chunk without affecting recency.
    pub fn peek(&self, id: u64) -> Option<Vec<f64>> {
        self.chunks.get(&id).and_then(|chunk| chunk.unpack().ok())
    }

    pub fn contains(&self, id: u64) -> bool {
        self.chunks.contains_key(&id)
    }
    pub fn len(&self) -> usize {
        self.chunks.len()
    }
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            chunks: self.chunks.len(),
            bytes: self.bytes,
            raw_bytes: self.chunks.values().map(Chunk::raw_size).sum(),
            compressed_chunks: self.chunks.values().filter(|c| c.is_compressed()).count(),
            evictions: self.evictions,
        }
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
        self.bytes = 0;
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict(&mut self) {
        while self.bytes > self.options.budget || self.chunks.len() > self.options.max_entries {
            let Some(victim) = self
                .chunks
                .values()
                .min_by_key(|chunk| chunk.rank())
                .map(Chunk::id)
            else {
                break;
            };
            if let Some(chunk) = self.chunks.remove(&victim) {
                self.bytes -= chunk.size();
                self.evictions += 1;
                log::warn!(
                    "evicted {:?} chunk {} ({} bytes)",
                    chunk.priority(),
                    victim,
                    chunk.size()
                );
            }
        }
    }
}
