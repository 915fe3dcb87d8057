use super::codec;
use byteorder::LE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use serde::Deserialize;
use serde::Serialize;
use std::io::Cursor;

/// Eviction class; lower classes go first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// A packed run of `f64` samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    id: u64,
    priority: Priority,
    bytes: Vec<u8>,
    compressed: bool,
    raw_len: usize,
    last_access: u64,
}

impl Chunk {
    /// Pack samples, compressing only when the result beats `ratio` of raw size.
    pub fn pack(id: u64, samples: &[f64], priority: Priority, ratio: Option<f64>) -> Self {
        let mut raw = Vec::with_capacity(samples.len() * size_of::<f64>());
        for &x in samples {
            raw.write_f64::<LE>(x).expect("write to vec");
        }
        let raw_len = raw.len();
        let packed = ratio
            .map(|ratio| (codec::compress(&raw), ratio))
            .filter(|(packed, ratio)| (packed.len() as f64) < *ratio * raw_len as f64)
            .map(|(packed, _)| packed);
        let (bytes, compressed) = match packed {
            Some(packed) => (packed, true),
            None => (raw, false),
        };
        Self {
            id,
            priority,
            bytes,
            compressed,
            raw_len,
            last_access: 0,
        }
    }

    pub fn unpack(&self) -> std::io::Result<Vec<f64>> {
        let raw = match self.compressed {
            true => codec::decompress(&self.bytes, self.raw_len)?,
            false => self.bytes.clone(),
        };
        let mut reader = Cursor::new(raw);
        (0..self.raw_len / size_of::<f64>())
            .map(|_| reader.read_f64::<LE>())
            .collect()
    }

    pub fn id(&self) -> u64 {
        self.id
    }
    pub fn priority(&self) -> Priority {
        self.priority
    }
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
    pub fn raw_size(&self) -> usize {
        self.raw_len
    }
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }
    pub fn last_access(&self) -> u64 {
        self.last_access
    }
    pub fn touch(&mut self, clock: u64) {
        self.last_access = clock;
    }
    /// Eviction order key: lowest first.
    pub fn rank(&self) -> (Priority, u64) {
        (self.priority, self.last_access)
    }
}
