//! Dictionary-style byte compression.
//!
//! Stream of tokens, each led by a control byte:
//!
//! - `0x00..=0x7F` literal run of `control + 1` bytes follows
//! - `0x80..=0xFF` back-reference of `(control & 0x7F) + 4` bytes, followed
//!   by a little-endian `u16` distance
use byteorder::LE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use std::collections::HashMap;
use std::io::Cursor;
use std::io::Error;
use std::io::ErrorKind;
use std::io::Read;

const MIN_MATCH: usize = 4;
const MAX_MATCH: usize = MIN_MATCH + 0x7F;
const MAX_LITERALS: usize = 0x80;
const MAX_DISTANCE: usize = u16::MAX as usize;

pub fn compress(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len() / 2);
    let mut literals = Vec::with_capacity(MAX_LITERALS);
    let mut table = HashMap::<[u8; MIN_MATCH], usize>::new();
    let mut i = 0;
    while i < raw.len() {
        if i + MIN_MATCH <= raw.len() {
            let key = [raw[i], raw[i + 1], raw[i + 2], raw[i + 3]];
            if let Some(&j) = table.get(&key).filter(|&&j| i - j <= MAX_DISTANCE) {
                let length = (0..MAX_MATCH.min(raw.len() - i))
                    .take_while(|&k| raw[j + k] == raw[i + k])
                    .count();
                flush(&mut out, &mut literals);
                out.push(0x80 | (length - MIN_MATCH) as u8);
                out.write_u16::<LE>((i - j) as u16).expect("write to vec");
                for k in i..(i + length).min(raw.len().saturating_sub(MIN_MATCH - 1)) {
                    table.insert([raw[k], raw[k + 1], raw[k + 2], raw[k + 3]], k);
                }
                i += length;
                continue;
            }
            table.insert(key, i);
        }
        literals.push(raw[i]);
        if literals.len() == MAX_LITERALS {
            flush(&mut out, &mut literals);
        }
        i += 1;
    }
    flush(&mut out, &mut literals);
    out
}

pub fn decompress(data: &[u8], raw_len: usize) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(raw_len);
    let mut reader = Cursor::new(data);
    while (reader.position() as usize) < data.len() {
        let control = reader.read_u8()?;
        match control {
            0x00..=0x7F => {
                let mut run = vec![0u8; control as usize + 1];
                reader.read_exact(&mut run)?;
                out.extend_from_slice(&run);
            }
            _ => {
                let length = (control & 0x7F) as usize + MIN_MATCH;
                let distance = reader.read_u16::<LE>()? as usize;
                if distance == 0 || distance > out.len() {
                    return Err(Error::new(ErrorKind::InvalidData, "back-reference out of range"));
                }
                let start = out.len() - distance;
                for k in 0..length {
                    out.push(out[start + k]);
                }
            }
        }
    }
    match out.len() == raw_len {
        true => Ok(out),
        false => Err(Error::new(ErrorKind::InvalidData, "decoded length mismatch")),
    }
}

fn flush(out: &mut Vec<u8>, literals: &mut Vec<u8>) {
    if !literals.is_empty() {
        out.push((literals.len() - 1) as u8);
        out.append(literals);
    }
}
