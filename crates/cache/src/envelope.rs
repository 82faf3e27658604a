//! Length-prefixed binary envelope with opportunistic compression.
//!
//! Wire format: `[flag: u8][len: u32 LE][payload]`. `flag` is 1 when
//! `payload` is gzip-compressed, 0 when it is the raw value. Grounded on
//! `common-compression`'s `compress_gzip`/`decompress_gzip` pair, which is
//! the pack's existing gzip idiom.

use crate::errors::CacheError;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

const COMPRESSED_FLAG: u8 = 1;
const RAW_FLAG: u8 = 0;
const HEADER_LEN: usize = 5;

/// Packs `value` into the envelope. Compression is attempted only when
/// `value` exceeds `compression_threshold` bytes, and the compressed form
/// is kept only if it actually comes out smaller (§4.3 "Serialization &
/// compression").
pub fn pack(value: &[u8], compression_threshold: usize) -> Vec<u8> {
    let (flag, payload) = if value.len() > compression_threshold {
        match compress_gzip(value) {
            Ok(compressed) if compressed.len() < value.len() => (COMPRESSED_FLAG, compressed),
            _ => (RAW_FLAG, value.to_vec()),
        }
    } else {
        (RAW_FLAG, value.to_vec())
    };

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.push(flag);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&payload);
    out
}

/// Unpacks a value previously produced by [`pack`]. Returns the decoded
/// bytes plus whether the stored form was compressed, for bookkeeping on
/// the `CacheEntry` (`compressed` flag, §3).
pub fn unpack(envelope: &[u8]) -> Result<(Vec<u8>, bool), CacheError> {
    if envelope.len() < HEADER_LEN {
        return Err(CacheError::MalformedEnvelope(format!(
            "envelope too short: {} bytes",
            envelope.len()
        )));
    }
    let flag = envelope[0];
    let len = u32::from_le_bytes(envelope[1..5].try_into().expect("4 bytes")) as usize;
    let payload = envelope
        .get(HEADER_LEN..HEADER_LEN + len)
        .ok_or_else(|| CacheError::MalformedEnvelope("declared length exceeds buffer".into()))?;

    match flag {
        COMPRESSED_FLAG => {
            let raw = decompress_gzip(payload)
                .map_err(|e| CacheError::MalformedEnvelope(e.to_string()))?;
            Ok((raw, true))
        }
        _ => Ok((payload.to_vec(), false)),
    }
}

fn compress_gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(data)?;
    encoder.finish()
}

fn decompress_gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_are_never_compressed() {
        let value = b"hello";
        let packed = pack(value, 1024);
        assert_eq!(packed[0], RAW_FLAG);
        let (unpacked, compressed) = unpack(&packed).unwrap();
        assert_eq!(unpacked, value);
        assert!(!compressed);
    }

    #[test]
    fn large_compressible_values_round_trip_compressed() {
        let value = vec![b'a'; 4096];
        let packed = pack(&value, 1024);
        assert_eq!(packed[0], COMPRESSED_FLAG);
        assert!(packed.len() < value.len());
        let (unpacked, compressed) = unpack(&packed).unwrap();
        assert_eq!(unpacked, value);
        assert!(compressed);
    }

    #[test]
    fn incompressible_large_values_fall_back_to_raw() {
        // Pseudo-random bytes rarely compress smaller than the original.
        let value: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2654435761) % 251) as u8).collect();
        let packed = pack(&value, 1024);
        let (unpacked, _) = unpack(&packed).unwrap();
        assert_eq!(unpacked, value);
    }

    #[test]
    fn malformed_envelope_is_rejected() {
        assert!(unpack(&[1, 2]).is_err());
    }
}
