//! zlib adapter for block bodies
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use std::io::{Read, Write};

/// Failure to inflate a block body
#[derive(Debug)]
pub(crate) enum DecompressError {
    /// The zlib stream is malformed
    Corrupt(std::io::Error),

    /// The stream inflated to a different size than declared. `actual` is
    /// capped at one byte past the expected length.
    LengthMismatch { expected: usize, actual: usize },
}

/// Deflate `data` into a zlib stream at the given level (0-9)
pub(crate) fn compress(data: &[u8], level: u32) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2 + 16),
        Compression::new(level.min(9)),
    );
    encoder.write_all(data)?;
    encoder.finish()
}

/// Inflate a zlib stream that must produce exactly `expected_len` bytes.
///
/// Inflation stops one byte past the expected length so that a stream
/// declaring a small body can't be used to allocate an unbounded buffer.
pub(crate) fn decompress(data: &[u8], expected_len: usize) -> Result<Vec<u8>, DecompressError> {
    let limit = (expected_len as u64).saturating_add(1);
    let mut out = Vec::with_capacity(expected_len.min(data.len().saturating_mul(4)));
    ZlibDecoder::new(data)
        .take(limit)
        .read_to_end(&mut out)
        .map_err(DecompressError::Corrupt)?;

    if out.len() != expected_len {
        return Err(DecompressError::LengthMismatch {
            expected: expected_len,
            actual: out.len(),
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn compress_produces_zlib_header() {
        let out = compress(b"hello hello hello hello", 6).unwrap();
        assert_eq!(out[0], 0x78);
        assert_eq!(decompress(&out, 23).unwrap(), b"hello hello hello hello");
    }

    #[test]
    fn decompress_rejects_garbage() {
        let err = decompress(b"not a zlib stream", 10).unwrap_err();
        assert!(matches!(err, DecompressError::Corrupt(_)));
    }

    #[test]
    fn decompress_rejects_short_output() {
        let data = compress(&[7u8; 10], 6).unwrap();
        let err = decompress(&data, 20).unwrap_err();
        assert!(matches!(
            err,
            DecompressError::LengthMismatch {
                expected: 20,
                actual: 10
            }
        ));
    }

    #[test]
    fn decompress_stops_past_expected() {
        let data = compress(&[0u8; 4096], 9).unwrap();
        let err = decompress(&data, 16).unwrap_err();
        assert!(matches!(
            err,
            DecompressError::LengthMismatch {
                expected: 16,
                actual: 17
            }
        ));
    }

    #[test]
    fn level_zero_is_still_zlib() {
        let data = compress(b"stored", 0).unwrap();
        assert_eq!(decompress(&data, 6).unwrap(), b"stored");
    }

    #[quickcheck]
    fn inflate_inverts_deflate(data: Vec<u8>, level: u8) -> bool {
        let packed = compress(&data, u32::from(level % 10)).unwrap();
        decompress(&packed, data.len()).map_or(false, |x| x == data)
    }
}
