//! Snappy, raw block format.

use snap::raw::{Decoder, Encoder};

use super::{Codec, CodecError};

pub const NAME: &str = "snappy";

#[derive(Debug, Clone, Copy, Default)]
pub struct SnappyCodec;

impl Codec for SnappyCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compress(&self, src: &[u8]) -> Result<Vec<u8>, CodecError> {
        Encoder::new()
            .compress_vec(src)
            .map_err(|e| CodecError::new(NAME, e.to_string()))
    }

    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>, CodecError> {
        Decoder::new()
            .decompress_vec(src)
            .map_err(|e| CodecError::new(NAME, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repetitive_input_shrinks() {
        let src = b"abcdabcdabcdabcdabcdabcdabcdabcdabcdabcd".repeat(64);
        let packed = SnappyCodec.compress(&src).unwrap();
        assert!(packed.len() < src.len());
        assert_eq!(SnappyCodec.decompress(&packed).unwrap(), src);
    }

    #[test]
    fn garbage_is_rejected() {
        // Header claims ten bytes, but no element follows.
        let err = SnappyCodec.decompress(&[0x0a]).unwrap_err();
        assert_eq!(err.codec, NAME);
    }
}
