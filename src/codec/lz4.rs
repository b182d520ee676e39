//! LZ4 block with a little-endian `u32` original-size prefix.

use super::{Codec, CodecError};

pub const NAME: &str = "lz4";

#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compress(&self, src: &[u8]) -> Result<Vec<u8>, CodecError> {
        if src.len() > u32::MAX as usize {
            return Err(CodecError::new(NAME, "input larger than 4 GiB"));
        }
        Ok(lz4_flex::compress_prepend_size(src))
    }

    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>, CodecError> {
        lz4_flex::decompress_size_prepended(src).map_err(|e| CodecError::new(NAME, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_holds_original_size() {
        let src = vec![7u8; 1000];
        let packed = Lz4Codec.compress(&src).unwrap();
        assert_eq!(&packed[..4], &1000u32.to_le_bytes());
        assert_eq!(Lz4Codec.decompress(&packed).unwrap(), src);
    }

    #[test]
    fn truncated_block_is_rejected() {
        let src = b"lz4 lz4 lz4 lz4 lz4 lz4 lz4 lz4 lz4 lz4".repeat(10);
        let packed = Lz4Codec.compress(&src).unwrap();
        assert!(Lz4Codec.decompress(&packed[..packed.len() / 2]).is_err());
    }
}
