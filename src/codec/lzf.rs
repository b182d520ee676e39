//! LZF in a chunked container.
//!
//! Raw LZF carries no length and refuses input it cannot shrink, so the
//! stream is split into chunks of at most [`MAX_CHUNK_LEN`] bytes, each
//! prefixed with a small header (all integers big-endian):
//!
//! ```text
//! stored:     'Z' 'V' 0x00  len:u16            payload[len]
//! compressed: 'Z' 'V' 0x01  len:u16  orig:u16  payload[len]
//! ```
//!
//! A chunk LZF cannot shrink is stored verbatim. Empty input encodes to an
//! empty stream.

use super::{Codec, CodecError};

pub const NAME: &str = "lzf";

/// Largest chunk payload representable in the 16-bit length field.
pub const MAX_CHUNK_LEN: usize = 0xFFFF;

const MAGIC: [u8; 2] = [b'Z', b'V'];
const BLOCK_STORED: u8 = 0;
const BLOCK_COMPRESSED: u8 = 1;
const STORED_HEADER_LEN: usize = 5;
const COMPRESSED_HEADER_LEN: usize = 7;

#[derive(Debug, Clone, Copy, Default)]
pub struct LzfCodec;

fn read_u16(buf: &[u8], at: usize) -> Result<usize, CodecError> {
    buf.get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]) as usize)
        .ok_or_else(|| CodecError::new(NAME, "truncated chunk header"))
}

fn push_stored(out: &mut Vec<u8>, chunk: &[u8]) {
    out.extend_from_slice(&MAGIC);
    out.push(BLOCK_STORED);
    out.extend_from_slice(&(chunk.len() as u16).to_be_bytes());
    out.extend_from_slice(chunk);
}

impl Codec for LzfCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compress(&self, src: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(src.len() + src.len() / MAX_CHUNK_LEN * COMPRESSED_HEADER_LEN + 16);
        for chunk in src.chunks(MAX_CHUNK_LEN) {
            match ::lzf::compress(chunk) {
                Ok(packed) if packed.len() < chunk.len() => {
                    out.extend_from_slice(&MAGIC);
                    out.push(BLOCK_COMPRESSED);
                    out.extend_from_slice(&(packed.len() as u16).to_be_bytes());
                    out.extend_from_slice(&(chunk.len() as u16).to_be_bytes());
                    out.extend_from_slice(&packed);
                }
                // Incompressible (or too small to bother): keep the bytes as-is.
                _ => push_stored(&mut out, chunk),
            }
        }
        Ok(out)
    }

    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        let mut pos = 0;
        while pos < src.len() {
            if src.len() - pos < STORED_HEADER_LEN || src[pos..pos + 2] != MAGIC {
                return Err(CodecError::new(NAME, format!("bad chunk header at offset {}", pos)));
            }
            let kind = src[pos + 2];
            let len = read_u16(src, pos + 3)?;
            match kind {
                BLOCK_STORED => {
                    let start = pos + STORED_HEADER_LEN;
                    let payload = src
                        .get(start..start + len)
                        .ok_or_else(|| CodecError::new(NAME, "truncated stored chunk"))?;
                    out.extend_from_slice(payload);
                    pos = start + len;
                }
                BLOCK_COMPRESSED => {
                    let orig = read_u16(src, pos + 5)?;
                    let start = pos + COMPRESSED_HEADER_LEN;
                    let payload = src
                        .get(start..start + len)
                        .ok_or_else(|| CodecError::new(NAME, "truncated compressed chunk"))?;
                    let chunk = ::lzf::decompress(payload, orig)
                        .map_err(|e| CodecError::new(NAME, format!("{:?}", e)))?;
                    if chunk.len() != orig {
                        return Err(CodecError::new(
                            NAME,
                            format!("chunk decoded to {} bytes, header says {}", chunk.len(), orig),
                        ));
                    }
                    out.extend_from_slice(&chunk);
                    pos = start + len;
                }
                other => {
                    return Err(CodecError::new(NAME, format!("unknown chunk type {}", other)));
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressible_input_uses_compressed_chunks() {
        let src = b"the quick brown fox jumps over the lazy dog. ".repeat(100);
        let packed = LzfCodec.compress(&src).unwrap();
        assert_eq!(&packed[..3], &[b'Z', b'V', BLOCK_COMPRESSED]);
        assert!(packed.len() < src.len());
        assert_eq!(LzfCodec.decompress(&packed).unwrap(), src);
    }

    #[test]
    fn incompressible_input_is_stored() {
        // xorshift noise does not compress.
        let mut x: u32 = 0x9E37_79B9;
        let src: Vec<u8> = (0..4096)
            .map(|_| {
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                x as u8
            })
            .collect();
        let packed = LzfCodec.compress(&src).unwrap();
        assert_eq!(&packed[..3], &[b'Z', b'V', BLOCK_STORED]);
        assert_eq!(packed.len(), src.len() + STORED_HEADER_LEN);
        assert_eq!(LzfCodec.decompress(&packed).unwrap(), src);
    }

    #[test]
    fn input_spanning_several_chunks_round_trips() {
        let src: Vec<u8> = (0..(MAX_CHUNK_LEN * 2 + 123)).map(|i| (i % 251) as u8).collect();
        let packed = LzfCodec.compress(&src).unwrap();
        assert_eq!(LzfCodec.decompress(&packed).unwrap(), src);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let err = LzfCodec.decompress(b"XX\x00\x00\x01a").unwrap_err();
        assert!(err.message.contains("bad chunk header"));
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let err = LzfCodec.decompress(b"ZV\x00\x00\x09abc").unwrap_err();
        assert!(err.message.contains("truncated"));
    }
}
