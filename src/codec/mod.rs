//! Compression codecs benchmarked by the harness.
//!
//! Every codec exposes the same byte-in/byte-out contract through [`Codec`],
//! so the runner invokes each family identically:
//!
//! | Kind               | Crate      | Stream layout |
//! |--------------------|------------|---------------|
//! | [`CodecKind::Snappy`] | `snap`     | raw Snappy block |
//! | [`CodecKind::Lz4`]    | `lz4_flex` | u32 LE original size + LZ4 block |
//! | [`CodecKind::Lzf`]    | `lzf`      | chunked `ZV` container, see [`lzf`] |
//!
//! For any input `b`, `decompress(compress(b)) == b`.

pub mod snappy;
pub mod lz4;
pub mod lzf;

use std::fmt;

pub use self::lz4::Lz4Codec;
pub use self::lzf::LzfCodec;
pub use self::snappy::SnappyCodec;

/// Failure to compress or decompress, tagged with the codec's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    pub codec: &'static str,
    pub message: String,
}

impl CodecError {
    pub fn new(codec: &'static str, message: impl Into<String>) -> Self {
        CodecError { codec, message: message.into() }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.codec, self.message)
    }
}

impl std::error::Error for CodecError {}

/// Byte-sequence compressor with a matching decompressor.
pub trait Codec: Send + Sync {
    /// Short lowercase name used in reports.
    fn name(&self) -> &'static str;

    fn compress(&self, src: &[u8]) -> Result<Vec<u8>, CodecError>;

    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>, CodecError>;
}

/// The codec families the harness knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum CodecKind {
    Snappy,
    Lz4,
    Lzf,
}

impl CodecKind {
    pub const ALL: [CodecKind; 3] = [CodecKind::Snappy, CodecKind::Lz4, CodecKind::Lzf];

    pub fn name(self) -> &'static str {
        match self {
            CodecKind::Snappy => snappy::NAME,
            CodecKind::Lz4 => lz4::NAME,
            CodecKind::Lzf => lzf::NAME,
        }
    }

    /// A fresh codec instance of this kind.
    pub fn codec(self) -> Box<dyn Codec> {
        match self {
            CodecKind::Snappy => Box::new(SnappyCodec),
            CodecKind::Lz4 => Box::new(Lz4Codec),
            CodecKind::Lzf => Box::new(LzfCodec),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_codec_names() {
        for kind in CodecKind::ALL {
            assert_eq!(kind.codec().name(), kind.name());
        }
    }

    #[test]
    fn empty_input_round_trips() {
        for kind in CodecKind::ALL {
            let codec = kind.codec();
            let packed = codec.compress(&[]).unwrap();
            assert_eq!(codec.decompress(&packed).unwrap(), Vec::<u8>::new(), "{}", kind);
        }
    }
}
