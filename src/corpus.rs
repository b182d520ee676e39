//! Benchmark corpora.
//!
//! Three fixed inputs of different character are benchmarked:
//!
//! | Kind                  | Resource         | Content |
//! |-----------------------|------------------|---------|
//! | [`CorpusKind::Text`]  | `urls.10K`       | newline-separated URLs |
//! | [`CorpusKind::Gpb`]   | `geo.protodata`  | protocol-buffer encoded records |
//! | [`CorpusKind::Image`] | `fireworks.jpeg` | JPEG image (already entropy coded) |
//!
//! When `TASKBENCH_CORPUS_DIR` names a directory holding these files they are
//! read from there. Otherwise a deterministic synthetic stand-in of the same
//! character and size is generated, so benchmarks and tests always have input.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming a directory with the real corpus files.
pub const CORPUS_DIR_ENV: &str = "TASKBENCH_CORPUS_DIR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum CorpusKind {
    Text,
    Gpb,
    Image,
}

impl CorpusKind {
    pub const ALL: [CorpusKind; 3] = [CorpusKind::Text, CorpusKind::Gpb, CorpusKind::Image];

    /// File name of the bundled resource.
    pub fn resource_name(self) -> &'static str {
        match self {
            CorpusKind::Text => "urls.10K",
            CorpusKind::Gpb => "geo.protodata",
            CorpusKind::Image => "fireworks.jpeg",
        }
    }

    /// Size of the synthetic stand-in, matching the original resource.
    pub fn synthetic_len(self) -> usize {
        match self {
            CorpusKind::Text => 702_087,
            CorpusKind::Gpb => 118_588,
            CorpusKind::Image => 123_093,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CorpusKind::Text => "text",
            CorpusKind::Gpb => "gpb",
            CorpusKind::Image => "image",
        }
    }
}

impl fmt::Display for CorpusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A loaded corpus: its kind, where it came from, and its bytes.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub kind: CorpusKind,
    /// `None` for a synthetic corpus.
    pub path: Option<PathBuf>,
    pub bytes: Vec<u8>,
}

impl Corpus {
    /// Read `dir/<resource_name>`.
    pub fn load(kind: CorpusKind, dir: &Path) -> io::Result<Corpus> {
        let path = dir.join(kind.resource_name());
        let bytes = fs::read(&path)
            .map_err(|e| io::Error::new(e.kind(), format!("cannot read corpus {}: {}", path.display(), e)))?;
        Ok(Corpus { kind, path: Some(path), bytes })
    }

    /// Deterministic stand-in for `kind`.
    pub fn synthetic(kind: CorpusKind) -> Corpus {
        let len = kind.synthetic_len();
        let bytes = match kind {
            CorpusKind::Text => synthetic_urls(len, 0),
            CorpusKind::Gpb => synthetic_protodata(len, 0),
            CorpusKind::Image => synthetic_jpeg(len, 0),
        };
        Corpus { kind, path: None, bytes }
    }

    /// Load from `dir` if given, else from [`CORPUS_DIR_ENV`] when the file
    /// exists there, else fall back to [`Corpus::synthetic`].
    ///
    /// An explicit `dir` that lacks the file is an error; the environment
    /// variable is only a hint.
    pub fn locate(kind: CorpusKind, dir: Option<&Path>) -> io::Result<Corpus> {
        if let Some(dir) = dir {
            return Corpus::load(kind, dir);
        }
        if let Some(dir) = std::env::var_os(CORPUS_DIR_ENV) {
            let dir = PathBuf::from(dir);
            if dir.join(kind.resource_name()).is_file() {
                return Corpus::load(kind, &dir);
            }
        }
        Ok(Corpus::synthetic(kind))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Label for reports: the file name, or `<kind> (synthetic)`.
    pub fn label(&self) -> String {
        match &self.path {
            Some(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string()),
            None => format!("{} (synthetic)", self.kind),
        }
    }
}

/// Load every kind in `kinds`, in order.
pub fn load_all(kinds: &[CorpusKind], dir: Option<&Path>) -> io::Result<Vec<Corpus>> {
    kinds.iter().map(|&k| Corpus::locate(k, dir)).collect()
}

// ── Synthetic generators ──────────────────────────────────────────────────────

/// 32-bit multiplicative/rotating PRNG; cheap and reproducible across platforms.
struct Rng(u32);

impl Rng {
    fn new(seed: u32) -> Self {
        Rng(seed ^ 0x5EED_1234)
    }

    /// Uniform value in `0..range`.
    #[inline]
    fn below(&mut self, range: u32) -> u32 {
        const PRIME1: u32 = 2_654_435_761;
        const PRIME2: u32 = 2_246_822_519;
        let mut r = self.0;
        r = r.wrapping_mul(PRIME1);
        r ^= PRIME2;
        r = r.rotate_left(13);
        self.0 = r;
        ((r as u64 * range as u64) >> 32) as u32
    }

    #[inline]
    fn byte(&mut self) -> u8 {
        self.below(256) as u8
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u32) as usize]
    }
}

static HOSTS: &[&str] = &[
    "www.google", "maps.google", "news.bbc", "en.wikipedia", "www.amazon", "www.ebay",
    "mail.yahoo", "www.nytimes", "code.github", "docs.python", "www.reddit", "www.imdb",
];
static TLDS: &[&str] = &["com", "org", "net", "co.uk", "de", "io"];
static SEGMENTS: &[&str] = &[
    "search", "index", "wiki", "news", "article", "images", "story", "products",
    "category", "user", "profile", "2007", "2008", "archive", "view", "item",
];
static PARAMS: &[&str] = &["q", "id", "hl", "page", "ref", "sid", "lang", "start"];

/// Newline-separated URL list.
fn synthetic_urls(len: usize, seed: u32) -> Vec<u8> {
    let mut rng = Rng::new(seed);
    let mut out = String::with_capacity(len + 128);
    while out.len() < len {
        out.push_str("http://");
        out.push_str(rng.pick(HOSTS));
        out.push('.');
        out.push_str(rng.pick(TLDS));
        for _ in 0..=rng.below(4) {
            out.push('/');
            out.push_str(rng.pick(SEGMENTS));
        }
        if rng.below(3) == 0 {
            out.push_str(".html");
        }
        for i in 0..rng.below(3) {
            out.push(if i == 0 { '?' } else { '&' });
            out.push_str(rng.pick(PARAMS));
            out.push('=');
            out.push_str(&rng.below(100_000).to_string());
        }
        out.push('\n');
    }
    let mut bytes = out.into_bytes();
    bytes.truncate(len);
    bytes
}

fn push_varint(out: &mut Vec<u8>, mut v: u64) {
    while v >= 0x80 {
        out.push((v as u8) | 0x80);
        v >>= 7;
    }
    out.push(v as u8);
}

/// Protocol-buffer style records: varint fields, fixed64 coordinates, and
/// length-delimited place names.
fn synthetic_protodata(len: usize, seed: u32) -> Vec<u8> {
    let mut rng = Rng::new(seed.wrapping_add(1));
    let mut out = Vec::with_capacity(len + 64);
    let mut record = Vec::with_capacity(64);
    while out.len() < len {
        record.clear();
        // field 1, varint: id
        record.push(0x08);
        push_varint(&mut record, rng.below(1 << 24) as u64);
        // field 2, fixed64: latitude; field 3, fixed64: longitude
        for tag in [0x11u8, 0x19] {
            record.push(tag);
            let micro = rng.below(180_000_000) as u64;
            record.extend_from_slice(&micro.to_le_bytes());
        }
        // field 4, length-delimited: name
        let name = format!("{} {}", rng.pick(SEGMENTS), rng.pick(HOSTS));
        record.push(0x22);
        push_varint(&mut record, name.len() as u64);
        record.extend_from_slice(name.as_bytes());
        // field 5, varint: small enum
        record.push(0x28);
        push_varint(&mut record, rng.below(8) as u64);

        // Each record is itself a length-delimited field 1 of the outer message.
        out.push(0x0a);
        push_varint(&mut out, record.len() as u64);
        out.extend_from_slice(&record);
    }
    out.truncate(len);
    out
}

/// JFIF header, high-entropy scan data, EOI marker.
fn synthetic_jpeg(len: usize, seed: u32) -> Vec<u8> {
    const HEADER: &[u8] = &[
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00,
        0x00, 0x48, 0x00, 0x48, 0x00, 0x00, 0xFF, 0xDA,
    ];
    const TRAILER: &[u8] = &[0xFF, 0xD9];
    let mut rng = Rng::new(seed.wrapping_add(2));
    let mut out = Vec::with_capacity(len.max(HEADER.len() + TRAILER.len()));
    out.extend_from_slice(HEADER);
    while out.len() + TRAILER.len() < len {
        let b = rng.byte();
        out.push(b);
        // Byte stuffing: a 0xFF in scan data is always followed by 0x00.
        if b == 0xFF && out.len() + TRAILER.len() < len {
            out.push(0x00);
        }
    }
    out.extend_from_slice(TRAILER);
    out
}
