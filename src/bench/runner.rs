//! Benchmark runner: timed round trips of one codec over one corpus, and the
//! codec × corpus sweep built on top of it.
//!
//! Each iteration compresses the whole corpus, decompresses the result, and
//! checks that the output has the original length and XXH64 checksum. A
//! mismatch aborts the pair with `InvalidData`; it is never reported as a
//! timing.

use std::io;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh64::xxh64;

use super::config::{BenchConfig, MB};
use crate::codec::{Codec, CodecError, CodecKind};
use crate::corpus::Corpus;

/// Outcome of benchmarking one codec on one corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchResult {
    pub codec: String,
    pub corpus: String,
    pub original_len: usize,
    pub compressed_len: usize,
    pub iterations: u32,
    /// Total wall time spent compressing across measured iterations.
    pub compress_ns: u64,
    /// Total wall time spent decompressing across measured iterations.
    pub decompress_ns: u64,
}

impl BenchResult {
    /// Compressed size over original size; 1.0 for an empty corpus.
    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 {
            1.0
        } else {
            self.compressed_len as f64 / self.original_len as f64
        }
    }

    /// Complete round trips per second.
    pub fn ops_per_sec(&self) -> f64 {
        let total = (self.compress_ns + self.decompress_ns).max(1);
        self.iterations as f64 * 1e9 / total as f64
    }

    pub fn compress_mb_s(&self) -> f64 {
        throughput_mb_s(self.original_len, self.iterations, self.compress_ns)
    }

    pub fn decompress_mb_s(&self) -> f64 {
        throughput_mb_s(self.original_len, self.iterations, self.decompress_ns)
    }
}

fn throughput_mb_s(len: usize, iterations: u32, ns: u64) -> f64 {
    (len as f64 * iterations as f64 / MB as f64) / (ns.max(1) as f64 / 1e9)
}

fn codec_failure(e: CodecError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Decompress `packed` and check it against the original length and checksum.
fn verify(codec: &dyn Codec, packed: &[u8], original_len: usize, checksum: u64) -> io::Result<()> {
    let unpacked = codec.decompress(packed).map_err(codec_failure)?;
    check_round_trip(codec.name(), &unpacked, original_len, checksum)
}

fn check_round_trip(name: &str, unpacked: &[u8], original_len: usize, checksum: u64) -> io::Result<()> {
    if unpacked.len() != original_len {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: decompressed {} bytes, expected {}", name, unpacked.len(), original_len),
        ));
    }
    if xxh64(unpacked, 0) != checksum {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: decompressed data differs from the original", name),
        ));
    }
    Ok(())
}

/// Benchmark `codec` on `corpus`.
///
/// Runs `config.warmup_iterations` unmeasured round trips, then
/// `config.iterations` measured ones, verifying every round trip.
pub fn bench_codec(codec: &dyn Codec, corpus: &Corpus, config: &BenchConfig) -> io::Result<BenchResult> {
    let src = corpus.bytes.as_slice();
    let checksum = xxh64(src, 0);
    let label = corpus.label();

    if config.display_level >= 3 {
        eprintln!("{} on {}: {} warm-up, {} measured iterations", codec.name(), label, config.warmup_iterations, config.iterations);
    }

    for _ in 0..config.warmup_iterations {
        let packed = codec.compress(src).map_err(codec_failure)?;
        verify(codec, &packed, src.len(), checksum)?;
    }

    let iterations = config.iterations.max(1);
    let mut compress_ns: u64 = 0;
    let mut decompress_ns: u64 = 0;
    let mut compressed_len = 0;

    for _ in 0..iterations {
        let start = Instant::now();
        let packed = codec.compress(src).map_err(codec_failure)?;
        compress_ns += start.elapsed().as_nanos() as u64;
        compressed_len = packed.len();

        if config.display_level >= 4 {
            eprintln!("Compression Ratio [{}] / [{}] bytes w/ corpus {}", packed.len(), src.len(), label);
        }

        let start = Instant::now();
        let unpacked = codec.decompress(&packed).map_err(codec_failure)?;
        decompress_ns += start.elapsed().as_nanos() as u64;

        if config.display_level >= 4 {
            eprintln!("Decompression [{}] == [{}] bytes", unpacked.len(), src.len());
        }
        check_round_trip(codec.name(), &unpacked, src.len(), checksum)?;
    }

    Ok(BenchResult {
        codec: codec.name().to_owned(),
        corpus: label,
        original_len: src.len(),
        compressed_len,
        iterations,
        compress_ns,
        decompress_ns,
    })
}

/// Benchmark every codec in `codecs` against every corpus, codec-major.
///
/// A failing pair is reported and skipped; the sweep continues and an error
/// is returned at the end if any pair failed.
pub fn bench_all(codecs: &[CodecKind], corpora: &[Corpus], config: &BenchConfig) -> io::Result<Vec<BenchResult>> {
    let mut results = Vec::with_capacity(codecs.len() * corpora.len());
    let mut bench_error = false;
    for &kind in codecs {
        let codec = kind.codec();
        for corpus in corpora {
            match bench_codec(codec.as_ref(), corpus, config) {
                Ok(r) => {
                    if config.display_level >= 2 {
                        eprintln!("{}", format_line(&r));
                    }
                    results.push(r);
                }
                Err(e) => {
                    if config.display_level >= 1 {
                        eprintln!("bench error for {} on {}: {}", kind, corpus.label(), e);
                    }
                    bench_error = true;
                }
            }
        }
    }
    if bench_error {
        Err(io::Error::new(io::ErrorKind::Other, "benchmark reported errors"))
    } else {
        Ok(results)
    }
}

/// Check `decompress(compress(b)) == b` for every codec × corpus pair, in parallel.
pub fn verify_round_trips(codecs: &[CodecKind], corpora: &[Corpus]) -> Result<(), CodecError> {
    let pairs: Vec<(CodecKind, &Corpus)> = codecs
        .iter()
        .flat_map(|&k| corpora.iter().map(move |c| (k, c)))
        .collect();
    pairs.par_iter().try_for_each(|&(kind, corpus)| {
        let codec = kind.codec();
        let packed = codec.compress(&corpus.bytes)?;
        let unpacked = codec.decompress(&packed)?;
        if unpacked != corpus.bytes {
            return Err(CodecError::new(
                codec.name(),
                format!("round trip of {} changed the data", corpus.label()),
            ));
        }
        Ok(())
    })
}

/// One human-readable result line.
pub fn format_line(r: &BenchResult) -> String {
    format!(
        "{:<7} {:<26} {:>10} -> {:>10} ({:>6.3}) {:>9.1} MB/s {:>9.1} MB/s {:>10.2} ops/s",
        r.codec,
        r.corpus,
        r.original_len,
        r.compressed_len,
        r.ratio(),
        r.compress_mb_s(),
        r.decompress_mb_s(),
        r.ops_per_sec(),
    )
}
