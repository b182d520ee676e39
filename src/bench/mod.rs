//! Compression benchmark entry points.
//!
//! [`bench_corpora`] is the primary public API: it resolves the requested
//! corpora (real files or synthetic stand-ins), times every requested codec
//! against each of them, and returns the results. Internally, work is
//! dispatched to:
//!
//! - [`runner::bench_codec`]: timed, verified round trips of one codec over
//!   one corpus.
//! - [`runner::bench_all`]: the codec × corpus sweep.
//! - [`report`]: table and JSON output.
//!
//! [`config::BenchConfig`] controls verbosity and iteration counts.

pub mod config;
pub mod runner;
pub mod report;

pub use config::BenchConfig;
pub use report::{format_report, read_json, write_json};
pub use runner::{bench_all, bench_codec, verify_round_trips, BenchResult};

use std::io;
use std::path::Path;

use crate::codec::CodecKind;
use crate::corpus::{self, CorpusKind};

/// Benchmark `codecs` against the corpora named by `kinds`.
///
/// Empty `codecs` or `kinds` mean "all of them". `corpus_dir`, when given,
/// must contain the resource files; otherwise they are looked up through the
/// corpus environment variable, falling back to synthetic data.
///
/// # Errors
/// Returns `Err` if a corpus cannot be read or any pair fails to round-trip.
pub fn bench_corpora(
    codecs: &[CodecKind],
    kinds: &[CorpusKind],
    corpus_dir: Option<&Path>,
    config: &BenchConfig,
) -> io::Result<Vec<BenchResult>> {
    let all_codecs = CodecKind::ALL;
    let all_kinds = CorpusKind::ALL;
    let codecs = if codecs.is_empty() { &all_codecs[..] } else { codecs };
    let kinds = if kinds.is_empty() { &all_kinds[..] } else { kinds };

    let corpora = corpus::load_all(kinds, corpus_dir)?;
    if config.display_level >= 3 {
        for c in &corpora {
            eprintln!("Loaded {} ({} bytes)", c.label(), c.len());
        }
    }
    if codecs.len() * corpora.len() > 1 && config.display_level >= 2 {
        eprintln!("Benchmarking {} codecs on {} corpora", codecs.len(), corpora.len());
    }
    bench_all(codecs, &corpora, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> BenchConfig {
        let mut config = BenchConfig::default();
        config.set_iterations(1).set_warmup_iterations(0).set_notification_level(0);
        config
    }

    #[test]
    fn bench_corpora_single_pair() {
        let results = bench_corpora(&[CodecKind::Snappy], &[CorpusKind::Gpb], None, &quick()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].codec, "snappy");
    }

    #[test]
    fn bench_corpora_missing_dir_returns_err() {
        let result = bench_corpora(&[], &[CorpusKind::Text], Some(Path::new("/nonexistent/corpus")), &quick());
        assert!(result.is_err());
    }
}
