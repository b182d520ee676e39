// Integration tests for the codec adapters (codec/*.rs) over the three
// benchmark corpora.
//
// Coverage:
//   - every codec round-trips every corpus byte-for-byte
//   - compressible corpora actually shrink; the JPEG-like one stays near 1.0
//   - the parallel verifier accepts all pairs
//   - each codec rejects input that is not its own format
//   - LZF container framing on inputs straddling the chunk boundary

use taskbench::codec::{Codec, CodecKind, LzfCodec};
use taskbench::corpus::{Corpus, CorpusKind};
use taskbench::bench::verify_round_trips;

fn synthetic_corpora() -> Vec<Corpus> {
    CorpusKind::ALL.iter().map(|&k| Corpus::synthetic(k)).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round trips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn every_codec_round_trips_every_corpus() {
    for corpus in synthetic_corpora() {
        for kind in CodecKind::ALL {
            let codec = kind.codec();
            let packed = codec.compress(&corpus.bytes).unwrap();
            let unpacked = codec.decompress(&packed).unwrap();
            assert_eq!(unpacked.len(), corpus.len(), "{} on {}", kind, corpus.label());
            assert!(unpacked == corpus.bytes, "{} changed {}", kind, corpus.label());
        }
    }
}

#[test]
fn text_and_protodata_compress() {
    for kind in [CorpusKind::Text, CorpusKind::Gpb] {
        let corpus = Corpus::synthetic(kind);
        for codec_kind in CodecKind::ALL {
            let packed = codec_kind.codec().compress(&corpus.bytes).unwrap();
            assert!(
                packed.len() < corpus.len(),
                "{} did not shrink {} ({} -> {})",
                codec_kind,
                corpus.label(),
                corpus.len(),
                packed.len()
            );
        }
    }
}

#[test]
fn image_corpus_is_nearly_incompressible() {
    let corpus = Corpus::synthetic(CorpusKind::Image);
    for kind in CodecKind::ALL {
        let packed = kind.codec().compress(&corpus.bytes).unwrap();
        let ratio = packed.len() as f64 / corpus.len() as f64;
        assert!(ratio > 0.8, "{} compressed the image corpus to {:.3}", kind, ratio);
    }
}

#[test]
fn parallel_verifier_accepts_all_pairs() {
    verify_round_trips(&CodecKind::ALL, &synthetic_corpora()).unwrap();
}

#[test]
fn small_and_empty_inputs() {
    for kind in CodecKind::ALL {
        let codec = kind.codec();
        for input in [&b""[..], b"a", b"abcabcabcabcabcabc"] {
            let packed = codec.compress(input).unwrap();
            assert_eq!(codec.decompress(&packed).unwrap(), input, "{}", kind);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Malformed input
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn garbage_is_rejected() {
    // Too short for an LZ4 size prefix or an LZF chunk header; a Snappy
    // preamble promising 10 bytes that never arrive.
    let garbage = [0x0au8];
    for kind in CodecKind::ALL {
        let err = kind.codec().decompress(&garbage).unwrap_err();
        assert_eq!(err.codec, kind.name());
    }
}

#[test]
fn truncated_stream_is_rejected() {
    let corpus = Corpus::synthetic(CorpusKind::Text);
    for kind in CodecKind::ALL {
        let codec = kind.codec();
        let packed = codec.compress(&corpus.bytes).unwrap();
        let cut = &packed[..packed.len() / 2];
        assert!(codec.decompress(cut).is_err(), "{} accepted a truncated stream", kind);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LZF chunking
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn lzf_chunk_boundaries() {
    let codec = LzfCodec;
    for len in [0xFFFEusize, 0xFFFF, 0x10000, 3 * 0xFFFF + 1] {
        let input: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        let packed = codec.compress(&input).unwrap();
        assert_eq!(&packed[..2], b"ZV");
        assert_eq!(codec.decompress(&packed).unwrap(), input, "len {}", len);
    }
}
