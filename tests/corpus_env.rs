// Corpus lookup through the TASKBENCH_CORPUS_DIR environment variable.
//
// Kept in its own test binary: it mutates process environment, which would
// race with corpus lookups in other tests.

use std::fs;

use taskbench::corpus::{Corpus, CorpusKind, CORPUS_DIR_ENV};

#[test]
fn env_dir_is_used_when_file_exists_and_ignored_otherwise() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("urls.10K"), b"http://from.env/\n").unwrap();
    std::env::set_var(CORPUS_DIR_ENV, dir.path());

    let text = Corpus::locate(CorpusKind::Text, None).unwrap();
    assert_eq!(text.bytes, b"http://from.env/\n");
    assert!(text.path.is_some());

    // No geo.protodata there: falls back to the synthetic stand-in.
    let gpb = Corpus::locate(CorpusKind::Gpb, None).unwrap();
    assert!(gpb.path.is_none());
    assert_eq!(gpb.len(), CorpusKind::Gpb.synthetic_len());

    std::env::remove_var(CORPUS_DIR_ENV);
    let text = Corpus::locate(CorpusKind::Text, None).unwrap();
    assert!(text.path.is_none());
}
