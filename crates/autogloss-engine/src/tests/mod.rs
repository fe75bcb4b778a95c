//! Shared helpers for unit tests.

use std::path::PathBuf;

use tempfile::TempDir;

use crate::models::{TermCatalog, TermRecord};

/// Build a catalog from `(id, title)` pairs.
pub fn catalog(entries: &[(&str, &str)]) -> TermCatalog {
    let records = entries
        .iter()
        .map(|(id, title)| TermRecord::new(*id, *title))
        .collect();
    TermCatalog::new(records).unwrap()
}

pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
