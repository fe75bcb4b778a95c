use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::models::{CatalogError, TermCatalog, TermRecord};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// On-disk catalog: a list of `[[term]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "term")]
    terms: Vec<TermEntry>,
}

#[derive(Debug, Deserialize)]
struct TermEntry {
    id: EntryId,
    title: String,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    short_description: String,
    #[serde(default)]
    long_description: String,
    #[serde(default)]
    case_sensitive: bool,
    #[serde(default)]
    disable_autolink: bool,
}

/// Ids may be written as integers (CMS post ids) or strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EntryId {
    Number(i64),
    Text(String),
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        match id {
            EntryId::Number(n) => n.to_string(),
            EntryId::Text(s) => s,
        }
    }
}

impl From<TermEntry> for TermRecord {
    fn from(entry: TermEntry) -> Self {
        TermRecord::new(entry.id, entry.title)
            .with_synonyms(entry.synonyms)
            .with_short_description(entry.short_description)
            .with_long_description(entry.long_description)
            .with_case_sensitive(entry.case_sensitive)
            .with_auto_link_disabled(entry.disable_autolink)
    }
}

/// Read an HTML document
pub fn read_content(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write an HTML document, creating parent directories as needed
pub fn write_content(path: &Path, content: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(path, content).map_err(IoError::Io)
}

/// Load and validate a TOML catalog file
pub fn load_catalog(path: &Path) -> Result<TermCatalog, IoError> {
    let source = read_content(path)?;
    parse_catalog(&source, path)
}

/// Parse catalog TOML. `origin` is only used in error messages.
pub fn parse_catalog(source: &str, origin: &Path) -> Result<TermCatalog, IoError> {
    let file: CatalogFile = toml::from_str(source).map_err(|source| IoError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;

    let records = file.terms.into_iter().map(TermRecord::from).collect();
    Ok(TermCatalog::new(records)?)
}
