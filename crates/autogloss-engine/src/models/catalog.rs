use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use super::term::TermRecord;
use crate::parsing::TermPattern;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Term record has an empty id (title: {title:?})")]
    EmptyId { title: String },
    #[error("Term record {id:?} has an empty title")]
    EmptyTitle { id: String },
    #[error("Duplicate term record id: {0:?}")]
    DuplicateId(String),
    #[error("Term records {first:?} and {second:?} share the slug {slug:?}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}

/// A matchable record and its compiled match terms, in match-term order.
#[derive(Debug, Clone)]
struct CompiledRecord {
    index: usize,
    patterns: Vec<TermPattern>,
}

/// A validated collection of term records.
///
/// Keeps every record in its input order (for the glossary page) and
/// separately the order in which records are tried against content:
/// auto-link-disabled records are left out, and the rest are sorted by
/// their longest match term, longest first. Ties keep their input order.
///
/// Match patterns are compiled once here and reused by every pass.
#[derive(Debug, Clone, Default)]
pub struct TermCatalog {
    records: Vec<TermRecord>,
    match_order: Vec<CompiledRecord>,
}

impl TermCatalog {
    pub fn new(records: Vec<TermRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut slugs: HashMap<&str, &str> = HashMap::with_capacity(records.len());
        for record in &records {
            if record.id().trim().is_empty() {
                return Err(CatalogError::EmptyId {
                    title: record.title().to_string(),
                });
            }
            if record.title().is_empty() {
                return Err(CatalogError::EmptyTitle {
                    id: record.id().to_string(),
                });
            }
            if !seen.insert(record.id()) {
                return Err(CatalogError::DuplicateId(record.id().to_string()));
            }
            // Slugs become element ids on the glossary page
            if let Some(first) = slugs.insert(record.slug(), record.id()) {
                return Err(CatalogError::DuplicateSlug {
                    slug: record.slug().to_string(),
                    first: first.to_string(),
                    second: record.id().to_string(),
                });
            }
        }

        let mut order: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| !record.is_auto_link_disabled())
            .map(|(index, _)| index)
            .collect();
        // sort_by_key is stable, so equal lengths keep the loader's order
        order.sort_by_key(|&index| Reverse(records[index].longest_term_len()));

        let match_order = order
            .into_iter()
            .map(|index| CompiledRecord {
                index,
                patterns: compile_patterns(&records[index]),
            })
            .collect();

        Ok(Self {
            records,
            match_order,
        })
    }

    /// All records in input order, including auto-link-disabled ones.
    pub fn records(&self) -> &[TermRecord] {
        &self.records
    }

    /// Records eligible for matching, in the order they are attempted.
    pub fn match_order(&self) -> impl Iterator<Item = &TermRecord> {
        self.match_order
            .iter()
            .map(|compiled| &self.records[compiled.index])
    }

    /// Like [`match_order`](Self::match_order), paired with each record's
    /// compiled match terms.
    pub fn matchers(&self) -> impl Iterator<Item = (&TermRecord, &[TermPattern])> {
        self.match_order
            .iter()
            .map(|compiled| (&self.records[compiled.index], compiled.patterns.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when no record takes part in matching.
    pub fn has_no_matchable_terms(&self) -> bool {
        self.match_order.is_empty()
    }
}

/// Terms that fail to compile are logged and left out.
fn compile_patterns(record: &TermRecord) -> Vec<TermPattern> {
    record
        .match_terms()
        .filter_map(
            |term| match TermPattern::new(term, record.is_case_sensitive()) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    log::warn!("Skipping term {term:?} of record {:?}: {e}", record.id());
                    None
                }
            },
        )
        .collect()
}
