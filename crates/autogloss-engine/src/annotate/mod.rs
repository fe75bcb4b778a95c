//! # Annotation Pass
//!
//! One pass rewrites one document:
//!
//! 1. segment the content into rewritable text and protected elements
//! 2. try each matchable record in catalog order, rewriting at most one
//!    occurrence per record
//! 3. append every pending panel, in the order the records matched
//!
//! All per-pass state lives in a [`RenderState`] created inside
//! [`Annotator::annotate`], so an `Annotator` can be shared between threads
//! and reused for nested content without ids or panels leaking across
//! documents.

mod config;

pub use config::{AnnotatorConfig, PopoverMode};

use std::ops::Range;

use crate::models::{TermCatalog, TermRecord};
use crate::parsing::{Fragment, Segmenter, TermPattern, reassemble};
use crate::render::markup::{self, ElementIds};

/// One rewritten occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOccurrence {
    /// The text that was matched, with its original casing.
    pub matched_text: String,
    pub term_id: String,
    pub marker_id: String,
    pub panel_id: String,
    /// Byte offset of the match in the original content.
    pub offset: usize,
}

/// Result of a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated {
    pub html: String,
    /// True when at least one panel was produced (or on the glossary page
    /// itself), meaning the page needs the interactive assets.
    pub terms_found: bool,
    /// Rewritten occurrences in the order they were produced.
    pub occurrences: Vec<MatchOccurrence>,
}

impl Annotated {
    fn unchanged(content: &str) -> Self {
        Self {
            html: content.to_string(),
            terms_found: false,
            occurrences: Vec::new(),
        }
    }
}

/// Where the content being annotated lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub post_type: Option<String>,
    pub is_glossary_page: bool,
}

/// A match inside the rewritable fragment at `index`.
struct Hit<'a> {
    index: usize,
    text: &'a str,
    start: usize,
    range: Range<usize>,
}

/// Counter and pending panels for a single pass.
#[derive(Debug, Default)]
struct RenderState {
    counter: usize,
    panels: Vec<String>,
    occurrences: Vec<MatchOccurrence>,
}

impl RenderState {
    fn next_ids(&mut self, slug: &str) -> ElementIds {
        self.counter += 1;
        ElementIds::derive(slug, self.counter)
    }

    fn finish(self, fragments: &[Fragment<'_>], config: &AnnotatorConfig) -> Annotated {
        let mut html = reassemble(fragments);
        let terms_found = !self.panels.is_empty();

        if terms_found {
            html.push('\n');
            html.push_str(&self.panels.join("\n"));
            if let Some(text) = &config.helper_text {
                html.push('\n');
                html.push_str(&markup::render_helper(text));
            }
        }

        log::debug!("Annotation pass produced {} panel(s)", self.panels.len());

        Annotated {
            html,
            terms_found,
            occurrences: self.occurrences,
        }
    }
}

/// Rewrites the first safe occurrence of each catalog term into a marker
/// and appends the matching detail panels.
#[derive(Debug, Clone)]
pub struct Annotator {
    config: AnnotatorConfig,
    segmenter: Option<Segmenter>,
}

impl Annotator {
    pub fn new(config: AnnotatorConfig) -> Self {
        let segmenter = match Segmenter::new(&config.excluded_tags) {
            Ok(segmenter) => Some(segmenter),
            Err(e) => {
                log::warn!("Annotation disabled: {e}");
                None
            }
        };

        Self { config, segmenter }
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Runs one pass over `content`.
    ///
    /// Never fails: if the content cannot be segmented, it is returned
    /// unchanged and `terms_found` is false.
    pub fn annotate(&self, content: &str, catalog: &TermCatalog) -> Annotated {
        if content.is_empty() || catalog.has_no_matchable_terms() {
            return Annotated::unchanged(content);
        }

        let Some(segmenter) = &self.segmenter else {
            return Annotated::unchanged(content);
        };

        let mut fragments = match segmenter.segment(content) {
            Ok(fragments) => fragments,
            Err(e) => {
                log::warn!("Leaving content unannotated: {e}");
                return Annotated::unchanged(content);
            }
        };

        let mut state = RenderState::default();
        for (record, patterns) in catalog.matchers() {
            self.annotate_first_occurrence(&mut fragments, record, patterns, &mut state);
        }

        state.finish(&fragments, &self.config)
    }

    /// Like [`annotate`](Self::annotate), but honours the page context:
    /// excluded content types pass through untouched, and the glossary page
    /// itself is left alone while still reporting `terms_found`.
    pub fn annotate_page(
        &self,
        content: &str,
        catalog: &TermCatalog,
        page: &PageContext,
    ) -> Annotated {
        if let Some(post_type) = &page.post_type
            && self
                .config
                .excluded_post_types
                .iter()
                .any(|excluded| excluded == post_type)
        {
            return Annotated::unchanged(content);
        }

        if page.is_glossary_page {
            return Annotated {
                terms_found: true,
                ..Annotated::unchanged(content)
            };
        }

        self.annotate(content, catalog)
    }

    /// Tries the record's match terms in order and rewrites the first hit.
    /// Returns whether anything was rewritten.
    fn annotate_first_occurrence<'a>(
        &self,
        fragments: &mut Vec<Fragment<'a>>,
        record: &TermRecord,
        patterns: &[TermPattern],
        state: &mut RenderState,
    ) -> bool {
        for pattern in patterns {
            let found = fragments
                .iter()
                .enumerate()
                .find_map(|(index, fragment)| match fragment {
                    Fragment::Text { text, start } => pattern.find(text).map(|range| Hit {
                        index,
                        text: *text,
                        start: *start,
                        range,
                    }),
                    _ => None,
                });

            if let Some(hit) = found {
                self.rewrite(fragments, hit, record, state);
                return true;
            }
        }
        false
    }

    /// Splits the hit's fragment into text, marker, text and queues the panel.
    fn rewrite<'a>(
        &self,
        fragments: &mut Vec<Fragment<'a>>,
        hit: Hit<'a>,
        record: &TermRecord,
        state: &mut RenderState,
    ) {
        let Hit {
            index,
            text,
            start,
            range,
        } = hit;
        let matched = &text[range.clone()];
        let ids = state.next_ids(record.slug());

        log::debug!(
            "Annotating {matched:?} at byte {} as {}",
            start + range.start,
            ids.marker
        );

        let mut replacement = Vec::with_capacity(3);
        if range.start > 0 {
            replacement.push(Fragment::Text {
                text: &text[..range.start],
                start,
            });
        }
        replacement.push(Fragment::Annotated {
            html: markup::render_marker(matched, &ids, &self.config),
            start: start + range.start,
        });
        if range.end < text.len() {
            replacement.push(Fragment::Text {
                text: &text[range.end..],
                start: start + range.end,
            });
        }
        fragments.splice(index..=index, replacement);

        state
            .panels
            .push(markup::render_panel(record, &ids, &self.config));
        state.occurrences.push(MatchOccurrence {
            matched_text: matched.to_string(),
            term_id: record.id().to_string(),
            marker_id: ids.marker,
            panel_id: ids.panel,
            offset: start + range.start,
        });
    }
}
