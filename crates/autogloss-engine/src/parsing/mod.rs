//! # Content Parsing
//!
//! Splits HTML into zones that may or may not be rewritten, and finds term
//! occurrences inside the rewritable ones.
//!
//! ## Modules
//!
//! - **`segment`**: `Segmenter` turns content into `Fragment`s. Whole
//!   excluded elements (anchors by default, optionally headings) become
//!   protected fragments; everything else is rewritable text.
//! - **`matcher`**: `TermPattern`, a word-bounded, escaped search for one
//!   term that refuses to match inside tag attributes.
//!
//! ## Protected Zones
//!
//! Protected fragments are never searched. A rewritten occurrence is itself
//! stored as a protected fragment, so a shorter term can never match inside
//! the marker produced for a longer one.

pub mod matcher;
pub mod segment;

pub use matcher::TermPattern;
pub use segment::{
    ExcludedTags, Fragment, SegmentError, Segmenter, reassemble, sanitize_tag_name,
};
