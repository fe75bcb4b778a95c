pub mod annotate;
pub mod io;
pub mod models;
pub mod parsing;
pub mod render;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use annotate::{
    Annotated, Annotator, AnnotatorConfig, MatchOccurrence, PageContext, PopoverMode,
};
pub use io::*;
pub use models::{CatalogError, TermCatalog, TermRecord, slugify};
pub use parsing::{ExcludedTags, Fragment, SegmentError, Segmenter};
pub use render::render_index;
