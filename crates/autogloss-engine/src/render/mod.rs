//! HTML produced by the engine: markers and panels for annotated terms
//! (`markup`) and the standalone glossary page (`index`).

pub mod index;
pub mod markup;

pub use index::render_index;
pub use markup::{ElementIds, HELPER_ID, MARKER_CLASS};
