pub mod catalog;
pub mod term;

pub use catalog::{CatalogError, TermCatalog};
pub use term::{TermRecord, slugify};
