use serde::{Deserialize, Serialize};

use crate::parsing::ExcludedTags;

/// Value of the panel's `popover` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopoverMode {
    /// Light-dismiss: the browser closes the panel on outside interaction.
    #[default]
    Auto,
    /// The panel stays open until script closes it.
    Manual,
}

impl PopoverMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PopoverMode::Auto => "auto",
            PopoverMode::Manual => "manual",
        }
    }
}

/// Options for one [`Annotator`](super::Annotator).
///
/// The default excludes anchors only; use [`ExcludedTags::extended`] to
/// also leave headings alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatorConfig {
    /// Elements whose content is never scanned or rewritten.
    pub excluded_tags: ExcludedTags,
    /// Base URL of the glossary page. Enables "Read more" links.
    pub glossary_page_url: Option<String>,
    /// Content types that are passed through untouched by
    /// [`Annotator::annotate_page`](super::Annotator::annotate_page).
    pub excluded_post_types: Vec<String>,
    pub popover_mode: PopoverMode,
    /// List synonyms inside each panel.
    pub show_synonyms: bool,
    /// Screen-reader hint appended once per document when any term matched.
    pub helper_text: Option<String>,
}
