use html_escape::{encode_double_quoted_attribute, encode_text};
use sha2::{Digest, Sha256};

use crate::annotate::AnnotatorConfig;
use crate::models::TermRecord;

pub const MARKER_CLASS: &str = "autogloss-term";
pub const HELPER_ID: &str = "autogloss-help";

/// Hex digits of the slug hash used in element ids.
const HASH_LEN: usize = 16;

/// The id pair linking one marker to its panel.
///
/// Derived from the record's slug and the occurrence number, so the same
/// content and catalog always produce the same ids, and two occurrences in
/// one pass never share them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    pub marker: String,
    pub panel: String,
}

impl ElementIds {
    pub fn derive(slug: &str, occurrence: usize) -> Self {
        let hash = slug_hash(slug);
        Self {
            marker: format!("dfn-{hash}-{occurrence}"),
            panel: format!("pop-{hash}-{occurrence}"),
        }
    }

    /// CSS anchor name tying the panel's position to the marker.
    pub fn anchor_name(&self) -> String {
        format!("--{}", self.marker)
    }
}

pub fn slug_hash(slug: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(slug.as_bytes());
    format!("{:x}", hasher.finalize())
        .chars()
        .take(HASH_LEN)
        .collect()
}

/// Inline marker replacing a matched term.
///
/// `matched` is copied as-is: it comes straight from a text run of the
/// document, so it is already valid markup.
pub fn render_marker(matched: &str, ids: &ElementIds, config: &AnnotatorConfig) -> String {
    let described_by = if config.helper_text.is_some() {
        format!(r#" aria-describedby="{HELPER_ID}""#)
    } else {
        String::new()
    };

    format!(
        r#"<dfn id="{marker}" class="{MARKER_CLASS}" style="anchor-name: {anchor};"><span data-glossary-popover="{panel}"{described_by} tabindex="0" role="button" aria-expanded="false">{matched}</span></dfn>"#,
        marker = ids.marker,
        anchor = ids.anchor_name(),
        panel = ids.panel,
    )
}

/// Detail panel for one occurrence of `record`.
pub fn render_panel(record: &TermRecord, ids: &ElementIds, config: &AnnotatorConfig) -> String {
    let title = encode_text(record.title());

    let mut html = format!(
        r#"<aside id="{panel}" popover="{mode}" role="tooltip" aria-labelledby="{marker}" style="position-anchor: {anchor};">"#,
        panel = ids.panel,
        mode = config.popover_mode.as_str(),
        marker = ids.marker,
        anchor = ids.anchor_name(),
    );

    // Read-more link comes first in the panel.
    if record.long_description().is_some()
        && let Some(base) = config
            .glossary_page_url
            .as_deref()
            .filter(|url| !url.is_empty())
    {
        let url = format!("{base}#{}", record.slug());
        html.push_str(&format!(
            r#"<p><a href="{}">Read more about <strong>{title}</strong></a></p>"#,
            encode_double_quoted_attribute(&url),
        ));
    }

    html.push_str(&format!(r#"<strong class="glossary-title">{title}</strong>"#));

    if !record.short_description().is_empty() {
        html.push_str(&format!("<p>{}</p>", encode_text(record.short_description())));
    }

    if config.show_synonyms && !record.synonyms().is_empty() {
        let synonyms = record
            .synonyms()
            .iter()
            .map(|s| encode_text(s))
            .collect::<Vec<_>>()
            .join(", ");
        html.push_str(&format!(
            r#"<p class="glossary-synonyms"><span class="synonyms-label">Also known as:</span> {synonyms}</p>"#
        ));
    }

    html.push_str("</aside>");
    html
}

/// Hidden paragraph referenced by every marker's `aria-describedby`.
pub fn render_helper(text: &str) -> String {
    format!(r#"<p id="{HELPER_ID}" hidden>{}</p>"#, encode_text(text))
}
