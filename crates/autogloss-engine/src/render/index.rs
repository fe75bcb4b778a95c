use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::OnceLock;

use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::Regex;

use crate::models::{TermCatalog, TermRecord};

/// Section key for titles that do not start with a Latin, Greek or Cyrillic letter.
pub const OTHER_SECTION: &str = "#";

/// Renders the glossary page: an alphabet navigation followed by one section
/// per initial letter, each listing its entries sorted by title.
///
/// Every record is listed, including those excluded from auto-linking. Each
/// entry's `<article>` carries the record slug as its id, which is what the
/// panels' "Read more" links point at. Long descriptions are trusted HTML
/// and are emitted as-is.
pub fn render_index(catalog: &TermCatalog) -> String {
    let sections = group_by_letter(catalog.records());

    let mut html = String::from(r#"<div class="autogloss-index">"#);

    if sections.is_empty() {
        html.push_str("<p>No glossary entries found.</p></div>");
        return html;
    }

    html.push_str(
        r#"<nav class="glossary-navigation" aria-label="Glossary alphabet navigation"><ul class="glossary-alphabet">"#,
    );
    for letter in sections.keys() {
        let _ = write!(
            html,
            r##"<li><a href="#{}">{}</a></li>"##,
            encode_double_quoted_attribute(&section_id(letter)),
            encode_text(letter),
        );
    }
    html.push_str("</ul></nav>");

    html.push_str(r#"<div class="glossary-entries">"#);
    for (letter, records) in &sections {
        let _ = write!(
            html,
            r#"<section class="glossary-letter-section" id="{}"><h3 class="glossary-letter-heading">{}</h3>"#,
            encode_double_quoted_attribute(&section_id(letter)),
            encode_text(letter),
        );
        for record in records {
            render_entry(&mut html, record);
        }
        html.push_str("</section>");
    }
    html.push_str("</div></div>");

    html
}

fn render_entry(html: &mut String, record: &TermRecord) {
    let _ = write!(
        html,
        r#"<article id="{}" class="glossary-entry"><h4 class="glossary-entry-title">{}</h4>"#,
        encode_double_quoted_attribute(record.slug()),
        encode_text(record.title()),
    );

    if !record.synonyms().is_empty() {
        let synonyms = record
            .synonyms()
            .iter()
            .map(|s| encode_text(s))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(
            html,
            r#"<div class="glossary-synonyms"><span class="synonyms-label">Also known as:</span> <span>{synonyms}</span></div>"#
        );
    }

    if let Some(long) = record.long_description() {
        let _ = write!(
            html,
            r#"<div class="glossary-long-description">{long}</div>"#
        );
    }

    html.push_str("</article>");
}

/// Groups records by upper-cased initial, sorting sections by key and
/// entries by case-insensitive title.
pub fn group_by_letter(records: &[TermRecord]) -> BTreeMap<String, Vec<&TermRecord>> {
    let mut sections: BTreeMap<String, Vec<&TermRecord>> = BTreeMap::new();
    for record in records {
        sections
            .entry(initial_letter(record.title()))
            .or_default()
            .push(record);
    }
    for records in sections.values_mut() {
        records.sort_by_cached_key(|record| record.title().to_lowercase());
    }
    sections
}

/// Upper-cased first character of `title`, or [`OTHER_SECTION`] when it is
/// not a Latin, Greek or Cyrillic letter.
pub fn initial_letter(title: &str) -> String {
    static LETTER_REGEX: OnceLock<Regex> = OnceLock::new();
    let letter_regex = LETTER_REGEX.get_or_init(|| {
        Regex::new(r"^[\p{Latin}\p{Greek}\p{Cyrillic}]$").expect("Invalid letter regex")
    });

    let Some(first) = title.chars().next() else {
        return OTHER_SECTION.to_string();
    };
    let letter: String = first.to_uppercase().collect();

    if letter_regex.is_match(&letter) {
        letter
    } else {
        OTHER_SECTION.to_string()
    }
}

fn section_id(letter: &str) -> String {
    format!("letter-{}", letter.to_lowercase())
}
