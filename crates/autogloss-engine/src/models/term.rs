/// Slug for records whose title and id have no letters or digits.
const FALLBACK_SLUG: &str = "term";

/// One glossary entry with its matchable strings and descriptions.
///
/// Records are built with [`TermRecord::new`] and the `with_*` setters, then
/// validated when they are collected into a [`TermCatalog`](super::TermCatalog).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRecord {
    id: String,
    title: String,
    slug: String,
    synonyms: Vec<String>,
    short_description: String,
    long_description: Option<String>,
    case_sensitive: bool,
    auto_link_disabled: bool,
}

impl TermRecord {
    /// Create a record from its stable id and canonical title.
    ///
    /// The title is trimmed and the slug is derived from it. A title with no
    /// letters or digits takes its slug from the id instead, and failing
    /// that becomes `term`.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        let title = title.into().trim().to_string();
        let slug = [slugify(&title), slugify(&id)]
            .into_iter()
            .find(|slug| !slug.is_empty())
            .unwrap_or_else(|| FALLBACK_SLUG.to_string());

        Self {
            id,
            title,
            slug,
            synonyms: Vec::new(),
            short_description: String::new(),
            long_description: None,
            case_sensitive: false,
            auto_link_disabled: false,
        }
    }

    /// Replace the synonym list. Blank synonyms are dropped.
    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms
            .into_iter()
            .map(|s| s.into().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    pub fn with_short_description(mut self, text: impl Into<String>) -> Self {
        self.short_description = text.into();
        self
    }

    /// Set the HTML-bearing description shown on the glossary page.
    /// An empty or whitespace-only value clears it.
    pub fn with_long_description(mut self, html: impl Into<String>) -> Self {
        let html = html.into();
        self.long_description = if html.trim().is_empty() {
            None
        } else {
            Some(html)
        };
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_auto_link_disabled(mut self, disabled: bool) -> Self {
        self.auto_link_disabled = disabled;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }

    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    pub fn long_description(&self) -> Option<&str> {
        self.long_description.as_deref()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn is_auto_link_disabled(&self) -> bool {
        self.auto_link_disabled
    }

    /// The strings searched for in content: the title first, then synonyms
    /// in their stored order.
    pub fn match_terms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.title.as_str()).chain(self.synonyms.iter().map(String::as_str))
    }

    /// Character count of the longest entry in [`match_terms`](Self::match_terms).
    pub fn longest_term_len(&self) -> usize {
        self.match_terms()
            .map(|term| term.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Derive a URL-safe slug from a title.
///
/// Letters and digits are lowercased and kept (including non-ASCII ones);
/// every other run of characters collapses to a single `-`, and leading or
/// trailing dashes are removed.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_match_terms_start_with_title() {
        let record = TermRecord::new("1", "Cache").with_synonyms(["Buffer", "Store"]);

        let terms: Vec<_> = record.match_terms().collect();

        assert_eq!(terms, vec!["Cache", "Buffer", "Store"]);
    }

    #[test]
    fn test_blank_synonyms_are_dropped() {
        let record = TermRecord::new("1", "Cache").with_synonyms(["", "  ", " Buffer "]);

        assert_eq!(record.synonyms(), &["Buffer".to_string()]);
    }

    #[test]
    fn test_longest_term_len_counts_characters() {
        // "Ünïcödé" is 7 characters but more bytes
        let record = TermRecord::new("1", "abc").with_synonyms(["Ünïcödé"]);

        assert_eq!(record.longest_term_len(), 7);
    }

    #[test]
    fn test_blank_long_description_is_none() {
        let record = TermRecord::new("1", "Cache").with_long_description("   ");

        assert_eq!(record.long_description(), None);
    }

    #[test]
    fn test_title_is_trimmed() {
        let record = TermRecord::new("1", "  Cache eviction ");

        assert_eq!(record.title(), "Cache eviction");
        assert_eq!(record.slug(), "cache-eviction");
    }

    #[test]
    fn test_symbol_only_title_takes_slug_from_id() {
        assert_eq!(TermRecord::new("Item 42", "???").slug(), "item-42");
        assert_eq!(TermRecord::new("#", "???").slug(), "term");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Cache Eviction"), "cache-eviction");
        assert_eq!(slugify("  C++ & Rust!  "), "c-rust");
        assert_eq!(slugify("API/REST"), "api-rest");
        assert_eq!(slugify("Ärger"), "ärger");
        assert_eq!(slugify("---"), "");
    }
}
