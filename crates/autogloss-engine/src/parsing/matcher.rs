use std::ops::Range;

use regex::{Regex, RegexBuilder};

/// Word-bounded search pattern for a single match term.
///
/// The term is escaped, so regex metacharacters in it match literally.
/// Matches that sit inside an unclosed tag (the next `<` or `>` after the
/// match is a `>`) are rejected, which keeps attribute values such as
/// `title="widget"` from being rewritten.
#[derive(Debug, Clone)]
pub struct TermPattern {
    regex: Regex,
}

impl TermPattern {
    pub fn new(term: &str, case_sensitive: bool) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(term)))
            .case_insensitive(!case_sensitive)
            .unicode(true)
            .build()?;
        Ok(Self { regex })
    }

    /// Byte range of the first eligible occurrence in `text`.
    pub fn find(&self, text: &str) -> Option<Range<usize>> {
        let mut at = 0;
        while let Some(m) = self.regex.find_at(text, at) {
            if !inside_tag(&text[m.end()..]) {
                return Some(m.range());
            }
            at = next_char_boundary(text, m.start());
        }
        None
    }
}

/// True when `rest` closes a tag before it opens a new one.
fn inside_tag(rest: &str) -> bool {
    rest.find(['<', '>'])
        .is_some_and(|index| rest.as_bytes()[index] == b'>')
}

fn next_char_boundary(text: &str, index: usize) -> usize {
    text[index..]
        .chars()
        .next()
        .map_or(text.len(), |ch| index + ch.len_utf8())
}
