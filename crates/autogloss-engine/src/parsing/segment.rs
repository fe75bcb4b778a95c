use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};

/// Upper bound for the compiled exclusion pattern.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    #[error("Failed to build excluded-element pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Segmentation lost content: expected {expected} bytes, got {actual}")]
    Lossy { expected: usize, actual: usize },
}

/// Names of elements whose whole span is never scanned or rewritten.
///
/// Names are normalised to lowercase ASCII letters and digits; anything else
/// is stripped and names that end up empty are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedTags(BTreeSet<String>);

impl ExcludedTags {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            tags.into_iter()
                .map(|tag| sanitize_tag_name(tag.as_ref()))
                .filter(|tag| !tag.is_empty())
                .collect(),
        )
    }

    /// Anchors plus heading levels 1 to 6.
    pub fn extended() -> Self {
        Self::new(["a", "h1", "h2", "h3", "h4", "h5", "h6"])
    }

    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ExcludedTags {
    fn default() -> Self {
        Self::new(["a"])
    }
}

/// Lowercase a tag name and strip everything but ASCII letters and digits.
pub fn sanitize_tag_name(tag: &str) -> String {
    tag.trim()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// A piece of the document being annotated.
///
/// Concatenating the fragments of a document in order always yields the
/// document. `start` is the byte offset of the fragment in the original
/// content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<'a> {
    /// Text outside any excluded element. Eligible for rewriting.
    Text { text: &'a str, start: usize },
    /// A complete excluded element, open tag through matching close tag.
    Protected { text: &'a str, start: usize },
    /// A rewritten occurrence. Protected from later terms in the same pass.
    Annotated { html: String, start: usize },
}

impl Fragment<'_> {
    pub fn as_str(&self) -> &str {
        match self {
            Fragment::Text { text, .. } | Fragment::Protected { text, .. } => text,
            Fragment::Annotated { html, .. } => html,
        }
    }

    pub fn start(&self) -> usize {
        match self {
            Fragment::Text { start, .. }
            | Fragment::Protected { start, .. }
            | Fragment::Annotated { start, .. } => *start,
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Fragment::Text { .. })
    }
}

/// Joins fragments back into a single string.
pub fn reassemble(fragments: &[Fragment<'_>]) -> String {
    let capacity = fragments.iter().map(|f| f.as_str().len()).sum();
    let mut out = String::with_capacity(capacity);
    for fragment in fragments {
        out.push_str(fragment.as_str());
    }
    out
}

/// Splits HTML into rewritable text and protected excluded-element spans.
///
/// Each excluded tag contributes one `<tag ...>...</tag>` alternative
/// (non-greedy, case-insensitive, `.` matching newlines). Nested or unclosed
/// excluded elements are matched the same lazy way: the span ends at the
/// first closing tag of the same name.
#[derive(Debug, Clone)]
pub struct Segmenter {
    pattern: Option<Regex>,
}

impl Segmenter {
    pub fn new(tags: &ExcludedTags) -> Result<Self, SegmentError> {
        if tags.is_empty() {
            return Ok(Self { pattern: None });
        }

        let alternatives = tags
            .iter()
            .map(|tag| {
                let tag = regex::escape(tag);
                format!(r"<{tag}\b[^>]*>.*?</{tag}>")
            })
            .collect::<Vec<_>>()
            .join("|");

        let pattern = RegexBuilder::new(&alternatives)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn segment<'a>(&self, content: &'a str) -> Result<Vec<Fragment<'a>>, SegmentError> {
        let Some(pattern) = &self.pattern else {
            return Ok(text_only(content));
        };

        let mut fragments = Vec::new();
        let mut last = 0;

        for m in pattern.find_iter(content) {
            if m.start() > last {
                fragments.push(Fragment::Text {
                    text: &content[last..m.start()],
                    start: last,
                });
            }
            fragments.push(Fragment::Protected {
                text: m.as_str(),
                start: m.start(),
            });
            last = m.end();
        }

        if last < content.len() {
            fragments.push(Fragment::Text {
                text: &content[last..],
                start: last,
            });
        }

        let actual: usize = fragments.iter().map(|f| f.as_str().len()).sum();
        if actual != content.len() {
            return Err(SegmentError::Lossy {
                expected: content.len(),
                actual,
            });
        }

        Ok(fragments)
    }
}

fn text_only(content: &str) -> Vec<Fragment<'_>> {
    if content.is_empty() {
        return Vec::new();
    }
    vec![Fragment::Text {
        text: content,
        start: 0,
    }]
}
