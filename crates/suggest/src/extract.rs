//! Parsing the provider's free-text reply into a [`SuggestionResult`].
//!
//! The provider answers in natural language, so extraction is best effort. The
//! policy sits behind [`SuggestionExtractor`] so it can be replaced (for
//! example by a structured-output parser) without touching callers.

use serde::{Deserialize, Serialize};

/// Placeholder used when a section cannot be extracted.
pub const NOT_SPECIFIED: &str = "Not specified";

pub const DIAGNOSIS_LABEL: &str = "Diagnosis";
pub const MEDICATION_LABEL: &str = "Medication";

/// Word that commonly precedes a label ("Suggested Diagnosis:") and is not
/// part of the previous section.
const LABEL_PREFIX: &str = "suggested";

/// The diagnosis/medication pair parsed from one reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResult {
    pub diagnosis: String,
    pub medication: String,
}

/// Extraction policy for provider replies.
pub trait SuggestionExtractor: Send + Sync {
    /// Never fails; unreadable sections come back as a sentinel.
    fn extract(&self, text: &str) -> SuggestionResult;
}

/// Finds `<label>:` markers and takes the text after each one.
///
/// Matching is ASCII case-insensitive. A section runs from the end of its
/// marker to the start of the other marker when that marker comes later, or
/// to the end of the text. Markdown emphasis between the label and its colon
/// (`**Diagnosis**:`) is accepted, and a `Suggested` word and decoration in
/// front of the following marker are not included in the section. Absent
/// markers and empty sections yield the sentinel.
#[derive(Debug, Clone)]
pub struct LabelExtractor {
    diagnosis_label: String,
    medication_label: String,
    sentinel: String,
}

impl Default for LabelExtractor {
    fn default() -> Self {
        Self::new(DIAGNOSIS_LABEL, MEDICATION_LABEL, NOT_SPECIFIED)
    }
}

impl LabelExtractor {
    pub fn new(diagnosis_label: &str, medication_label: &str, sentinel: &str) -> Self {
        Self {
            diagnosis_label: diagnosis_label.to_ascii_lowercase(),
            medication_label: medication_label.to_ascii_lowercase(),
            sentinel: sentinel.to_string(),
        }
    }

    fn section(
        &self,
        text: &str,
        lower: &str,
        own: Option<Marker>,
        other: Option<Marker>,
    ) -> String {
        let Some(own) = own else {
            return self.sentinel.clone();
        };

        let end = match other {
            Some(other) if other.start > own.start => {
                section_end(lower, own.end, other.start)
            }
            _ => text.len(),
        };

        let body = text[own.end..end.max(own.end)].trim_matches(is_decoration);
        if body.is_empty() {
            self.sentinel.clone()
        } else {
            body.to_string()
        }
    }
}

impl SuggestionExtractor for LabelExtractor {
    fn extract(&self, text: &str) -> SuggestionResult {
        let lower = text.to_ascii_lowercase();
        let diagnosis = find_marker(&lower, &self.diagnosis_label);
        let medication = find_marker(&lower, &self.medication_label);

        SuggestionResult {
            diagnosis: self.section(text, &lower, diagnosis, medication),
            medication: self.section(text, &lower, medication, diagnosis),
        }
    }
}

/// Byte range of a label together with its trailing colon.
#[derive(Debug, Clone, Copy)]
struct Marker {
    start: usize,
    end: usize,
}

/// First `label` occurrence followed (after optional emphasis) by a colon.
///
/// `haystack` must already be ASCII-lowercased; `label` is lowercase ASCII.
fn find_marker(haystack: &str, label: &str) -> Option<Marker> {
    let bytes = haystack.as_bytes();
    let mut from = 0;

    while let Some(offset) = haystack[from..].find(label) {
        let start = from + offset;
        let mut i = start + label.len();
        while i < bytes.len() && matches!(bytes[i], b'*' | b'_' | b' ') {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b':' {
            return Some(Marker { start, end: i + 1 });
        }
        from = start + label.len();
    }

    None
}

/// Where a section ends given the start of the next marker: before any
/// decoration and `Suggested` prefix that lead into it, but never before
/// `floor`.
fn section_end(lower: &str, floor: usize, next_marker: usize) -> usize {
    let bytes = lower.as_bytes();
    let skip_back = |mut i: usize| {
        while i > floor && is_decoration_byte(bytes[i - 1]) {
            i -= 1;
        }
        i
    };

    let mut end = skip_back(next_marker);
    // The prefix must be a whole word on the same line as the marker, so
    // "rest suggested\nMedication:" keeps its last word.
    let same_line = !lower[end..next_marker].contains('\n');
    if same_line && end >= floor + LABEL_PREFIX.len() && lower[..end].ends_with(LABEL_PREFIX) {
        let prefix_start = end - LABEL_PREFIX.len();
        if prefix_start == floor || is_decoration_byte(bytes[prefix_start - 1]) {
            end = skip_back(prefix_start);
        }
    }
    end
}

fn is_decoration(c: char) -> bool {
    c.is_whitespace() || matches!(c, '*' | '_' | '#')
}

fn is_decoration_byte(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'*' | b'_' | b'#')
}
