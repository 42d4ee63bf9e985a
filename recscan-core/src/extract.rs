// Parsing of the "USEFUL RESOURCES:" list out of a video description

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

// Header, then everything up to the first blank line or the end of the text.
static SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)USEFUL RESOURCES:\s*(.*?)\s*(?:\n\n|\z)").unwrap()
});

// `<n>. <title> : <http(s) url>`; the title is the shortest run before the colon.
static ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.\s*(.*?)\s*:\s*(https?://\S+)").unwrap());

static NUMBERED_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*\d+\.").unwrap());

/// One `(title, link)` pair from a resources list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub title: String,
    pub link: String,
}

impl ResourceEntry {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

impl From<(&str, &str)> for ResourceEntry {
    fn from((title, link): (&str, &str)) -> Self {
        Self::new(title, link)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Whether the description had a resources section at all.
    pub has_section: bool,
    pub entries: Vec<ResourceEntry>,
    /// Numbered lines in the section that did not parse as an entry.
    pub skipped_entries: usize,
}

/// Section body following the header, if the description has one.
pub fn resources_section(description: &str) -> Option<&str> {
    SECTION_RE
        .captures(description)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extract the resource entries of `description`, in source order.
///
/// Entries that do not have the exact `<n>. <title> : <url>` shape are
/// dropped without error.
pub fn extract(description: &str) -> Vec<ResourceEntry> {
    extract_with_report(description).entries
}

pub fn extract_with_report(description: &str) -> ExtractionReport {
    let Some(section) = resources_section(description) else {
        return ExtractionReport::default();
    };

    let mut entry_starts = Vec::new();
    let entries: Vec<ResourceEntry> = ENTRY_RE
        .captures_iter(section)
        .map(|caps| {
            entry_starts.push(caps.get(0).map_or(0, |m| m.start()));
            ResourceEntry::new(&caps[1], &caps[2])
        })
        .collect();

    let skipped_entries = skipped_lines(section, &entry_starts);
    if skipped_entries > 0 {
        debug!(
            "Dropped {} malformed resource entr{} ({} parsed)",
            skipped_entries,
            if skipped_entries == 1 { "y" } else { "ies" },
            entries.len()
        );
    }

    ExtractionReport {
        has_section: true,
        entries,
        skipped_entries,
    }
}

// A numbered line counts as skipped when no entry starts on it.
fn skipped_lines(section: &str, entry_starts: &[usize]) -> usize {
    let mut skipped = 0;
    let mut line_start = 0;
    for line in section.split('\n') {
        let line_end = line_start + line.len();
        if NUMBERED_LINE_RE.is_match(line)
            && !entry_starts
                .iter()
                .any(|&start| start >= line_start && start <= line_end)
        {
            skipped += 1;
        }
        line_start = line_end + 1;
    }
    skipped
}
