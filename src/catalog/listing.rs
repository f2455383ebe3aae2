//! Listing document parser.
//!
//! A listing document names its tools in markdown table rows and points
//! at their sources through reference-style link definitions:
//!
//! ```text
//! | [Foo][foo] by alice | Does foo things |
//! | [Bar][] by bob       | [bar-docs]      |
//!
//! [foo]: https://github.com/alice/foo
//! [Bar]: https://gist.github.com/bob/0123abcd
//! [bar-docs]: https://example.com/bar
//! ```
//!
//! Parsing runs in two stages: rows are collected first, then every
//! label reference is resolved through a single [`LabelTable`].

use super::types::{ToolEntry, ToolMap};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

/// `| [name] [label] ... | description |`
#[allow(clippy::expect_used)]
static TABLE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\| +\[([^\]]+)\] *\[([^\]]*)\][^|]+\| (.*) \|")
        .expect("invalid table row regex")
});

/// `[label]: url`
#[allow(clippy::expect_used)]
static LABEL_DEFINITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\[([^\]]+)\]: *(.*)$").expect("invalid label regex"));

/// A table row before label resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawRow {
    /// Reference label, or empty for an implicit `[Name][]` reference.
    label: String,
    /// Description as written, possibly a bracketed label.
    description: String,
}

/// Label to URL indirection shared by URL and description slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: HashMap<String, String>,
}

impl LabelTable {
    /// Collects every `[label]: url` definition in a document.
    ///
    /// The first definition of a label wins.
    #[must_use]
    pub fn from_document(text: &str) -> Self {
        let mut labels = HashMap::new();
        for caps in LABEL_DEFINITION.captures_iter(text) {
            let label = caps[1].to_string();
            let url = caps[2].trim().to_string();
            labels.entry(label).or_insert(url);
        }
        Self { labels }
    }

    /// Looks up a label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.labels.get(label).map(String::as_str)
    }

    /// Resolves a bracketed `[label]` string, if it names a known label.
    #[must_use]
    pub fn resolve_bracketed(&self, value: &str) -> Option<&str> {
        let label = value.strip_prefix('[')?.strip_suffix(']')?;
        self.get(label)
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the document defined no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Returns true if a reference slot already holds a direct URL.
fn is_direct_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Collects table rows keyed by tool name; later rows replace earlier ones.
fn collect_rows(text: &str) -> HashMap<String, RawRow> {
    let mut rows = HashMap::new();
    for caps in TABLE_ROW.captures_iter(text) {
        let name = caps[1].to_string();
        let row = RawRow {
            label: caps[2].to_string(),
            description: caps[3].trim().to_string(),
        };
        if rows.insert(name.clone(), row).is_some() {
            debug!("[CATALOG] Duplicate row for '{}', keeping the later one", name);
        }
    }
    rows
}

/// Resolves the URL slot of a row, `None` if it stays symbolic or empty.
///
/// An undefined label falls back to a definition named after the tool.
fn resolve_url(name: &str, row: &RawRow, labels: &LabelTable) -> Option<String> {
    let url = if is_direct_url(&row.label) {
        Some(row.label.as_str())
    } else if row.label.is_empty() {
        labels.get(name)
    } else {
        labels.get(&row.label).or_else(|| labels.get(name))
    };

    url.filter(|u| !u.is_empty()).map(str::to_string)
}

/// Parses a listing document into its tools.
///
/// Rows whose source cannot be resolved are left out.
#[must_use]
pub fn parse_listing(text: &str) -> ToolMap {
    let rows = collect_rows(text);
    let labels = LabelTable::from_document(text);

    debug!(
        "[CATALOG] Parsed {} rows and {} label definitions",
        rows.len(),
        labels.len()
    );

    let mut tools = ToolMap::new();
    for (name, row) in rows {
        let Some(source_url) = resolve_url(&name, &row, &labels) else {
            debug!("[CATALOG] Dropping '{}': unresolved source '{}'", name, row.label);
            continue;
        };

        let description = labels
            .resolve_bracketed(&row.description)
            .map_or(row.description.clone(), str::to_string);

        tools.insert(name.clone(), ToolEntry::new(name, source_url, description));
    }

    tools
}
