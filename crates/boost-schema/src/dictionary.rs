//! # Dictionary Parser
//!
//! Extracts field metadata from an entity dictionary: a markdown document
//! with an `### Overview` section and one HTML table embedded in it.
//!
//! ## Grammar
//!
//! The parser is line oriented and does not understand HTML. It recognises:
//!
//! ```text
//! ### Overview                   opens the overview section
//! ###...                         closes it (any later heading)
//! <table class="data">           opens the field table
//! </table>                       closes it
//! <th>Field</th><th>Type</th>    header cells, one or more per line
//! <tr>                           opens a row (line must start with it)
//!   <td>`field_name`</td>        one cell per line
//! </tr>                          closes the row
//! ```
//!
//! Cell text runs from `<td>` up to the next `<`, so a cell whose content
//! starts with a nested tag is skipped. Backticks are removed from cell
//! text. A row becomes a field only when it yields at least four cells:
//! name, type, required flag, description, and optionally examples.
//!
//! A row still open at end of input keeps the cells collected so far and
//! is recorded as a [`DictionaryIssue`].

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use thiserror::Error;

const OVERVIEW_HEADING: &str = "### Overview";
const TABLE_OPEN: &str = "<table class=\"data\">";
const TABLE_CLOSE: &str = "</table>";
const ROW_OPEN: &str = "<tr>";
const ROW_CLOSE: &str = "</tr>";
const HEADER_CELL: &str = "<th>";
const DATA_CELL: &str = "<td>";

/// Values of the required column that mark a field as required.
const REQUIRED_MARKERS: &[&str] = &["yes", "required", "true"];

/// A recoverable departure from the table grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictionaryIssue {
    /// A `<tr>` row was never closed by `</tr>`.
    #[error("row opened at line {line} is not closed by </tr>")]
    UnterminatedRow {
        /// 1-based line number of the `<tr>`.
        line: usize,
    },
}

/// Metadata for one field of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
    /// Declared type, as written in the dictionary.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Whether the dictionary marks the field as required.
    pub required: bool,
    /// Free-text description.
    pub description: String,
    /// Example values, empty when the row has no fifth cell.
    pub examples: String,
}

impl FieldDefinition {
    /// Build a field from the cells of one row.
    ///
    /// Returns `None` when fewer than four cells were captured.
    fn from_cells(mut cells: Vec<String>) -> Option<(String, Self)> {
        if cells.len() < 4 {
            return None;
        }
        let examples = if cells.len() > 4 {
            std::mem::take(&mut cells[4])
        } else {
            String::new()
        };
        let required = REQUIRED_MARKERS.contains(&cells[2].to_lowercase().as_str());
        let description = std::mem::take(&mut cells[3]);
        let field_type = std::mem::take(&mut cells[1]);
        let name = std::mem::take(&mut cells[0]);
        Some((
            name,
            Self {
                field_type,
                required,
                description,
                examples,
            },
        ))
    }
}

/// Fields keyed by name, in document order.
///
/// Serializes as a JSON object whose keys keep the order in which the
/// fields first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTable {
    entries: Vec<(String, FieldDefinition)>,
}

impl FieldTable {
    /// Insert or replace a field. Returns true if a field of that name
    /// already existed; the replacement keeps the original position.
    pub fn insert(&mut self, name: String, field: FieldDefinition) -> bool {
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = field;
            true
        } else {
            self.entries.push((name, field));
            false
        }
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no fields were parsed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, field)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDefinition)> {
        self.entries.iter().map(|(n, f)| (n.as_str(), f))
    }
}

impl Serialize for FieldTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, field) in &self.entries {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

/// A parsed entity dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dictionary {
    /// Overview paragraph(s), joined by single spaces.
    pub overview: String,
    /// Field definitions keyed by field name.
    pub fields: FieldTable,
    /// Header texts of the field table.
    #[serde(skip)]
    pub columns: Vec<String>,
    /// Grammar problems the parser recovered from.
    #[serde(skip)]
    pub issues: Vec<DictionaryIssue>,
}

/// Parse a dictionary document. Never fails; see [`Dictionary::issues`].
pub fn parse(content: &str) -> Dictionary {
    let lines: Vec<&str> = content.lines().collect();
    let mut dictionary = Dictionary::default();
    let mut overview: Vec<&str> = Vec::new();
    let mut in_overview = false;
    let mut in_table = false;

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if trimmed == OVERVIEW_HEADING {
            in_overview = true;
            continue;
        } else if in_overview && line.starts_with("###") {
            in_overview = false;
        } else if in_overview && !trimmed.is_empty() {
            overview.push(trimmed);
        }

        if line.contains(TABLE_OPEN) {
            in_table = true;
            continue;
        } else if line.contains(TABLE_CLOSE) {
            in_table = false;
            continue;
        }
        if !in_table {
            continue;
        }

        if trimmed.starts_with(HEADER_CELL) {
            dictionary
                .columns
                .extend(tag_texts(line, HEADER_CELL).map(|t| t.trim().to_string()));
        } else if trimmed.starts_with(ROW_OPEN) {
            let (cells, closed) = row_cells(&lines, index);
            if !closed {
                tracing::warn!(line = index + 1, cells = cells.len(), "dictionary row not closed by </tr>");
                dictionary
                    .issues
                    .push(DictionaryIssue::UnterminatedRow { line: index + 1 });
            }
            if let Some((name, field)) = FieldDefinition::from_cells(cells) {
                if dictionary.fields.insert(name.clone(), field) {
                    tracing::debug!(field = %name, line = index + 1, "duplicate dictionary field replaced");
                }
            }
        }
    }

    dictionary.overview = overview.join(" ");
    dictionary
}

/// Collect the `<td>` cell texts of the row opened at `lines[start]`,
/// and whether a `</tr>` closed it.
fn row_cells(lines: &[&str], start: usize) -> (Vec<String>, bool) {
    let mut cells = Vec::new();
    for line in &lines[start + 1..] {
        let trimmed = line.trim();
        if trimmed.starts_with(ROW_CLOSE) {
            return (cells, true);
        }
        if trimmed.starts_with(DATA_CELL) {
            if let Some(text) = tag_texts(line, DATA_CELL).next() {
                cells.push(text.trim().replace('`', ""));
            }
        }
    }
    (cells, false)
}

/// Texts following each occurrence of `tag`, up to the next `<`.
///
/// Occurrences immediately followed by `<` (or the end of the line)
/// yield nothing.
fn tag_texts<'a>(line: &'a str, tag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    line.match_indices(tag).filter_map(move |(start, _)| {
        let rest = &line[start + tag.len()..];
        let end = rest.find('<').unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    })
}
