//! # Dictionary Subcommand
//!
//! Prints an entity's overview and field table as aligned plain text.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use boost_schema::{Dictionary, SchemaRepository};
use clap::Args;

/// Column labels used when the dictionary table has no header row.
const DEFAULT_COLUMNS: [&str; 4] = ["Field", "Type", "Required", "Description"];

/// Arguments for the `boost dictionary` subcommand.
#[derive(Args, Debug)]
pub struct DictionaryArgs {
    /// PascalCase entity name, e.g. TraceableUnit.
    #[arg(value_name = "ENTITY")]
    pub entity: String,
}

/// Execute `boost dictionary`.
pub fn run_dictionary(
    args: &DictionaryArgs,
    schema_root: &Path,
    out: &mut impl Write,
) -> Result<u8> {
    let entity = crate::entity_arg(&args.entity)?;
    let dictionary = SchemaRepository::new(schema_root)
        .load_dictionary(&entity)
        .with_context(|| format!("no usable dictionary for {entity}"))?;
    write_dictionary(&dictionary, out)?;
    Ok(0)
}

fn write_dictionary(dictionary: &Dictionary, out: &mut impl Write) -> Result<()> {
    if !dictionary.overview.is_empty() {
        writeln!(out, "{}\n", dictionary.overview)?;
    }

    let header: Vec<&str> = (0..DEFAULT_COLUMNS.len())
        .map(|i| {
            dictionary
                .columns
                .get(i)
                .map(String::as_str)
                .unwrap_or(DEFAULT_COLUMNS[i])
        })
        .collect();

    let rows: Vec<[&str; 4]> = dictionary
        .fields
        .iter()
        .map(|(name, field)| {
            [
                name,
                field.field_type.as_str(),
                if field.required { "yes" } else { "no" },
                field.description.as_str(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: &[&str]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    writeln!(out, "{}", line(&header[..]))?;
    for row in &rows {
        writeln!(out, "{}", line(&row[..]))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOC: &str = "### Overview\nA harvest event.\n\n### Fields\n<table class=\"data\">\n<tr>\n<th>Name</th><th>Kind</th><th>Req</th><th>About</th>\n</tr>\n<tr>\n<td>`harvestId`</td>\n<td>string</td>\n<td>Yes</td>\n<td>Identifier</td>\n</tr>\n<tr>\n<td>`volume`</td>\n<td>number</td>\n<td>No</td>\n<td>Cubic metres</td>\n</tr>\n</table>\n";

    fn fixture(doc: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("harvest_event");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("harvest_event_dictionary.md"), doc).unwrap();
        tmp
    }

    #[test]
    fn prints_overview_and_table() {
        let tmp = fixture(DOC);
        let args = DictionaryArgs {
            entity: "HarvestEvent".into(),
        };
        let mut out = Vec::new();
        assert_eq!(run_dictionary(&args, tmp.path(), &mut out).unwrap(), 0);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "A harvest event.");
        assert_eq!(lines[2], "Name       Kind    Req  About");
        assert_eq!(lines[3], "harvestId  string  yes  Identifier");
        assert_eq!(lines[4], "volume     number  no   Cubic metres");
    }

    #[test]
    fn missing_dictionary_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let args = DictionaryArgs {
            entity: "HarvestEvent".into(),
        };
        let mut out = Vec::new();
        assert!(run_dictionary(&args, tmp.path(), &mut out).is_err());
    }

    #[test]
    fn header_falls_back_to_defaults() {
        let mut out = Vec::new();
        write_dictionary(&Dictionary::default(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Field  Type  Required  Description\n"
        );
    }
}
