//! Delimited text import.
//!
//! Reads a header row followed by data rows, with RFC 4180 style quoting:
//! fields may be wrapped in double quotes, quotes inside quoted fields are
//! doubled, and quoted fields may span lines. Blank lines are skipped.

use super::dedup_preserving_order;
use crate::domain::WorkItemId;
use crate::error::{Error, Result};

/// Default name of the column holding work item ids.
pub const DEFAULT_ID_COLUMN: &str = "ID";

/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// Where to find ids in a delimited document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularSource {
    /// Header name of the id column
    pub id_column: String,

    /// Field delimiter
    pub delimiter: char,
}

impl Default for TabularSource {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.to_string(),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl TabularSource {
    /// A source reading ids from `id_column`, comma delimited.
    pub fn with_column(id_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
            ..Self::default()
        }
    }
}

/// Extract work item ids from a delimited document.
///
/// Ids are returned in document order without duplicates.
///
/// # Errors
///
/// Returns `Error::MalformedInput` if the document has no header, the id
/// column is missing, a quoted field is never closed, a row has the wrong
/// number of fields, or an id cell is empty or not a positive integer.
pub fn ids_from_csv(content: &str, source: &TabularSource) -> Result<Vec<WorkItemId>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = parse_records(content, source.delimiter)?.into_iter();

    let header = records.next().ok_or_else(|| Error::MalformedInput {
        row: 0,
        message: "document has no header row".to_string(),
    })?;
    let column = header
        .iter()
        .position(|name| name.trim() == source.id_column)
        .ok_or_else(|| Error::MalformedInput {
            row: 0,
            message: format!(
                "column '{}' not found in header (columns: {})",
                source.id_column,
                header.join(", ")
            ),
        })?;

    let ids = records
        .enumerate()
        .map(|(index, record)| {
            let row = index + 1;
            if record.len() != header.len() {
                return Err(Error::MalformedInput {
                    row,
                    message: format!(
                        "expected {} fields, found {}",
                        header.len(),
                        record.len()
                    ),
                });
            }
            parse_id_cell(&record[column], row)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(count = ids.len(), column = %source.id_column, "Read ids from CSV");
    Ok(dedup_preserving_order(ids))
}

fn parse_id_cell(cell: &str, row: usize) -> Result<WorkItemId> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Err(Error::MalformedInput {
            row,
            message: "empty work item id".to_string(),
        });
    }
    match cell.parse::<WorkItemId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::MalformedInput {
            row,
            message: format!("'{cell}' is not a work item id"),
        }),
    }
}

/// Split a document into records of fields, skipping blank lines.
fn parse_records(content: &str, delimiter: char) -> Result<Vec<Vec<String>>> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                finish_record(&mut records, std::mem::take(&mut record), quoted);
                quoted = false;
            }
            c if c == delimiter => {
                record.push(std::mem::take(&mut field));
                quoted = false;
            }
            c => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::MalformedInput {
            row: records.len(),
            message: "unterminated quoted field".to_string(),
        });
    }

    if !field.is_empty() || !record.is_empty() || quoted {
        record.push(field);
        finish_record(&mut records, record, quoted);
    }

    Ok(records)
}

fn finish_record(records: &mut Vec<Vec<String>>, record: Vec<String>, quoted: bool) {
    let blank = record.len() == 1 && record[0].trim().is_empty() && !quoted;
    if !blank {
        records.push(record);
    }
}
