//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use crate::domain::WorkItemId;

/// Validate an organization URL.
///
/// Must be an `http` or `https` URL. A trailing slash is removed.
pub fn validate_org_url(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Organization URL cannot be empty".to_string());
    }

    let Some(rest) = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
    else {
        return Err(format!(
            "Invalid organization URL: '{s}'. Expected e.g. https://dev.azure.com/contoso"
        ));
    };

    if rest.trim_end_matches('/').is_empty() {
        return Err(format!("Organization URL '{s}' has no host"));
    }

    Ok(s.trim_end_matches('/').to_string())
}

/// Validate a comma-separated id list.
///
/// Invalid entries are tolerated (and skipped later), but at least one entry
/// must be a usable id.
pub fn validate_id_list(s: &str) -> Result<String, String> {
    let has_valid_id = s
        .split(',')
        .any(|entry| entry.trim().parse::<WorkItemId>().is_ok_and(|id| id > 0));
    if !has_valid_id {
        return Err(format!(
            "No valid work item ids in '{s}'. Expected e.g. 12,34,56"
        ));
    }
    Ok(s.to_string())
}

/// Validate a CSV delimiter.
///
/// Exactly one character, neither a quote nor a line break.
pub fn validate_delimiter(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(format!("Delimiter must be a single character, got '{s}'"));
    };

    match c {
        '"' => Err("Delimiter cannot be the quote character".to_string()),
        '\r' | '\n' => Err("Delimiter cannot be a line break".to_string()),
        c => Ok(c),
    }
}

/// Validate a CSV column name.
pub fn validate_id_column(s: &str) -> Result<String, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Id column cannot be empty".to_string());
    }
    Ok(s.to_string())
}
