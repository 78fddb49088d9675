//! Header-driven parsing of the switcher tool's tabular export.
//!
//! The export is a comma-separated table with a header row, optionally
//! prefixed with a UTF-8 BOM. Fields containing commas are quoted, with
//! doubled quotes as the escape. Parsing is pure so the directory logic
//! can be tested without the external tool.

use std::collections::HashMap;

/// One export row, keyed by header column name.
pub type Record = HashMap<String, String>;

/// Parse the raw export text into records.
///
/// An input without a header row yields no records. Data rows shorter than
/// the header simply lack the trailing columns.
pub fn parse_records(input: &str) -> Vec<Record> {
    let mut rows = parse_table(input).into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    rows.map(|fields| header.iter().cloned().zip(fields).collect())
        .collect()
}

fn parse_table(input: &str) -> Vec<Vec<String>> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = input.chars().peekable();
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
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                // skip blank lines
                if row.len() > 1 || !row[0].is_empty() {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_records() {
        assert!(parse_records("").is_empty());
    }

    #[test]
    fn header_only_yields_no_records() {
        assert!(parse_records("Name,Item ID\r\n").is_empty());
    }

    #[test]
    fn rows_are_keyed_by_header() {
        let records = parse_records("Name,Item ID\r\nSpeakers,DEV1\r\nHeadset,DEV2\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Name").map(String::as_str), Some("Speakers"));
        assert_eq!(records[1].get("Item ID").map(String::as_str), Some("DEV2"));
    }

    #[test]
    fn bom_is_stripped_from_first_header() {
        let records = parse_records("\u{feff}Name,Item ID\nSpeakers,DEV1\n");
        assert_eq!(records[0].get("Name").map(String::as_str), Some("Speakers"));
    }

    #[test]
    fn quoted_fields_keep_commas_and_escaped_quotes() {
        let records =
            parse_records("Name,Item ID\n\"Speakers (Realtek, USB)\",DEV1\n\"The \"\"Good\"\" One\",DEV2\n");
        assert_eq!(
            records[0].get("Name").map(String::as_str),
            Some("Speakers (Realtek, USB)")
        );
        assert_eq!(
            records[1].get("Name").map(String::as_str),
            Some("The \"Good\" One")
        );
    }

    #[test]
    fn short_rows_lack_trailing_columns() {
        let records = parse_records("Name,Item ID,Direction\nSpeakers,DEV1\n");
        assert_eq!(records[0].get("Item ID").map(String::as_str), Some("DEV1"));
        assert_eq!(records[0].get("Direction"), None);
    }

    #[test]
    fn missing_trailing_newline_still_parses_last_row() {
        let records = parse_records("Name,Item ID\nSpeakers,DEV1");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Item ID").map(String::as_str), Some("DEV1"));
    }
}
