//! Delimited text parsing into header-keyed rows.
//!
//! # Responsibility
//! - Turn one uploaded file into an ordered sequence of string-field rows.
//! - Detect structural malformation before any row reaches validation.
//!
//! # Invariants
//! - The first line is the header; header names are trimmed, values are not.
//! - Empty lines are skipped and do not consume a row index.
//! - Any structural error aborts the whole parse: no partial output.

use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Parser configuration for one upload.
#[derive(Debug, Clone, Copy)]
pub struct TabularOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for TabularOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// One data row keyed by trimmed header names.
///
/// `index` is the 0-based position among data rows; skipped empty lines do
/// not advance it. Validation failures and ingest reports refer to this
/// index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub index: usize,
    pub fields: HashMap<String, String>,
}

impl RawRow {
    /// Returns one field by header name, when present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Errors that abort a whole parse.
#[derive(Debug)]
pub enum ParseError {
    /// Input has no usable header line.
    MissingHeader,
    /// Structurally malformed input, e.g. a row whose field count does not
    /// match the header or an unterminated quoted field.
    MalformedStream { line: u64, message: String },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "input has no header line"),
            Self::MalformedStream { line, message } => {
                write!(f, "malformed input at line {line}: {message}")
            }
        }
    }
}

impl Error for ParseError {}

/// Parses delimited text into header-keyed rows, in input order.
///
/// Re-parsing the same text yields the same sequence; the parser holds no
/// state between calls.
pub fn parse_delimited(text: &str, options: &TabularOptions) -> Result<Vec<RawRow>, ParseError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(map_csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.iter().all(|name| name.is_empty()) {
        return Err(ParseError::MissingHeader);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(map_csv_error)?;
        let fields = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(RawRow {
            index: rows.len(),
            fields,
        });
    }

    Ok(rows)
}

fn map_csv_error(err: csv::Error) -> ParseError {
    let line = err.position().map_or(0, |position| position.line());
    ParseError::MalformedStream {
        line,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_delimited, ParseError, TabularOptions};

    #[test]
    fn parses_rows_in_input_order_with_trimmed_headers() {
        let text = " loc ,cases\nManila,10\nCebu,4\n";
        let rows = parse_delimited(text, &TabularOptions::default()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[0].field("loc"), Some("Manila"));
        assert_eq!(rows[1].index, 1);
        assert_eq!(rows[1].field("cases"), Some("4"));
    }

    #[test]
    fn keeps_field_values_verbatim() {
        let text = "loc,cases\n Manila ,10\n";
        let rows = parse_delimited(text, &TabularOptions::default()).unwrap();
        assert_eq!(rows[0].field("loc"), Some(" Manila "));
    }

    #[test]
    fn skips_empty_lines_without_consuming_row_indices() {
        let text = "loc,cases\nManila,10\n\n\nCebu,4\n";
        let rows = parse_delimited(text, &TabularOptions::default()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].index, 1);
        assert_eq!(rows[1].field("loc"), Some("Cebu"));
    }

    #[test]
    fn header_only_input_yields_an_empty_sequence() {
        let rows = parse_delimited("loc,cases\n\n", &TabularOptions::default()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn row_with_wrong_field_count_aborts_whole_parse() {
        let text = "loc,cases\nManila,10\nCebu\n";
        let err = parse_delimited(text, &TabularOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedStream { line: 3, .. }));
    }

    #[test]
    fn unterminated_quote_aborts_whole_parse() {
        let text = "loc,cases\n\"Manila,10\n";
        let err = parse_delimited(text, &TabularOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedStream { .. }));
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = parse_delimited("", &TabularOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::MissingHeader));
    }

    #[test]
    fn supports_alternate_delimiters() {
        let options = TabularOptions { delimiter: b';' };
        let rows = parse_delimited("loc;cases\nManila;10\n", &options).unwrap();
        assert_eq!(rows[0].field("cases"), Some("10"));
    }

    #[test]
    fn reparsing_yields_the_same_rows() {
        let text = "loc,cases\nManila,10\nCebu,4\n";
        let first = parse_delimited(text, &TabularOptions::default()).unwrap();
        let second = parse_delimited(text, &TabularOptions::default()).unwrap();
        assert_eq!(first, second);
    }
}
