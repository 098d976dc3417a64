//! Sheet Parser
//!
//! Decodes uploaded bytes into rows with the csv crate and runs the field
//! extractor over them.

use std::ops::Range;

use fieldmark_models::Field;
use thiserror::Error;
use uuid::Uuid;

use super::diagnostics::{Diagnostic, RecordingSink};
use super::extractor::extract_fields;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The input could not be read as delimited text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("input is not valid UTF-8{}", at_line(.line))]
    InvalidEncoding { line: Option<u64> },

    #[error("malformed input{}: {message}", at_line(.line))]
    Malformed { line: Option<u64>, message: String },

    #[error("failed to read input: {message}")]
    Io { message: String },
}

fn at_line(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

impl DecodeError {
    /// Convert a reader error, resolving its byte offset to a source line.
    fn from_csv(error: csv::Error, index: &LineIndex<'_>) -> Self {
        let line = error.position().map(|pos| index.line_at(pos.byte()));
        match error.kind() {
            csv::ErrorKind::Utf8 { pos, .. } => Self::InvalidEncoding {
                line: pos.as_ref().map(|p| index.line_at(p.byte())).or(line),
            },
            csv::ErrorKind::Io(io) => Self::Io {
                message: io.to_string(),
            },
            _ => Self::Malformed {
                line,
                message: error.to_string(),
            },
        }
    }
}

/// Maps byte offsets in the decoded input back to 1-based source lines.
struct LineIndex<'a> {
    data: &'a [u8],
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(data: &'a [u8]) -> Self {
        let starts = if data.is_empty() {
            Vec::new()
        } else {
            std::iter::once(0)
                .chain(
                    data.iter()
                        .enumerate()
                        .filter(|&(_, &byte)| byte == b'\n')
                        .map(|(idx, _)| idx + 1)
                        .filter(|&start| start < data.len()),
                )
                .collect()
        };
        Self { data, starts }
    }

    fn line_count(&self) -> u64 {
        self.starts.len() as u64
    }

    /// Line holding the first record byte at or after `byte`.
    ///
    /// The reader reports a record as starting where it began skipping line
    /// breaks, so those are stepped over first.
    fn line_at(&self, byte: u64) -> u64 {
        let mut at = usize::try_from(byte).unwrap_or(usize::MAX).min(self.data.len());
        while matches!(self.data.get(at), Some(b'\r' | b'\n')) {
            at += 1;
        }
        self.starts.partition_point(|&start| start <= at).max(1) as u64
    }

    fn is_blank(&self, line: u64) -> bool {
        let idx = (line as usize).saturating_sub(1);
        let Some(&start) = self.starts.get(idx) else {
            return false;
        };
        let end = self.starts.get(idx + 1).copied().unwrap_or(self.data.len());
        self.data[start..end].iter().all(|b| matches!(b, b'\r' | b'\n'))
    }

    /// The run of blank lines directly above `line`.
    fn blank_lines_before(&self, line: u64) -> Range<u64> {
        let first = (1..line)
            .rev()
            .take_while(|&above| self.is_blank(above))
            .last()
            .unwrap_or(line);
        first..line
    }
}

/// Result of parsing one uploaded sheet.
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub id: Uuid,
    pub filename: String,
    pub fields: Vec<Field>,
    pub total_rows: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// One human-readable line per dropped row, citing the source line.
    pub warnings: Vec<String>,
}

impl ParsedSheet {
    pub fn orphan_rows(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }
}

/// Parser for marker-delimited sheets.
#[derive(Debug, Clone)]
pub struct SheetParser {
    delimiter: u8,
}

impl Default for SheetParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl SheetParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the cell delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Parse a sheet from bytes
    pub fn parse_bytes(&self, filename: &str, data: &[u8]) -> Result<ParsedSheet, DecodeError> {
        tracing::info!(filename, bytes = data.len(), "Starting to parse sheet");

        let (rows, lines) = self.read_rows(data)?;

        let mut sink = RecordingSink::new();
        let fields = extract_fields(&rows, &mut sink);

        let warnings = sink
            .warnings()
            .filter_map(|diagnostic| match diagnostic {
                Diagnostic::OrphanRow { row, .. } => {
                    let line = lines.get(row - 1).copied().unwrap_or(*row as u64);
                    Some(format!("Line {}: skipped, no field defined yet", line))
                }
                _ => None,
            })
            .collect();
        let diagnostics = sink.into_diagnostics();

        tracing::info!(
            filename,
            rows = rows.len(),
            fields = fields.len(),
            "Finished parsing sheet"
        );

        Ok(ParsedSheet {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            total_rows: rows.len(),
            fields,
            diagnostics,
            warnings,
        })
    }

    /// Decode `data` into rows, also returning the source line of each row.
    fn read_rows(&self, data: &[u8]) -> Result<(Vec<Vec<String>>, Vec<u64>), DecodeError> {
        // Byte offsets below are relative to the stripped slice. The mark
        // sits on line 1, so line numbers are unaffected.
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        let index = LineIndex::new(data);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(data);

        let mut rows = Vec::new();
        let mut lines = Vec::new();

        // The reader skips blank lines entirely. They are put back as empty
        // rows so row numbers and orphan diagnostics still count them.
        let push_blank_lines = |rows: &mut Vec<Vec<String>>, lines: &mut Vec<u64>, below: u64| {
            for blank in index.blank_lines_before(below) {
                rows.push(Vec::new());
                lines.push(blank);
            }
        };

        for result in reader.records() {
            let record = result.map_err(|e| DecodeError::from_csv(e, &index))?;
            let line = record
                .position()
                .map(|pos| index.line_at(pos.byte()))
                .unwrap_or_else(|| lines.last().map_or(1, |last| last + 1));

            push_blank_lines(&mut rows, &mut lines, line);
            lines.push(line);
            rows.push(record.iter().map(str::to_string).collect());
        }
        push_blank_lines(&mut rows, &mut lines, index.line_count() + 1);

        Ok((rows, lines))
    }
}

/// Decode `data` into rows of cells using the default comma delimiter.
pub fn decode_rows(data: &[u8]) -> Result<Vec<Vec<String>>, DecodeError> {
    SheetParser::new().read_rows(data).map(|(rows, _)| rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_parsing() {
        let csv_data = b"**Email**\na@x.com\nb@x.com,\n**Age**\n30\n41\n";

        let parser = SheetParser::new();
        let result = parser.parse_bytes("fields.csv", csv_data).unwrap();

        assert_eq!(result.filename, "fields.csv");
        assert_eq!(result.total_rows, 6);
        assert_eq!(
            result.fields,
            vec![
                Field::with_values("Email", ["a@x.com", "b@x.com"]),
                Field::with_values("Age", ["30", "41"]),
            ]
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_orphan_rows_become_warnings_with_source_lines() {
        let csv_data = b"stray,data\n\n\nmore\n**Name**\nAlice\n";

        let result = SheetParser::new().parse_bytes("names.csv", csv_data).unwrap();

        assert_eq!(result.fields, vec![Field::with_values("Name", ["Alice"])]);
        assert_eq!(result.total_rows, 6);
        assert_eq!(result.orphan_rows(), 4);
        assert_eq!(
            result.warnings,
            vec![
                "Line 1: skipped, no field defined yet".to_string(),
                "Line 2: skipped, no field defined yet".to_string(),
                "Line 3: skipped, no field defined yet".to_string(),
                "Line 4: skipped, no field defined yet".to_string(),
            ]
        );
    }

    #[test]
    fn test_leading_blank_lines_are_counted() {
        let csv_data = b"\n\nstray\n**A**\nx\n";

        let result = SheetParser::new().parse_bytes("lead.csv", csv_data).unwrap();

        assert_eq!(result.fields, vec![Field::with_values("A", ["x"])]);
        assert_eq!(result.total_rows, 5);
        assert_eq!(
            result.warnings.last().map(String::as_str),
            Some("Line 3: skipped, no field defined yet")
        );
        assert_eq!(result.warnings.len(), 3);
        assert_eq!(
            result.diagnostics[0],
            Diagnostic::OrphanRow { row: 1, cells: vec![] }
        );
    }

    #[test]
    fn test_blank_lines_inside_a_field_add_nothing() {
        let csv_data = b"**A**\n\n\r\nx\n\n";

        let result = SheetParser::new().parse_bytes("gaps.csv", csv_data).unwrap();

        assert_eq!(result.fields, vec![Field::with_values("A", ["x"])]);
        assert_eq!(result.total_rows, 5);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let csv_data = b"junk\r\n\r\n**A**\r\nx,y\r\n";

        let result = SheetParser::new().parse_bytes("crlf.csv", csv_data).unwrap();

        assert_eq!(result.fields, vec![Field::with_values("A", ["x", "y"])]);
        assert_eq!(
            result.warnings,
            vec![
                "Line 1: skipped, no field defined yet".to_string(),
                "Line 2: skipped, no field defined yet".to_string(),
            ]
        );
    }

    #[test]
    fn test_multiline_quoted_cell_keeps_following_lines() {
        let csv_data = b"\"note\n\nend\"\nafter\n**A**\n";

        let result = SheetParser::new().parse_bytes("quoted.csv", csv_data).unwrap();

        assert_eq!(result.total_rows, 3);
        assert_eq!(
            result.warnings,
            vec![
                "Line 1: skipped, no field defined yet".to_string(),
                "Line 4: skipped, no field defined yet".to_string(),
            ]
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let csv_data = b"**Color**;ignored\nred; green ;\n";

        let parser = SheetParser::new().with_delimiter(b';');
        let result = parser.parse_bytes("colors.csv", csv_data).unwrap();

        assert_eq!(parser.delimiter(), b';');
        assert_eq!(result.fields, vec![Field::with_values("Color", ["red", "green"])]);
    }

    #[test]
    fn test_quoted_cells_keep_delimiters() {
        let csv_data = b"**City**\n\"Paris, FR\",\"  \"\n";

        let result = SheetParser::new().parse_bytes("cities.csv", csv_data).unwrap();

        assert_eq!(result.fields, vec![Field::with_values("City", ["Paris, FR"])]);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let csv_data = b"\xEF\xBB\xBF**Email**\na@x.com\n";

        let result = SheetParser::new().parse_bytes("bom.csv", csv_data).unwrap();

        assert_eq!(result.fields, vec![Field::with_values("Email", ["a@x.com"])]);
    }

    #[test]
    fn test_invalid_utf8_is_a_decode_error() {
        let csv_data = b"**Name**\n\xff\xfe\n";

        let error = SheetParser::new().parse_bytes("bad.csv", csv_data).unwrap_err();

        assert_eq!(error, DecodeError::InvalidEncoding { line: Some(2) });
        assert!(error.to_string().starts_with("input is not valid UTF-8"));
    }

    #[test]
    fn test_decode_error_line_counts_blank_lines() {
        let csv_data = b"**Name**\n\n\n\xff\n";

        let error = SheetParser::new().parse_bytes("bad.csv", csv_data).unwrap_err();

        assert_eq!(error, DecodeError::InvalidEncoding { line: Some(4) });
    }

    #[test]
    fn test_decode_error_line_after_byte_order_mark() {
        let csv_data = b"\xEF\xBB\xBF**Name**\n\n\xff\n";

        let error = SheetParser::new().parse_bytes("bad.csv", csv_data).unwrap_err();

        assert_eq!(error, DecodeError::InvalidEncoding { line: Some(3) });
    }

    #[test]
    fn test_no_markers_is_not_an_error() {
        let result = SheetParser::new().parse_bytes("plain.csv", b"a,b\nc,d\n").unwrap();

        assert!(result.fields.is_empty());
        assert_eq!(result.total_rows, 2);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_empty_upload() {
        let result = SheetParser::new().parse_bytes("empty.csv", b"").unwrap();

        assert!(result.fields.is_empty());
        assert_eq!(result.total_rows, 0);
    }

    #[test]
    fn test_decode_rows_is_ragged() {
        let rows = decode_rows(b"a,b,c\nd\n").unwrap();
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["d"]]);
    }

    #[test]
    fn test_decode_rows_keeps_blank_lines_as_empty_rows() {
        let rows = decode_rows(b"\na\n\nb\n\n").unwrap();
        let expected: Vec<Vec<String>> = vec![
            vec![],
            vec!["a".into()],
            vec![],
            vec!["b".into()],
            vec![],
        ];
        assert_eq!(rows, expected);
    }

    #[test]
    fn test_at_line_formatting() {
        assert_eq!(
            DecodeError::InvalidEncoding { line: Some(2) }.to_string(),
            "input is not valid UTF-8 at line 2"
        );
        assert_eq!(
            DecodeError::InvalidEncoding { line: None }.to_string(),
            "input is not valid UTF-8"
        );
    }
}
