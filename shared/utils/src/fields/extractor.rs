//! Field Extractor
//!
//! Single forward pass over a row sequence, folding each row into an
//! accumulator of sealed fields plus at most one field still being built.

use fieldmark_models::Field;

use super::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};

/// Delimiter that opens and closes a marker cell.
pub const MARKER: &str = "**";

/// Field name carried by `cell` if the cell is a marker, `None` otherwise.
///
/// A marker starts and ends with `**` (a lone `**` counts). The name is the
/// cell with every leading and trailing `*` removed, then trimmed.
pub fn marker_name(cell: &str) -> Option<String> {
    if cell.starts_with(MARKER) && cell.ends_with(MARKER) {
        Some(cell.trim_matches('*').trim().to_string())
    } else {
        None
    }
}

/// Extract fields, sending diagnostics to `tracing`.
pub fn extract<I, R, C>(rows: I) -> Vec<Field>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    extract_fields(rows, &mut TracingSink)
}

/// Extract fields from `rows`, reporting progress to `sink`.
///
/// Never fails. Rows before the first marker are dropped with a
/// [`Diagnostic::OrphanRow`]; a field with no values is still returned.
pub fn extract_fields<I, R, C, S>(rows: I, sink: &mut S) -> Vec<Field>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[C]>,
    C: AsRef<str>,
    S: DiagnosticSink + ?Sized,
{
    rows.into_iter()
        .enumerate()
        .fold(Accumulator::default(), |acc, (idx, row)| {
            acc.step(idx + 1, row.as_ref(), sink)
        })
        .finish(sink)
}

#[derive(Debug, Default)]
struct Accumulator {
    sealed: Vec<Field>,
    current: Option<Field>,
}

impl Accumulator {
    fn step<C, S>(mut self, row_number: usize, row: &[C], sink: &mut S) -> Self
    where
        C: AsRef<str>,
        S: DiagnosticSink + ?Sized,
    {
        if let Some(name) = row.first().and_then(|cell| marker_name(cell.as_ref())) {
            sink.record(Diagnostic::FieldStarted {
                row: row_number,
                name: name.clone(),
            });
            if let Some(previous) = self.current.replace(Field::new(name)) {
                self.seal(previous, sink);
            }
            return self;
        }

        match self.current.as_mut() {
            Some(field) => {
                let before = field.values.len();
                field.values.extend(
                    row.iter()
                        .map(|cell| cell.as_ref().trim())
                        .filter(|value| !value.is_empty())
                        .map(str::to_string),
                );
                sink.record(Diagnostic::ValuesAppended {
                    row: row_number,
                    field: field.name.clone(),
                    count: field.values.len() - before,
                });
            }
            None => {
                sink.record(Diagnostic::OrphanRow {
                    row: row_number,
                    cells: row.iter().map(|cell| cell.as_ref().to_string()).collect(),
                });
            }
        }
        self
    }

    fn seal<S: DiagnosticSink + ?Sized>(&mut self, field: Field, sink: &mut S) {
        sink.record(Diagnostic::FieldSealed {
            name: field.name.clone(),
            value_count: field.value_count(),
        });
        self.sealed.push(field);
    }

    fn finish<S: DiagnosticSink + ?Sized>(mut self, sink: &mut S) -> Vec<Field> {
        if let Some(last) = self.current.take() {
            self.seal(last, sink);
        }
        sink.record(Diagnostic::Finished {
            field_count: self.sealed.len(),
        });
        self.sealed
    }
}
