//! Reader and writer for the tab-delimited TXT format
//!
//! The format is a strict tab dialect: no quoting, no escaping, first
//! line is the header. The reader accepts both LF and CRLF line
//! endings; the writer always emits CRLF, matching the game's own
//! files.

use crate::error::{Error, Result};
use crate::table::Table;

/// Parse tab-delimited TXT bytes into a [`Table`].
///
/// Every data line must have exactly as many cells as the header;
/// a mismatch fails with [`Error::RowLengthMismatch`] carrying the
/// 1-based line number.
pub fn parse_txt(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(false)
        .flexible(false)
        .from_reader(bytes);

    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(map_csv_error)?,
        None => return Err(Error::EmptyInput),
    };
    let mut table = Table::new(header.iter().map(str::to_string).collect());

    for record in records {
        let record = record.map_err(map_csv_error)?;
        table.push_row(record.iter().map(str::to_string).collect());
    }

    Ok(table)
}

/// Serialize a [`Table`] back to tab-delimited TXT bytes.
///
/// Every header name and cell value is checked for embedded tabs and
/// line breaks first; a violation fails with
/// [`Error::InvalidCellContent`] instead of corrupting the row
/// boundary. Row 0 in the error identifies the header line.
pub fn write_txt(table: &Table) -> Result<Vec<u8>> {
    for col in table.columns() {
        if has_break(&col.name) {
            return Err(Error::InvalidCellContent {
                row: 0,
                column: col.name.clone(),
            });
        }
    }
    for (row_index, row) in table.rows().iter().enumerate() {
        for (col, cell) in table.columns().iter().zip(row.cells()) {
            if has_break(cell) {
                return Err(Error::InvalidCellContent {
                    row: row_index + 1,
                    column: col.name.clone(),
                });
            }
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(table.columns().iter().map(|c| c.name.as_str()))?;
    for row in table.rows() {
        writer.write_record(row.cells())?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::Txt(csv::Error::from(e.into_error())))
}

fn has_break(value: &str) -> bool {
    value.contains('\t') || value.contains('\n') || value.contains('\r')
}

/// Translate the csv crate's unequal-length error into our typed
/// mismatch; everything else passes through.
fn map_csv_error(err: csv::Error) -> Error {
    if let csv::ErrorKind::UnequalLengths { pos, expected_len, len } = err.kind() {
        return Error::RowLengthMismatch {
            line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
            expected: *expected_len as usize,
            found: *len as usize,
        };
    }
    Error::Txt(err)
}
