//! CSV export

use crate::error::{Result, TableError};
use csv::{Terminator, WriterBuilder};

/// Writes `rows` as CSV, preceded by `header` when there is at least one row
///
/// Records end with `\r\n`.
///
/// ```
/// use reusable_table::export::csv::write_table;
///
/// let header = vec!["Name".to_string(), "Note".to_string()];
/// let rows = vec![vec!["Ada".to_string(), "a, b".to_string()]];
/// let body = write_table(&header, &rows).unwrap();
/// assert_eq!(body, b"Name,Note\r\nAda,\"a, b\"\r\n");
/// ```
pub fn write_table(header: &[String], rows: &[Vec<String>]) -> Result<Vec<u8>> {
	let mut writer = WriterBuilder::new()
		.terminator(Terminator::CRLF)
		.from_writer(Vec::new());

	if !rows.is_empty() {
		writer.write_record(header)?;
	}
	for row in rows {
		writer.write_record(row)?;
	}

	writer
		.into_inner()
		.map_err(|e| TableError::Io(e.into_error()))
}
