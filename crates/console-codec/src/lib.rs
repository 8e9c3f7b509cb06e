//! CSV codec for order records.
//!
//! Serializes the canonical field set as a header row plus one row per
//! record, and parses the same shape back. Quoting follows the usual
//! CSV rules: fields containing the delimiter, the quote character or a
//! line break are quoted, embedded quotes are doubled. The import side
//! is forgiving about shape (unknown headers ignored, missing fields
//! empty, no field validation) and strict about quoting, so a malformed
//! file is rejected as a whole instead of half-imported.

use console_types::{Column, OrderRecord, RowKey};
use std::collections::HashSet;
use thiserror::Error;

/// Advisory filename for a full export.
pub const EXPORT_FILENAME: &str = "orders.csv";
/// Advisory filename for a selection export.
pub const EXPORT_SELECTION_FILENAME: &str = "orders-selection.csv";

/// Errors that can occur while parsing CSV text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
	/// The input has no header row.
	#[error("Missing header row")]
	MissingHeader,
	/// A quoted field was still open at end of input.
	#[error("Unterminated quoted field starting on line {line}")]
	UnterminatedQuote { line: usize },
	/// A quote character appeared inside an unquoted field.
	#[error("Unexpected quote in unquoted field on line {line}")]
	StrayQuote { line: usize },
}

fn escape(field: &str) -> String {
	if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
		format!("\"{}\"", field.replace('"', "\"\""))
	} else {
		field.to_string()
	}
}

fn header() -> String {
	Column::ALL
		.iter()
		.map(|column| column.as_str())
		.collect::<Vec<_>>()
		.join(",")
}

fn record_line(record: &OrderRecord) -> String {
	Column::ALL
		.iter()
		.map(|column| escape(record.get(*column)))
		.collect::<Vec<_>>()
		.join(",")
}

/// Serializes all records, header first, in the given order.
pub fn export_all<'a, I>(records: I) -> String
where
	I: IntoIterator<Item = &'a OrderRecord>,
{
	let mut lines = vec![header()];
	lines.extend(records.into_iter().map(record_line));
	lines.join("\n")
}

/// Serializes only the rows whose key is selected, order preserved.
pub fn export_selection<'a, I>(rows: I, selected: &HashSet<RowKey>) -> String
where
	I: IntoIterator<Item = (RowKey, &'a OrderRecord)>,
{
	export_all(
		rows.into_iter()
			.filter(|(key, _)| selected.contains(key))
			.map(|(_, record)| record),
	)
}

/// Parses CSV text into order records.
///
/// The header row decides which column each position feeds; headers
/// that are not canonical columns are ignored. Rows shorter than the
/// header leave the remaining fields empty, rows longer have the
/// excess dropped, and blank lines are skipped. A row without a user
/// id is imported as-is -- validation is deferred to submission time.
pub fn import(text: &str) -> Result<Vec<OrderRecord>, ImportError> {
	let mut rows = parse_rows(text)?;
	if rows.is_empty() {
		return Err(ImportError::MissingHeader);
	}

	let header_row = rows.remove(0);
	let columns: Vec<Option<Column>> = header_row
		.iter()
		.map(|name| name.parse::<Column>().ok())
		.collect();

	let mut records = Vec::with_capacity(rows.len());
	for row in rows {
		if row.len() == 1 && row[0].is_empty() {
			continue;
		}
		let mut record = OrderRecord::default();
		for (position, value) in row.into_iter().enumerate() {
			if let Some(Some(column)) = columns.get(position) {
				record.set(*column, value);
			}
		}
		records.push(record);
	}
	Ok(records)
}

/// Splits raw CSV text into rows of unescaped fields.
fn parse_rows(text: &str) -> Result<Vec<Vec<String>>, ImportError> {
	let mut rows: Vec<Vec<String>> = Vec::new();
	let mut row: Vec<String> = Vec::new();
	let mut field = String::new();
	let mut in_quotes = false;
	let mut quote_opened_on = 1;
	let mut line = 1;
	let mut field_started = false;

	let mut chars = text.chars().peekable();
	while let Some(c) = chars.next() {
		if in_quotes {
			match c {
				'"' => {
					if chars.peek() == Some(&'"') {
						chars.next();
						field.push('"');
					} else {
						in_quotes = false;
					}
				}
				'\n' => {
					line += 1;
					field.push(c);
				}
				_ => field.push(c),
			}
			continue;
		}
		match c {
			'"' if !field_started => {
				in_quotes = true;
				quote_opened_on = line;
				field_started = true;
			}
			'"' => return Err(ImportError::StrayQuote { line }),
			',' => {
				row.push(std::mem::take(&mut field));
				field_started = false;
			}
			'\r' if chars.peek() == Some(&'\n') => {}
			'\n' => {
				line += 1;
				row.push(std::mem::take(&mut field));
				rows.push(std::mem::take(&mut row));
				field_started = false;
			}
			_ => {
				field.push(c);
				field_started = true;
			}
		}
	}

	if in_quotes {
		return Err(ImportError::UnterminatedQuote {
			line: quote_opened_on,
		});
	}
	if field_started || !row.is_empty() {
		row.push(field);
		rows.push(row);
	}
	Ok(rows)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(
		user_id: &str,
		order_id: &str,
		dictionary: &str,
		environment: &str,
		name: &str,
	) -> OrderRecord {
		OrderRecord {
			user_id: user_id.to_string(),
			order_id: order_id.to_string(),
			dictionary: dictionary.to_string(),
			environment: environment.to_string(),
			name: name.to_string(),
		}
	}

	#[test]
	fn test_export_single_record() {
		let records = vec![record("u1", "o1", "d", "DEV", "n1")];
		assert_eq!(
			export_all(&records),
			"userId,orderId,dictionary,environment,name\nu1,o1,d,DEV,n1"
		);
	}

	#[test]
	fn test_export_quotes_special_characters() {
		let records = vec![record("u,1", "o\"1", "d", "DEV", "line\nbreak")];
		let text = export_all(&records);
		assert!(text.contains("\"u,1\""));
		assert!(text.contains("\"o\"\"1\""));
		assert!(text.contains("\"line\nbreak\""));
	}

	#[test]
	fn test_round_trip_preserves_records() {
		let records = vec![
			record("u1", "o1", "d", "DEV", "plain"),
			record("u,2", "o\"2", "d d", "UAT", "multi\nline"),
			record("", "", "", "", "only-name"),
			record("", "", "", "", ""),
		];
		assert_eq!(import(&export_all(&records)).unwrap(), records);
	}

	#[test]
	fn test_import_ignores_unknown_headers() {
		let text = "userId,legacyColumn,name\nu1,whatever,n1";
		let records = import(text).unwrap();
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].user_id, "u1");
		assert_eq!(records[0].name, "n1");
		assert_eq!(records[0].order_id, "");
	}

	#[test]
	fn test_import_accepts_rows_without_user_id() {
		let text = "userId,name\n,orphan";
		let records = import(text).unwrap();
		assert_eq!(records[0].user_id, "");
		assert_eq!(records[0].name, "orphan");
	}

	#[test]
	fn test_import_short_rows_and_trailing_newline() {
		let text = "userId,orderId,dictionary,environment,name\nu1\n";
		let records = import(text).unwrap();
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].user_id, "u1");
		assert_eq!(records[0].name, "");
	}

	#[test]
	fn test_import_crlf_rows() {
		let text = "userId,name\r\nu1,n1\r\nu2,n2";
		let records = import(text).unwrap();
		assert_eq!(records.len(), 2);
		assert_eq!(records[1].name, "n2");
	}

	#[test]
	fn test_import_empty_input_rejected() {
		assert_eq!(import(""), Err(ImportError::MissingHeader));
	}

	#[test]
	fn test_import_unterminated_quote_rejected() {
		let text = "userId,name\n\"unclosed,n1";
		assert_eq!(
			import(text),
			Err(ImportError::UnterminatedQuote { line: 2 })
		);
	}

	#[test]
	fn test_import_stray_quote_rejected() {
		let text = "userId,name\nu\"1,n1";
		assert_eq!(import(text), Err(ImportError::StrayQuote { line: 2 }));
	}

	#[test]
	fn test_export_selection_preserves_store_order() {
		let records = vec![
			record("u1", "", "", "DEV", "a"),
			record("u2", "", "", "DEV", "b"),
			record("u3", "", "", "DEV", "c"),
		];
		let keyed: Vec<(RowKey, &OrderRecord)> = records
			.iter()
			.enumerate()
			.map(|(i, r)| (RowKey(i as u64), r))
			.collect();
		let selected: HashSet<RowKey> = [RowKey(2), RowKey(0)].into_iter().collect();

		let text = export_selection(keyed, &selected);
		let lines: Vec<&str> = text.lines().collect();
		assert_eq!(lines.len(), 3);
		assert!(lines[1].ends_with(",a"));
		assert!(lines[2].ends_with(",c"));
	}
}
