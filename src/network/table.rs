//! Table loading: CSV or spreadsheet bytes into rows of project + hashtag cells.
//!
//! Column 0 holds the project name, every later column a candidate hashtag.
//! The loaded [`Table`] keeps the original cells untouched so it can be
//! exported again; [`Table::projects`] is the validated, typed view used by
//! the graph builder.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use log::{debug, warn};

use crate::error::LoadError;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE2_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Input format of an uploaded file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableFormat {
	/// Comma-separated text, UTF-8 with or without BOM.
	Csv,
	/// Any workbook `calamine` can open; only the first sheet is read.
	Spreadsheet,
}

impl TableFormat {
	/// Picks the format from the file extension, sniffing the bytes when the
	/// extension is missing or unknown.
	pub fn detect(file_name: &str, bytes: &[u8]) -> Result<Self, LoadError> {
		let ext = file_name
			.rsplit_once('.')
			.map(|(_, ext)| ext.to_ascii_lowercase())
			.unwrap_or_default();

		match ext.as_str() {
			"csv" | "txt" => Ok(Self::Csv),
			"xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Spreadsheet),
			_ if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE2_MAGIC) => {
				Ok(Self::Spreadsheet)
			}
			_ if !bytes.is_empty() && std::str::from_utf8(bytes).is_ok() => Ok(Self::Csv),
			_ => Err(LoadError::UnrecognizedFormat(file_name.to_string())),
		}
	}
}

/// An uploaded table with its header row and raw cells (blank cells are `None`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
	/// Header row, padded to the widest row.
	pub headers: Vec<String>,
	/// Data rows, each as wide as `headers`.
	pub rows: Vec<Vec<Option<String>>>,
}

/// One row of the table, typed: a project name and its ordered tag cells.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectRow {
	/// First-column value.
	pub name: String,
	/// Remaining cells, in column order.
	pub tags: Vec<Option<String>>,
}

impl ProjectRow {
	/// Trimmed, non-empty hashtags in column order.
	pub fn hashtags(&self) -> Vec<String> {
		self.tags
			.iter()
			.flatten()
			.map(|tag| tag.trim())
			.filter(|tag| !tag.is_empty())
			.map(str::to_string)
			.collect()
	}
}

/// A project with its cleaned hashtag list, as consumed by the graph builder.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectTags {
	/// Project name.
	pub name: String,
	/// Trimmed, non-empty hashtags.
	pub hashtags: Vec<String>,
}

impl Table {
	/// Loads a table from an uploaded file.
	pub fn load(file_name: &str, bytes: &[u8]) -> Result<Self, LoadError> {
		let table = match TableFormat::detect(file_name, bytes)? {
			TableFormat::Csv => Self::from_csv(bytes)?,
			TableFormat::Spreadsheet => Self::from_spreadsheet(bytes)?,
		};
		debug!(
			"tagnet: loaded '{}' with {} columns, {} rows",
			file_name,
			table.column_count(),
			table.rows.len()
		);
		Ok(table)
	}

	/// Parses comma-separated text with a header row. Short rows are padded
	/// with blanks.
	pub fn from_csv(bytes: &[u8]) -> Result<Self, LoadError> {
		let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
		let mut reader = csv::ReaderBuilder::new()
			.has_headers(true)
			.flexible(true)
			.from_reader(bytes);

		let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
		let mut rows = Vec::new();
		for record in reader.records() {
			let record = record?;
			rows.push(record.iter().map(blank_to_none).collect());
		}

		Self::from_parts(headers, rows)
	}

	/// Reads the first worksheet of a workbook; its first row is the header.
	pub fn from_spreadsheet(bytes: &[u8]) -> Result<Self, LoadError> {
		let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
		let range = workbook
			.worksheet_range_at(0)
			.ok_or(LoadError::NoWorksheet)??;

		let mut cells = range.rows().map(|row| {
			row.iter()
				.map(|cell| match cell {
					Data::Empty => None,
					other => blank_to_none(&other.to_string()),
				})
				.collect::<Vec<_>>()
		});

		let headers = cells
			.next()
			.map(|row| row.into_iter().map(Option::unwrap_or_default).collect())
			.unwrap_or_default();

		Self::from_parts(headers, cells.collect())
	}

	fn from_parts(mut headers: Vec<String>, mut rows: Vec<Vec<Option<String>>>) -> Result<Self, LoadError> {
		if headers.is_empty() {
			return Err(LoadError::Empty);
		}

		let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(headers.len());
		headers.resize(width, String::new());
		for row in &mut rows {
			row.resize(width, None);
		}

		Ok(Self { headers, rows })
	}

	/// Number of columns, the project column included.
	pub fn column_count(&self) -> usize {
		self.headers.len()
	}

	/// Typed rows. Fails when there is no hashtag column; rows without a
	/// project name are skipped.
	pub fn projects(&self) -> Result<Vec<ProjectRow>, LoadError> {
		if self.column_count() < 2 {
			return Err(LoadError::MissingHashtagColumns(self.column_count()));
		}

		let mut projects = Vec::with_capacity(self.rows.len());
		for (line, row) in self.rows.iter().enumerate() {
			let name = row
				.first()
				.and_then(Option::as_deref)
				.map(str::trim)
				.unwrap_or_default();
			if name.is_empty() {
				warn!("tagnet: skipping row {} without a project name", line + 1);
				continue;
			}
			projects.push(ProjectRow {
				name: name.to_string(),
				tags: row[1..].to_vec(),
			});
		}
		Ok(projects)
	}

	/// Projects in first-seen order with their hashtags. A project listed
	/// twice keeps its first position and takes the later row's tags.
	pub fn project_tags(&self) -> Result<Vec<ProjectTags>, LoadError> {
		let mut index: HashMap<String, usize> = HashMap::new();
		let mut out: Vec<ProjectTags> = Vec::new();

		for row in self.projects()? {
			let hashtags = row.hashtags();
			match index.get(&row.name) {
				Some(&i) => out[i].hashtags = hashtags,
				None => {
					index.insert(row.name.clone(), out.len());
					out.push(ProjectTags {
						name: row.name,
						hashtags,
					});
				}
			}
		}
		Ok(out)
	}
}

fn blank_to_none(cell: &str) -> Option<String> {
	if cell.is_empty() {
		None
	} else {
		Some(cell.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn detects_format_from_extension_and_magic() {
		assert_eq!(TableFormat::detect("a.CSV", b"x").unwrap(), TableFormat::Csv);
		assert_eq!(TableFormat::detect("a.xlsx", b"").unwrap(), TableFormat::Spreadsheet);
		assert_eq!(
			TableFormat::detect("upload", b"PK\x03\x04rest").unwrap(),
			TableFormat::Spreadsheet
		);
		assert_eq!(TableFormat::detect("upload", b"a,b\n").unwrap(), TableFormat::Csv);
		assert!(matches!(
			TableFormat::detect("upload.bin", &[0xff, 0xfe, 0x00]),
			Err(LoadError::UnrecognizedFormat(_))
		));
	}

	#[test]
	fn csv_blank_cells_become_none_and_short_rows_are_padded() {
		let table = Table::from_csv(b"Project,T1,T2\nA,#x,\nB\n").unwrap();
		assert_eq!(table.headers, vec!["Project", "T1", "T2"]);
		assert_eq!(table.rows[0], vec![Some("A".into()), Some("#x".into()), None]);
		assert_eq!(table.rows[1], vec![Some("B".into()), None, None]);
	}

	#[test]
	fn csv_strips_byte_order_mark() {
		let table = Table::from_csv(b"\xEF\xBB\xBFProject,Tag\nA,#x\n").unwrap();
		assert_eq!(table.headers[0], "Project");
	}

	#[test]
	fn empty_input_is_rejected() {
		assert!(matches!(Table::from_csv(b""), Err(LoadError::Empty)));
	}

	#[test]
	fn single_column_table_reports_missing_hashtags() {
		let table = Table::from_csv(b"Project\nA\nB\n").unwrap();
		assert!(matches!(
			table.projects(),
			Err(LoadError::MissingHashtagColumns(1))
		));
	}

	#[test]
	fn hashtags_are_trimmed_and_blanks_dropped() {
		let row = ProjectRow {
			name: "A".into(),
			tags: vec![Some("  #x ".into()), None, Some("   ".into()), Some("#y".into())],
		};
		assert_eq!(row.hashtags(), vec!["#x", "#y"]);
	}

	#[test]
	fn rows_without_project_are_skipped_and_duplicates_overwrite() {
		let table = Table::from_csv(b"P,T1,T2\nA,#x,#y\n,#x,\nB,#z,\nA,#q,\n").unwrap();
		let projects = table.project_tags().unwrap();
		assert_eq!(projects.len(), 2);
		assert_eq!(projects[0].name, "A");
		assert_eq!(projects[0].hashtags, vec!["#q"]);
		assert_eq!(projects[1].name, "B");
	}

	#[test]
	fn garbage_workbook_is_a_spreadsheet_error() {
		let err = Table::load("broken.xlsx", b"not a zip archive").unwrap_err();
		assert!(matches!(err, LoadError::Spreadsheet(_)));
	}
}
