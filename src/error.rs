//! Error types for loading tables and building the network.

use thiserror::Error;

/// Failures while turning an uploaded file into a [`Table`](crate::network::Table).
#[derive(Debug, Error)]
pub enum LoadError {
	/// The browser could not hand over the file contents.
	#[error("could not read the uploaded file: {0}")]
	Unreadable(String),

	/// Neither the extension nor the content identify CSV or a workbook.
	#[error("unrecognized file format for '{0}' (expected CSV or a spreadsheet workbook)")]
	UnrecognizedFormat(String),

	/// Malformed CSV.
	#[error("could not parse CSV: {0}")]
	Csv(#[from] csv::Error),

	/// The workbook could not be opened or read.
	#[error("could not read spreadsheet: {0}")]
	Spreadsheet(#[from] calamine::Error),

	/// A workbook without any sheet.
	#[error("workbook contains no worksheet")]
	NoWorksheet,

	/// No header row.
	#[error("the uploaded table is empty")]
	Empty,

	/// Fewer than two columns; carries the column count found.
	#[error("table has {0} column(s); expected a project column followed by at least one hashtag column")]
	MissingHashtagColumns(usize),
}

/// Failures of the full upload-to-figure pipeline.
#[derive(Debug, Error)]
pub enum NetworkError {
	/// Loading the upload failed.
	#[error(transparent)]
	Load(#[from] LoadError),

	/// Embedding the figure data as JSON failed.
	#[error("could not serialize figure data: {0}")]
	Serialize(#[from] serde_json::Error),
}

/// Result of pipeline operations, failing with [`NetworkError`] by default.
pub type Result<T, E = NetworkError> = std::result::Result<T, E>;
