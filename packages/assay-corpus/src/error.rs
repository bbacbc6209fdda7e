use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read {path:?}.")]
	Io { path: PathBuf, source: std::io::Error },
	#[error("Failed to open workbook {path:?}.")]
	Workbook { path: PathBuf, source: calamine::Error },
	#[error("Workbook {path:?} has no sheet named {sheet:?}.")]
	MissingSheet { path: PathBuf, sheet: String },
	#[error("Failed to parse JSON table {path:?}.")]
	Json { path: PathBuf, source: serde_json::Error },
	#[error("Table {path:?} has no column named {column:?}.")]
	MissingColumn { path: PathBuf, column: String },
	#[error("Unsupported table format for {path:?}; expected .xlsx, .xlsm, .xls, .ods, or .json.")]
	UnsupportedFormat { path: PathBuf },
	#[error("Invalid table {path:?}: {message}")]
	InvalidTable { path: PathBuf, message: String },
}
