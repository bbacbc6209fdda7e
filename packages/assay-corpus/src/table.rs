use std::path::Path;

use crate::{Error, Result};

/// A header row plus string cells, independent of the file format it was read from.
#[derive(Debug, Clone, Default)]
pub struct Table {
	pub headers: Vec<String>,
	pub rows: Vec<Vec<String>>,
}
impl Table {
	pub fn column(&self, name: &str) -> Option<usize> {
		let wanted = name.trim();

		self.headers.iter().position(|header| header.trim() == wanted)
	}

	pub fn require_column(&self, path: &Path, name: &str) -> Result<usize> {
		self.column(name)
			.ok_or_else(|| Error::MissingColumn { path: path.to_path_buf(), column: name.to_string() })
	}
}

/// Returns the trimmed cell, or an empty string for short rows.
pub fn cell(row: &[String], index: usize) -> String {
	row.get(index).map(|value| value.trim().to_string()).unwrap_or_default()
}
