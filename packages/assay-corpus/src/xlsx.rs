use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::{Error, Result, table::Table};

/// Reads one worksheet into a [`Table`]; the first non-empty row is the header.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
	let mut workbook = open_workbook_auto(path)
		.map_err(|err| Error::Workbook { path: path.to_path_buf(), source: err })?;
	let sheet_names = workbook.sheet_names().to_vec();
	let sheet_name = match sheet {
		Some(wanted) => sheet_names
			.iter()
			.find(|name| name.as_str() == wanted)
			.cloned()
			.ok_or_else(|| Error::MissingSheet {
				path: path.to_path_buf(),
				sheet: wanted.to_string(),
			})?,
		None => sheet_names.first().cloned().ok_or_else(|| Error::InvalidTable {
			path: path.to_path_buf(),
			message: "workbook has no sheets".to_string(),
		})?,
	};
	let range = workbook
		.worksheet_range(&sheet_name)
		.map_err(|err| Error::Workbook { path: path.to_path_buf(), source: err })?;
	let mut rows = range
		.rows()
		.map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
		.filter(|row| row.iter().any(|cell| !cell.trim().is_empty()));
	let Some(headers) = rows.next() else {
		return Err(Error::InvalidTable {
			path: path.to_path_buf(),
			message: format!("sheet {sheet_name:?} is empty"),
		});
	};

	tracing::debug!(path = %path.display(), sheet = %sheet_name, "Workbook sheet opened.");

	Ok(Table { headers, rows: rows.collect() })
}

fn cell_to_string(cell: &Data) -> String {
	match cell {
		Data::Empty => String::new(),
		Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
		Data::Float(f) =>
			if f.fract() == 0.0 {
				format!("{f:.0}")
			} else {
				f.to_string()
			},
		Data::Int(i) => i.to_string(),
		Data::Bool(b) => b.to_string(),
		Data::DateTime(dt) => dt.to_string(),
		Data::Error(err) => format!("#ERROR: {err:?}"),
	}
}
