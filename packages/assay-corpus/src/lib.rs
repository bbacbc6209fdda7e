pub mod json;
pub mod models;
pub mod predictions;
pub mod table;
pub mod xlsx;

mod error;

pub use error::Error;
pub use models::{CorpusRow, EvalRow, Prediction};
pub use predictions::write_predictions;
pub use table::Table;

use std::path::Path;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reads a tabular file, choosing the reader from its extension.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
	let extension =
		path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).unwrap_or_default();

	match extension.as_str() {
		"xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => xlsx::read_table(path, sheet),
		"json" => json::read_table(path),
		_ => Err(Error::UnsupportedFormat { path: path.to_path_buf() }),
	}
}

/// Loads the historical (query, assessment) examples described by `cfg`.
///
/// Rows with a blank query or reference are skipped. An empty result is not an error here; the
/// engine decides whether an empty corpus is usable.
pub fn load_corpus(cfg: &assay_config::Corpus) -> Result<Vec<CorpusRow>> {
	let path = cfg.path.as_path();
	let table = read_table(path, cfg.sheet.as_deref())?;
	let query_idx = table.require_column(path, &cfg.query_column)?;
	let ref_idx = table.require_column(path, &cfg.ref_column)?;
	let mut rows = Vec::with_capacity(table.rows.len());
	let mut skipped = 0_usize;

	for (index, row) in table.rows.iter().enumerate() {
		let query = table::cell(row, query_idx);
		let assessment_ref = table::cell(row, ref_idx);

		if query.is_empty() || assessment_ref.is_empty() {
			tracing::warn!(
				path = %path.display(),
				row = index + 1,
				"Skipping corpus row with a blank query or reference."
			);

			skipped += 1;

			continue;
		}

		rows.push(CorpusRow { query, assessment_ref });
	}

	tracing::info!(path = %path.display(), rows = rows.len(), skipped, "Corpus loaded.");

	Ok(rows)
}

/// Loads evaluation queries; `ref_column` attaches labels when the table has them.
pub fn load_queries(
	path: &Path,
	sheet: Option<&str>,
	query_column: &str,
	ref_column: Option<&str>,
) -> Result<Vec<EvalRow>> {
	let table = read_table(path, sheet)?;
	let query_idx = table.require_column(path, query_column)?;
	let ref_idx = ref_column.map(|column| table.require_column(path, column)).transpose()?;
	let rows: Vec<EvalRow> = table
		.rows
		.iter()
		.filter_map(|row| {
			let query = table::cell(row, query_idx);

			if query.is_empty() {
				return None;
			}

			let assessment_ref = ref_idx
				.map(|index| table::cell(row, index))
				.filter(|assessment_ref| !assessment_ref.is_empty());

			Some(EvalRow { query, assessment_ref })
		})
		.collect();

	tracing::info!(path = %path.display(), rows = rows.len(), "Evaluation queries loaded.");

	Ok(rows)
}
