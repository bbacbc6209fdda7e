use std::{fs, path::Path};

use crate::{Error, Result, models::Prediction};

pub const QUERY_HEADER: &str = "Query";
pub const REF_HEADER: &str = "Assessment_url";

/// Writes flattened (query, assessment) predictions as a two-column CSV file.
pub fn write_predictions(path: &Path, predictions: &[Prediction]) -> Result<()> {
	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		fs::create_dir_all(parent)
			.map_err(|err| Error::Io { path: parent.to_path_buf(), source: err })?;
	}

	fs::write(path, render_predictions(predictions))
		.map_err(|err| Error::Io { path: path.to_path_buf(), source: err })?;

	tracing::info!(path = %path.display(), rows = predictions.len(), "Predictions written.");

	Ok(())
}

pub fn render_predictions(predictions: &[Prediction]) -> String {
	let mut out = format!("{QUERY_HEADER},{REF_HEADER}\n");

	for prediction in predictions {
		out.push_str(&csv_field(&prediction.query));
		out.push(',');
		out.push_str(&csv_field(&prediction.assessment_ref));
		out.push('\n');
	}

	out
}

fn csv_field(value: &str) -> String {
	if value.contains([',', '"', '\n', '\r']) {
		format!("\"{}\"", value.replace('"', "\"\""))
	} else {
		value.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn quotes_fields_with_separators() {
		assert_eq!(csv_field("plain"), "plain");
		assert_eq!(csv_field("java, python"), "\"java, python\"");
		assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
		assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
	}
}
