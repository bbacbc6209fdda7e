use std::{fs, path::Path};

use serde_json::Value;

use crate::{Error, Result, table::Table};

/// Reads a JSON array of row objects into a [`Table`] whose headers are the union of object keys.
pub fn read_table(path: &Path) -> Result<Table> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Io { path: path.to_path_buf(), source: err })?;
	let value: Value = serde_json::from_str(&raw)
		.map_err(|err| Error::Json { path: path.to_path_buf(), source: err })?;
	let Value::Array(items) = value else {
		return Err(Error::InvalidTable {
			path: path.to_path_buf(),
			message: "expected a top-level array of row objects".to_string(),
		});
	};
	let mut headers: Vec<String> = Vec::new();
	let mut objects = Vec::with_capacity(items.len());

	for (index, item) in items.into_iter().enumerate() {
		let Value::Object(object) = item else {
			return Err(Error::InvalidTable {
				path: path.to_path_buf(),
				message: format!("row {index} is not an object"),
			});
		};

		for key in object.keys() {
			if !headers.iter().any(|header| header == key) {
				headers.push(key.clone());
			}
		}

		objects.push(object);
	}

	let rows = objects
		.iter()
		.map(|object| {
			headers
				.iter()
				.map(|header| object.get(header).map(value_to_string).unwrap_or_default())
				.collect()
		})
		.collect();

	Ok(Table { headers, rows })
}

fn value_to_string(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}
