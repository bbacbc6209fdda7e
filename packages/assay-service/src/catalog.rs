use std::collections::{HashMap, HashSet};

use assay_domain::AssessmentRecord;

use crate::CorpusIndex;

/// Derived metadata for every distinct assessment in the corpus, in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct MetadataCatalog {
	records: Vec<AssessmentRecord>,
	by_ref: HashMap<String, usize>,
}
impl MetadataCatalog {
	pub fn build(index: &CorpusIndex) -> Self {
		let mut seen = HashSet::new();

		Self::from_records(
			index
				.examples()
				.iter()
				.filter(|example| seen.insert(example.assessment_ref.as_str()))
				.map(|example| AssessmentRecord::derive(&example.assessment_ref)),
		)
	}

	/// Later records with an already seen reference are ignored.
	pub fn from_records(records: impl IntoIterator<Item = AssessmentRecord>) -> Self {
		let mut catalog = Self::default();

		for record in records {
			if catalog.by_ref.contains_key(&record.assessment_ref) {
				continue;
			}

			catalog.by_ref.insert(record.assessment_ref.clone(), catalog.records.len());
			catalog.records.push(record);
		}

		catalog
	}

	pub fn get(&self, assessment_ref: &str) -> Option<&AssessmentRecord> {
		self.by_ref.get(assessment_ref).map(|&idx| &self.records[idx])
	}

	pub fn records(&self) -> &[AssessmentRecord] {
		&self.records
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}
