/// One historical example: a past hiring query and the assessment it was mapped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRow {
	pub query: String,
	pub assessment_ref: String,
}

/// One evaluation query, labeled when the source table carries a reference column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalRow {
	pub query: String,
	pub assessment_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
	pub query: String,
	pub assessment_ref: String,
}
