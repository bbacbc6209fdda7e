use serde::Serialize;

use crate::test_type::{self, TestType};

pub const DURATION_SHORT_MINUTES: u32 = 15;
pub const DURATION_MEDIUM_MINUTES: u32 = 25;
pub const DURATION_DEFAULT_MINUTES: u32 = 30;
pub const DURATION_LONG_MINUTES: u32 = 45;

const NEW_MARKER: &str = "New";
const NEW_SUFFIX: &str = "(New)";

const DURATION_BUCKETS: [(&[&str], u32); 3] = [
	(&["quick", "screening"], DURATION_SHORT_MINUTES),
	(&["comprehensive", "advanced"], DURATION_LONG_MINUTES),
	(&["behavioral", "personality"], DURATION_MEDIUM_MINUTES),
];

/// Display metadata for one catalogued assessment.
///
/// Every field is a pure function of `assessment_ref`. The source data carries no signal for
/// adaptive or remote support, so those flags are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentRecord {
	pub assessment_ref: String,
	pub name: String,
	pub description: String,
	pub duration_minutes: u32,
	pub adaptive_support: bool,
	pub remote_support: bool,
	pub test_types: Vec<TestType>,
}
impl AssessmentRecord {
	pub fn derive(assessment_ref: &str) -> Self {
		let name = derive_name(assessment_ref);
		let duration_minutes = estimate_duration(&name);
		let test_types = test_type::infer_test_types(&name, assessment_ref);
		let description = describe(&name);

		Self {
			assessment_ref: assessment_ref.to_string(),
			name,
			description,
			duration_minutes,
			adaptive_support: false,
			remote_support: true,
			test_types,
		}
	}
}

/// Builds a display name from the last path segment of a reference.
///
/// `https://host/products/numerical-reasoning-new/` becomes `Numerical Reasoning (New)`.
/// A reference without a trailing slash still names its last segment, not the parent one.
/// `New` is only rewritten as a separate word, so `java8new` stays `Java8New`.
pub fn derive_name(assessment_ref: &str) -> String {
	let segment = assessment_ref
		.split('/')
		.rfind(|part| !part.trim().is_empty())
		.unwrap_or(assessment_ref)
		.trim();
	let titled = title_case(&segment.replace('-', " "));

	if titled == NEW_MARKER {
		return NEW_SUFFIX.to_string();
	}

	match titled.strip_suffix(NEW_MARKER).and_then(|base| base.strip_suffix(' ')) {
		Some(base) => format!("{base} {NEW_SUFFIX}"),
		None => titled,
	}
}

pub fn estimate_duration(name: &str) -> u32 {
	let lowered = name.to_lowercase();

	DURATION_BUCKETS
		.iter()
		.find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(keyword)))
		.map(|(_, minutes)| *minutes)
		.unwrap_or(DURATION_DEFAULT_MINUTES)
}

pub fn describe(name: &str) -> String {
	format!("Assessment for {name}. Comprehensive evaluation tool.")
}

pub fn yes_no(flag: bool) -> &'static str {
	if flag { "Yes" } else { "No" }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
fn title_case(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut in_word = false;

	for ch in text.chars() {
		if ch.is_alphabetic() {
			if in_word {
				out.extend(ch.to_lowercase());
			} else {
				out.extend(ch.to_uppercase());
			}

			in_word = true;
		} else {
			out.push(ch);

			in_word = false;
		}
	}

	out
}
