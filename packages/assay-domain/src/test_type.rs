use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestType {
	#[serde(rename = "Knowledge & Skills")]
	KnowledgeSkills,
	#[serde(rename = "Personality & Behaviour")]
	PersonalityBehaviour,
	#[serde(rename = "Ability & Aptitude")]
	AbilityAptitude,
	#[serde(rename = "Competencies")]
	Competencies,
	#[serde(rename = "Simulations")]
	Simulations,
}
impl TestType {
	pub fn label(self) -> &'static str {
		match self {
			Self::KnowledgeSkills => "Knowledge & Skills",
			Self::PersonalityBehaviour => "Personality & Behaviour",
			Self::AbilityAptitude => "Ability & Aptitude",
			Self::Competencies => "Competencies",
			Self::Simulations => "Simulations",
		}
	}
}
impl Display for TestType {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str(self.label())
	}
}

/// Keyword table in priority order. Matching stops at the first category with a hit.
const KEYWORDS: [(TestType, &[&str]); 5] = [
	(
		TestType::KnowledgeSkills,
		&["java", "python", "sql", "javascript", "coding", "programming", "technical"],
	),
	(TestType::PersonalityBehaviour, &["personality", "opq", "motivational", "behavioral"]),
	(TestType::AbilityAptitude, &["numerical", "verbal", "reasoning", "cognitive", "verify"]),
	(TestType::Competencies, &["leadership", "competenc", "professional"]),
	(TestType::Simulations, &["simulation", "work sample"]),
];

/// Classifies an assessment from its display name and reference.
///
/// Categories are never combined; an unmatched assessment falls back to
/// [`TestType::KnowledgeSkills`].
pub fn infer_test_types(name: &str, assessment_ref: &str) -> Vec<TestType> {
	let haystack = format!("{name} {assessment_ref}").to_lowercase();
	let matched = KEYWORDS
		.iter()
		.find(|(_, keywords)| keywords.iter().any(|keyword| haystack.contains(keyword)))
		.map(|(test_type, _)| *test_type)
		.unwrap_or(TestType::KnowledgeSkills);

	vec![matched]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn earlier_category_wins() {
		// "python" and "personality" both match; knowledge comes first in the table.
		let types = infer_test_types("Python Personality Fit", "https://example.com/x/");

		assert_eq!(types, vec![TestType::KnowledgeSkills]);
	}

	#[test]
	fn matches_against_reference_too() {
		let types = infer_test_types("Account Manager", "https://example.com/opq32r/");

		assert_eq!(types, vec![TestType::PersonalityBehaviour]);
	}

	#[test]
	fn phrase_keywords_match_the_spaced_name() {
		let types =
			infer_test_types("Retail Work Sample", "https://example.com/retail-work-sample/");

		assert_eq!(types, vec![TestType::Simulations]);
	}

	#[test]
	fn displays_label() {
		assert_eq!(TestType::AbilityAptitude.to_string(), "Ability & Aptitude");
	}
}
