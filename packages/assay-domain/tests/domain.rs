use assay_domain::{AssessmentRecord, TestType, metadata};

const NUMERICAL_NEW: &str =
	"https://www.shl.com/solutions/products/product-catalog/view/numerical-reasoning-new/";

#[test]
fn new_variant_becomes_parenthetical_suffix() {
	let record = AssessmentRecord::derive(NUMERICAL_NEW);

	assert!(record.name.ends_with("(New)"), "Unexpected name: {}", record.name);
	assert_eq!(record.name, "Numerical Reasoning (New)");
	assert!(!record.name.contains("new"));
}

#[test]
fn derivation_is_pure() {
	assert_eq!(AssessmentRecord::derive(NUMERICAL_NEW), AssessmentRecord::derive(NUMERICAL_NEW));
}

#[test]
fn record_carries_fixed_support_flags_and_template_description() {
	let record = AssessmentRecord::derive(NUMERICAL_NEW);

	assert!(!record.adaptive_support);
	assert!(record.remote_support);
	assert_eq!(metadata::yes_no(record.adaptive_support), "No");
	assert_eq!(metadata::yes_no(record.remote_support), "Yes");
	assert_eq!(
		record.description,
		"Assessment for Numerical Reasoning (New). Comprehensive evaluation tool."
	);
	assert_eq!(record.test_types, vec![TestType::AbilityAptitude]);
	assert_eq!(record.duration_minutes, metadata::DURATION_DEFAULT_MINUTES);
}

#[test]
fn unmatched_reference_defaults_to_knowledge_and_skills() {
	let record = AssessmentRecord::derive("https://example.com/view/customer-service-phone/");

	assert_eq!(record.test_types, vec![TestType::KnowledgeSkills]);
}

#[test]
fn leadership_maps_to_competencies() {
	let record = AssessmentRecord::derive("https://example.com/view/enterprise-leadership-report/");

	assert_eq!(record.name, "Enterprise Leadership Report");
	assert_eq!(record.test_types, vec![TestType::Competencies]);
}

#[test]
fn record_serializes_test_types_as_labels() {
	let record = AssessmentRecord::derive("https://example.com/view/opq-team-types/");
	let json = serde_json::to_value(&record).expect("Failed to serialize record.");

	assert_eq!(json["test_types"], serde_json::json!(["Personality & Behaviour"]));
	assert_eq!(json["duration_minutes"], serde_json::json!(30));
}
