pub mod metadata;
pub mod test_type;

pub use metadata::AssessmentRecord;
pub use test_type::TestType;
