pub mod extraction_flow;
pub mod quiz_flow;

pub use extraction_flow::{DuplicateWarning, ExtractionReport, OptionWarning, QuestionSetExtractor, RejectedBlock};
pub use quiz_flow::QuizFlow;
