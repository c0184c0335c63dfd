pub mod record_parser;
pub mod sampler;
pub mod score_recorder;
pub mod segmenter;

pub use record_parser::{DuplicateOption, MalformedOption, ParseRejection, ParsedBlock, QuestionRecordParser};
pub use sampler::{sample_quiz, QuizSampler};
pub use score_recorder::ScoreRecorder;
pub use segmenter::QuestionSegmenter;
