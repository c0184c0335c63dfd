pub mod document;
pub mod question;
pub mod score;
pub mod session;

pub use document::{DocumentHandle, RawBlock};
pub use question::{QuestionRecord, QuestionSet, OPTION_COUNT};
pub use score::{ScoreEntry, UserIdentity};
pub use session::{QuizOutcome, QuizSession};
