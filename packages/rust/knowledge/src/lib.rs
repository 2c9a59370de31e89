//! Interview tables and the question matcher.
//!
//! CSV files with a `Pregunta` column are loaded into [`InterviewTable`]s,
//! indexed by question into a [`KnowledgeBase`], and searched with
//! [`QuestionMatcher`] before a question is handed to the model service.

mod matcher;
mod table;

pub use matcher::{DEFAULT_THRESHOLD, MatchOutcome, QuestionMatcher, similarity};
pub use table::{InterviewRecord, InterviewTable, KnowledgeBase, QUESTION_COLUMN};
