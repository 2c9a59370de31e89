//! Conversation orchestration for Nova-Infor.
//!
//! This crate ties together the interview knowledge base, the question
//! matcher, and the model service into a single assistant turn
//! (see [`assistant::Assistant::respond`]).

pub mod assistant;
pub mod conversation;
pub mod library;
pub mod prompt;

pub use assistant::{Assistant, Reply, ReplySource};
pub use conversation::Transcript;
pub use library::Library;
