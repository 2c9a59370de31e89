//! Session transcript.

use uuid::Uuid;

use novainfor_shared::{ConversationMessage, Role};

/// Ordered conversation history for one session.
///
/// Always starts with exactly one system message followed by the greeting.
/// Only user and assistant turns can be appended.
#[derive(Debug, Clone)]
pub struct Transcript {
    session_id: Uuid,
    system_prompt: String,
    greeting: String,
    messages: Vec<ConversationMessage>,
}

impl Transcript {
    /// Create a transcript seeded with the system prompt and greeting.
    pub fn new(system_prompt: impl Into<String>, greeting: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        let greeting = greeting.into();
        let messages = vec![
            ConversationMessage::system(system_prompt.clone()),
            ConversationMessage::assistant(greeting.clone()),
        ];

        Self {
            session_id: Uuid::now_v7(),
            system_prompt,
            greeting,
            messages,
        }
    }

    /// A new session with the same seed.
    pub fn fresh(&self) -> Self {
        Self::new(self.system_prompt.clone(), self.greeting.clone())
    }

    /// Discard every turn and start a new session with the same seed.
    pub fn reset(&mut self) {
        *self = self.fresh();
        tracing::info!(session = %self.session_id, "conversation reset");
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    /// Messages after the two-message seed.
    pub fn turns(&self) -> &[ConversationMessage] {
        &self.messages[2..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The transcript as it would be with `question` appended, without
    /// recording it.
    pub fn with_user_turn(&self, question: &str) -> Vec<ConversationMessage> {
        let mut outgoing = self.messages.clone();
        outgoing.push(ConversationMessage::user(question));
        outgoing
    }

    /// Record a completed exchange.
    pub fn record_exchange(&mut self, question: &str, answer: &str) {
        self.messages.push(ConversationMessage::user(question));
        self.messages.push(ConversationMessage::assistant(answer));
        debug_assert_eq!(
            self.messages
                .iter()
                .filter(|m| m.role == Role::System)
                .count(),
            1
        );
    }
}
