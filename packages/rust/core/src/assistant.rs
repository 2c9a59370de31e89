//! One assistant turn: moderation → knowledge base lookup → model fallback.

use tracing::{error, info, instrument, warn};

use novainfor_knowledge::{KnowledgeBase, MatchOutcome, QuestionMatcher};
use novainfor_llm::ModelService;
use novainfor_shared::{AppConfig, AssistantConfig, CacheHitPolicy};

use crate::conversation::Transcript;
use crate::prompt;

/// Which path produced a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    /// Moderation flagged the input.
    Refused,
    /// Answered from a stored interview record.
    Matched { question: String, score: u8 },
    /// Generated by the model service.
    Generated,
    /// The model service failed; the fixed apology was returned.
    Apology,
}

/// Text shown to the user plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

/// Answers questions for any number of sessions.
///
/// Holds only read-only state; each session's [`Transcript`] is passed in.
pub struct Assistant<M> {
    service: M,
    knowledge: KnowledgeBase,
    matcher: QuestionMatcher,
    texts: AssistantConfig,
    system_prompt: String,
    moderation: bool,
}

impl<M: ModelService> Assistant<M> {
    pub fn new(service: M, knowledge: KnowledgeBase, config: &AppConfig) -> Self {
        Self {
            service,
            knowledge,
            matcher: QuestionMatcher::new(config.matcher.threshold),
            texts: config.assistant.clone(),
            system_prompt: prompt::system_prompt(&config.sources),
            moderation: config.openai.moderation,
        }
    }

    /// A transcript seeded with this assistant's system prompt and greeting.
    pub fn new_transcript(&self) -> Transcript {
        Transcript::new(self.system_prompt.clone(), self.texts.greeting.clone())
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Answer one question, updating the transcript.
    ///
    /// Never fails: service errors become the apology text. The transcript
    /// only grows on a generated answer, or on a matched answer when the
    /// cache-hit policy is [`CacheHitPolicy::Append`].
    #[instrument(skip_all, fields(session = %transcript.session_id()))]
    pub async fn respond(&self, transcript: &mut Transcript, question: &str) -> Reply {
        let question = question.trim();

        if self.moderation {
            match self.service.is_flagged(question).await {
                Ok(false) => {}
                Ok(true) => {
                    warn!("input flagged by moderation");
                    return self.reply(&self.texts.refusal, ReplySource::Refused);
                }
                Err(e) => {
                    error!(error = %e, "moderation check failed");
                    return self.reply(&self.texts.apology, ReplySource::Apology);
                }
            }
        }

        if let MatchOutcome::Hit { record, score } = self.matcher.find(question, &self.knowledge) {
            let answer = record.format_answer();
            info!(score, matched = %record.question, "answered from knowledge base");

            if self.texts.cache_hit_policy == CacheHitPolicy::Append {
                transcript.record_exchange(question, &answer);
            }
            return Reply {
                text: answer,
                source: ReplySource::Matched {
                    question: record.question.clone(),
                    score,
                },
            };
        }

        let outgoing = transcript.with_user_turn(question);
        match self.service.complete(&outgoing).await {
            Ok(answer) => {
                info!("answered by model");
                transcript.record_exchange(question, &answer);
                Reply {
                    text: answer,
                    source: ReplySource::Generated,
                }
            }
            Err(e) => {
                error!(error = %e, "failed to generate response");
                self.reply(&self.texts.apology, ReplySource::Apology)
            }
        }
    }

    fn reply(&self, text: &str, source: ReplySource) -> Reply {
        Reply {
            text: text.to_string(),
            source,
        }
    }
}
