//! Per-conversation turn handling.
//!
//! A conversation is either [`SessionState::Idle`] or waiting for a taught answer
//! ([`SessionState::Learning`]). Answering, banning and greeting happen within a single
//! turn and always leave the conversation idle.
//!
//! | State    | Utterance            | Reply            | Next state |
//! |----------|----------------------|------------------|------------|
//! | any      | `quit`               | `Goodbye`        | Idle       |
//! | Idle     | contains banned word | `Banned`         | Idle       |
//! | Idle     | close question       | `Answer`         | Idle       |
//! | Idle     | no close question    | `TeachMe`        | Learning   |
//! | Learning | `skip`               | `Skipped`        | Idle       |
//! | Learning | blank                | `EmptyAnswer`    | Learning   |
//! | Learning | anything else        | `Learned`        | Idle       |

mod chatbot;
mod reply;

pub use chatbot::Chatbot;
pub use reply::{Reply, TurnResponse};

use crate::error::ChatbotError;
use crate::knowledge::QaPair;
use serde::Serialize;

/// Ends the conversation in any state.
pub const QUIT_SENTINEL: &str = "quit";
/// Abandons a pending learning exchange.
pub const SKIP_SENTINEL: &str = "skip";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    /// Waiting for the answer to `question`.
    Learning { question: String },
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::Learning { .. } => SessionPhase::Learning,
        }
    }
}

/// [`SessionState`] without its payload, for front doors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Learning,
}

/// Drives one conversation through its turns.
#[derive(Debug, Clone, Default)]
pub struct SessionController {
    state: SessionState,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Runs one turn. The only error is a failed save while learning; the
    /// conversation is idle again and the pair was not learned.
    pub fn turn(&mut self, bot: &mut Chatbot, utterance: &str) -> Result<Reply, ChatbotError> {
        let utterance = utterance.trim();

        if utterance.eq_ignore_ascii_case(QUIT_SENTINEL) {
            if let SessionState::Learning { question } = &self.state {
                tracing::debug!(target: "faqbot::session", question = %question, "Learning abandoned by quit");
            }
            self.state = SessionState::Idle;
            return Ok(Reply::Goodbye);
        }

        match std::mem::take(&mut self.state) {
            SessionState::Idle => Ok(self.answer(bot, utterance)),
            SessionState::Learning { question } => self.finish_learning(bot, question, utterance),
        }
    }

    /// Turn API: never fails, errors become the reply text.
    pub fn submit_utterance(&mut self, bot: &mut Chatbot, utterance: &str) -> TurnResponse {
        let topics = bot.lexicon().topics_in(utterance);
        let (answer, ended) = match self.turn(bot, utterance) {
            Ok(reply) => (reply.to_string(), reply.ends_conversation()),
            Err(e) => {
                tracing::error!(target: "faqbot::session", error = %e, "Turn failed");
                (e.user_message(), false)
            }
        };
        TurnResponse {
            answer,
            state: self.state.phase(),
            ended,
            topics,
        }
    }

    fn answer(&mut self, bot: &Chatbot, utterance: &str) -> Reply {
        if utterance.is_empty() {
            return Reply::EmptyUtterance;
        }

        let banned = bot.lexicon().banned_in(utterance);
        if !banned.is_empty() {
            tracing::warn!(
                target: "faqbot::session",
                words = ?banned,
                "Utterance rejected for banned words"
            );
            return Reply::Banned(banned);
        }

        match bot.lookup(utterance) {
            Some(answer) => Reply::Answer(answer.to_string()),
            None => {
                tracing::debug!(target: "faqbot::session", question = %utterance, "No close question, asking to learn");
                self.state = SessionState::Learning {
                    question: utterance.to_string(),
                };
                Reply::TeachMe
            }
        }
    }

    fn finish_learning(&mut self, bot: &mut Chatbot, question: String, answer: &str) -> Result<Reply, ChatbotError> {
        if answer.eq_ignore_ascii_case(SKIP_SENTINEL) {
            tracing::debug!(target: "faqbot::session", question = %question, "Learning skipped");
            return Ok(Reply::Skipped);
        }
        if answer.is_empty() {
            self.state = SessionState::Learning { question };
            return Ok(Reply::EmptyAnswer);
        }
        bot.learn(QaPair::new(question, answer))?;
        Ok(Reply::Learned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{InMemoryPersistence, KnowledgeBase, KnowledgeStore};
    use crate::lexicon::{Lexicon, WordList};
    use crate::matcher::Matcher;

    fn bot_with(persistence: InMemoryPersistence) -> Chatbot {
        let store = KnowledgeStore::open(persistence).unwrap();
        let lexicon = Lexicon::new(
            WordList::from_words(["darn", "heck"]),
            WordList::from_words(["rust"]),
        );
        Chatbot::new(store, lexicon, Matcher::default())
    }

    fn seeded() -> InMemoryPersistence {
        InMemoryPersistence::with_base(KnowledgeBase::from_pairs(vec![
            QaPair::new("What is Rust?", "A systems programming language."),
            QaPair::new("Who are you?", "A small FAQ bot."),
        ]))
    }

    #[test]
    fn test_known_question_is_answered() {
        let mut bot = bot_with(seeded());
        let mut session = SessionController::new();
        let reply = session.turn(&mut bot, "what is rust").unwrap();
        assert_eq!(reply, Reply::Answer("A systems programming language.".into()));
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn test_banned_words_short_circuit_matching() {
        let persistence = seeded();
        let mut bot = bot_with(persistence.clone());
        let mut session = SessionController::new();

        let reply = session.turn(&mut bot, "Who are you, DARN it? heck").unwrap();
        assert_eq!(reply, Reply::Banned(vec!["darn".into(), "heck".into()]));
        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(persistence.save_count(), 0);
    }

    #[test]
    fn test_unknown_question_learns_answer() {
        let persistence = seeded();
        let mut bot = bot_with(persistence.clone());
        let mut session = SessionController::new();

        assert_eq!(session.turn(&mut bot, "Where do penguins live?").unwrap(), Reply::TeachMe);
        assert_eq!(
            session.state(),
            &SessionState::Learning {
                question: "Where do penguins live?".into()
            }
        );

        assert_eq!(session.turn(&mut bot, "Mostly in Antarctica.").unwrap(), Reply::Learned);
        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(bot.store().len(), 3);
        assert_eq!(persistence.save_count(), 1);

        let reply = session.turn(&mut bot, "Where do penguins live?").unwrap();
        assert_eq!(reply, Reply::Answer("Mostly in Antarctica.".into()));
    }

    #[test]
    fn test_skip_in_any_case_leaves_store_unchanged() {
        for skip in ["skip", "SKIP", "  Skip "] {
            let persistence = seeded();
            let mut bot = bot_with(persistence.clone());
            let mut session = SessionController::new();

            session.turn(&mut bot, "Where do penguins live?").unwrap();
            assert_eq!(session.turn(&mut bot, skip).unwrap(), Reply::Skipped);
            assert_eq!(bot.store().len(), 2);
            assert_eq!(persistence.save_count(), 0);
            assert_eq!(session.state(), &SessionState::Idle);
        }
    }

    #[test]
    fn test_blank_answer_keeps_learning() {
        let mut bot = bot_with(seeded());
        let mut session = SessionController::new();

        session.turn(&mut bot, "Where do penguins live?").unwrap();
        assert_eq!(session.turn(&mut bot, "   ").unwrap(), Reply::EmptyAnswer);
        assert_eq!(session.state().phase(), SessionPhase::Learning);
        assert_eq!(session.turn(&mut bot, "Antarctica").unwrap(), Reply::Learned);
    }

    #[test]
    fn test_learning_accepts_banned_words_and_sentinel_like_text_as_answer() {
        let mut bot = bot_with(seeded());
        let mut session = SessionController::new();

        session.turn(&mut bot, "Where do penguins live?").unwrap();
        assert_eq!(session.turn(&mut bot, "skip school and ask").unwrap(), Reply::Learned);
    }

    #[test]
    fn test_quit_ends_conversation_and_abandons_learning() {
        let persistence = seeded();
        let mut bot = bot_with(persistence.clone());
        let mut session = SessionController::new();

        session.turn(&mut bot, "Where do penguins live?").unwrap();
        let reply = session.turn(&mut bot, "QUIT").unwrap();
        assert_eq!(reply, Reply::Goodbye);
        assert!(reply.ends_conversation());
        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(persistence.save_count(), 0);
    }

    #[test]
    fn test_quit_must_be_whole_utterance() {
        let mut bot = bot_with(seeded());
        let mut session = SessionController::new();
        assert_eq!(session.turn(&mut bot, "how do I quit vim").unwrap(), Reply::TeachMe);
    }

    #[test]
    fn test_empty_utterance() {
        let mut bot = bot_with(seeded());
        let mut session = SessionController::new();
        assert_eq!(session.turn(&mut bot, "  ").unwrap(), Reply::EmptyUtterance);
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn test_persistence_failure_is_reported_and_not_learned() {
        let persistence = seeded();
        let mut bot = bot_with(persistence.clone());
        let mut session = SessionController::new();
        persistence.fail_saves(true);

        session.turn(&mut bot, "Where do penguins live?").unwrap();
        let err = session.turn(&mut bot, "Antarctica").unwrap_err();
        assert!(err.is_persistence_failure());
        assert_eq!(bot.store().len(), 2);
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn test_submit_utterance_renders_replies_and_errors() {
        let persistence = seeded();
        let mut bot = bot_with(persistence.clone());
        let mut session = SessionController::new();

        let response = session.submit_utterance(&mut bot, "Is Rust fast?");
        assert_eq!(response.answer, Reply::TeachMe.to_string());
        assert_eq!(response.state, SessionPhase::Learning);
        assert_eq!(response.topics, vec!["rust".to_string()]);
        assert!(!response.ended);

        persistence.fail_saves(true);
        let response = session.submit_utterance(&mut bot, "Very.");
        assert!(response.answer.contains("could not save"));
        assert_eq!(response.state, SessionPhase::Idle);

        let response = session.submit_utterance(&mut bot, "quit");
        assert_eq!(response.answer, "Goodbye!");
        assert!(response.ended);
    }

    #[test]
    fn test_serializes_phase_in_snake_case() {
        let json = serde_json::to_value(SessionPhase::Learning).unwrap();
        assert_eq!(json, "learning");
    }
}
