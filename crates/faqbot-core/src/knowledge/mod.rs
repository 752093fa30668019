//! Question/answer knowledge base.
//!
//! ## Storage
//!
//! The base is an ordered list of pairs kept under a single `questions` key:
//!
//! ```json
//! {
//!   "questions": [
//!     { "question": "What is Rust?", "answer": "A systems language." }
//!   ]
//! }
//! ```
//!
//! Files written by the older Spanish front end (`preguntas` / `texto` / `respuesta`)
//! are still accepted on load; saves always use the names above.

mod memory;
mod store;

pub use memory::InMemoryPersistence;
pub use store::{load_knowledge_base, save_knowledge_base, JsonFilePersistence, KnowledgeStore};

use crate::error::ChatbotError;
use serde::{Deserialize, Serialize};

/// One stored question with its answer. Identity is the exact question text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    #[serde(alias = "texto")]
    pub question: String,
    #[serde(alias = "respuesta")]
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Ordered sequence of pairs. Questions are not deduplicated; lookups return the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default, alias = "preguntas")]
    questions: Vec<QaPair>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: Vec<QaPair>) -> Self {
        Self { questions: pairs }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn pairs(&self) -> &[QaPair] {
        &self.questions
    }

    /// Question texts in storage order.
    pub fn question_texts(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|p| p.question.as_str())
    }

    /// Answer of the first pair whose question equals `question` exactly.
    pub fn answer_for(&self, question: &str) -> Option<&str> {
        self.questions
            .iter()
            .find(|p| p.question == question)
            .map(|p| p.answer.as_str())
    }

    pub(crate) fn push(&mut self, pair: QaPair) {
        self.questions.push(pair);
    }

    pub(crate) fn pop(&mut self) -> Option<QaPair> {
        self.questions.pop()
    }
}

/// Where a knowledge base is loaded from and flushed to.
///
/// `save` always receives the full base and must replace whatever was stored before.
pub trait KnowledgePersistence: Send + Sync {
    /// Human-readable location, used in logs and error messages.
    fn describe(&self) -> String;

    /// Loads the stored base; an absent resource yields an empty base.
    fn load(&self) -> Result<KnowledgeBase, ChatbotError>;

    fn save(&self, base: &KnowledgeBase) -> Result<(), ChatbotError>;
}
