//! faqbot-core: knowledge store, fuzzy matcher, word lists, grade calculator and the
//! per-conversation session state machine.
//!
//! Front doors (the HTTP gateway and the console) only collect utterances and render
//! replies; every decision is taken here.

mod error;
mod grades;
mod knowledge;
mod lexicon;
mod matcher;
mod session;
mod shared;

pub use error::ChatbotError;
pub use grades::{evaluate_grades, GradeError, GradeReport, Verdict, MAX_SCORE, PASSING_AVERAGE, SCORE_COUNT};
pub use knowledge::{
    load_knowledge_base, save_knowledge_base, InMemoryPersistence, JsonFilePersistence, KnowledgeBase,
    KnowledgePersistence, KnowledgeStore, QaPair,
};
pub use lexicon::{Lexicon, WordList};
pub use matcher::{find_best_match, similarity_ratio, Matcher, DEFAULT_CUTOFF};
pub use session::{
    Chatbot, Reply, SessionController, SessionPhase, SessionState, TurnResponse, QUIT_SENTINEL, SKIP_SENTINEL,
};
pub use shared::BotConfig;
