use crate::error::ChatbotError;
use crate::knowledge::{KnowledgeStore, QaPair};
use crate::lexicon::Lexicon;
use crate::matcher::Matcher;
use crate::shared::BotConfig;

/// Everything a turn reads or mutates: the knowledge store, the word lists and the matcher.
///
/// One instance serves every conversation; front doors that run turns concurrently
/// must hold it behind a single lock for the whole turn.
#[derive(Debug)]
pub struct Chatbot {
    store: KnowledgeStore,
    lexicon: Lexicon,
    matcher: Matcher,
}

impl Chatbot {
    pub fn new(store: KnowledgeStore, lexicon: Lexicon, matcher: Matcher) -> Self {
        Self {
            store,
            lexicon,
            matcher,
        }
    }

    /// Loads the knowledge file and word lists named in `config`.
    pub fn from_config(config: &BotConfig) -> Result<Self, ChatbotError> {
        let store = KnowledgeStore::open_path(&config.knowledge_path)?;
        let lexicon = Lexicon::load(config)?;
        tracing::info!(
            target: "faqbot::session",
            app = %config.app_name,
            pairs = store.len(),
            cutoff = config.match_cutoff,
            "Chatbot ready"
        );
        Ok(Self::new(store, lexicon, Matcher::new(config.match_cutoff)))
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Answer of the stored question closest to `utterance`, if one reaches the cutoff.
    pub fn lookup(&self, utterance: &str) -> Option<&str> {
        let question = self.matcher.best_match(utterance, self.store.questions())?;
        let answer = self.store.answer_for(question);
        if answer.is_none() {
            tracing::error!(
                target: "faqbot::session",
                question = %question,
                "Matched question has no stored answer"
            );
        }
        answer
    }

    pub(crate) fn learn(&mut self, pair: QaPair) -> Result<(), ChatbotError> {
        self.store.learn(pair)
    }
}
