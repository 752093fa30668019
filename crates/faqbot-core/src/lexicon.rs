//! Banned-word and technical-keyword lists (one token per line).

use crate::error::ChatbotError;
use crate::shared::BotConfig;
use std::io::ErrorKind;
use std::path::Path;

/// Immutable list of lowercase tokens, in file order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Reads a word list from disk. Missing, unreadable or non-UTF-8 files are errors.
    pub fn load(path: &Path) -> Result<Self, ChatbotError> {
        let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::InvalidData => ChatbotError::MalformedWordList {
                path: path.to_path_buf(),
                source,
            },
            _ => ChatbotError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let list = Self::from_lines(&text);
        tracing::debug!(
            target: "faqbot::lexicon",
            path = %path.display(),
            words = list.len(),
            "Loaded word list"
        );
        Ok(list)
    }

    /// Parses one token per line. Tokens are trimmed and lowercased; blank lines are skipped.
    pub fn from_lines(text: &str) -> Self {
        Self::from_words(text.lines())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() && !list.contains(&word) {
                list.push(word);
            }
        }
        Self { words: list }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Every token occurring as a substring of `lowered`, in list order.
    /// `lowered` must already be lowercase.
    pub fn occurrences_in<'a>(&'a self, lowered: &str) -> Vec<&'a str> {
        self.iter().filter(|word| lowered.contains(*word)).collect()
    }
}

/// The word lists a chatbot filters and tags utterances with.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    banned: WordList,
    keywords: WordList,
}

impl Lexicon {
    pub fn new(banned: WordList, keywords: WordList) -> Self {
        Self { banned, keywords }
    }

    /// Loads the lists configured in `config`; an unset path means an empty list.
    pub fn load(config: &BotConfig) -> Result<Self, ChatbotError> {
        let load_optional = |path: Option<&str>| match path {
            Some(p) => WordList::load(Path::new(p)),
            None => Ok(WordList::default()),
        };
        let banned = load_optional(config.banned_words_path.as_deref())?;
        let keywords = load_optional(config.keywords_path.as_deref())?;
        tracing::info!(
            target: "faqbot::lexicon",
            banned = banned.len(),
            keywords = keywords.len(),
            "Word lists ready"
        );
        Ok(Self { banned, keywords })
    }

    pub fn banned(&self) -> &WordList {
        &self.banned
    }

    pub fn keywords(&self) -> &WordList {
        &self.keywords
    }

    /// All banned tokens present in `utterance`, compared case-insensitively.
    pub fn banned_in(&self, utterance: &str) -> Vec<String> {
        let lowered = utterance.to_lowercase();
        self.banned
            .occurrences_in(&lowered)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Technical keywords mentioned in `utterance`.
    pub fn topics_in(&self, utterance: &str) -> Vec<String> {
        let lowered = utterance.to_lowercase();
        self.keywords
            .occurrences_in(&lowered)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
