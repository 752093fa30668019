//! JSON-file persistence and the [`KnowledgeStore`] that owns the live base.

use super::{KnowledgeBase, KnowledgePersistence, QaPair};
use crate::error::ChatbotError;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const DEFAULT_PATH: &str = "./knowledge_base.json";

/// Parses the knowledge file at `path`. A missing file is an empty base.
pub fn load_knowledge_base(path: &Path) -> Result<KnowledgeBase, ChatbotError> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(
                target: "faqbot::knowledge",
                path = %path.display(),
                "Knowledge file not found, starting with an empty base"
            );
            return Ok(KnowledgeBase::new());
        }
        Err(source) => {
            return Err(ChatbotError::Unreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let base: KnowledgeBase =
        serde_json::from_slice(&raw).map_err(|source| ChatbotError::MalformedKnowledge {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(
        target: "faqbot::knowledge",
        path = %path.display(),
        pairs = base.len(),
        "Loaded knowledge base ({} pairs)",
        base.len()
    );
    Ok(base)
}

/// Writes the whole base to `path`, replacing previous content.
/// Non-ASCII text is written as-is with two-space indentation.
pub fn save_knowledge_base(base: &KnowledgeBase, path: &Path) -> Result<(), ChatbotError> {
    let persistence_error = |source: std::io::Error| ChatbotError::Persistence {
        target: path.display().to_string(),
        source,
    };

    let mut json = serde_json::to_string_pretty(base)
        .map_err(|e| persistence_error(std::io::Error::new(ErrorKind::InvalidData, e)))?;
    json.push('\n');

    replace_file(path, |file| file.write_all(json.as_bytes())).map_err(persistence_error)?;

    tracing::info!(
        target: "faqbot::knowledge",
        path = %path.display(),
        pairs = base.len(),
        "Knowledge base saved ({} pairs)",
        base.len()
    );
    Ok(())
}

/// Writes `path` through a temporary file in the same directory, then renames it into
/// place. On any error the previous content of `path` is left as it was.
fn replace_file<F>(path: &Path, write: F) -> std::io::Result<()>
where
    F: FnOnce(&mut fs::File) -> std::io::Result<()>,
{
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent,
        None => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Persistence port backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFilePersistence {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

impl KnowledgePersistence for JsonFilePersistence {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<KnowledgeBase, ChatbotError> {
        load_knowledge_base(&self.path)
    }

    fn save(&self, base: &KnowledgeBase) -> Result<(), ChatbotError> {
        save_knowledge_base(base, &self.path)
    }
}

/// Owns the live knowledge base and flushes it through a persistence port on every change.
pub struct KnowledgeStore {
    base: KnowledgeBase,
    persistence: Box<dyn KnowledgePersistence>,
}

impl KnowledgeStore {
    /// Loads the base through `persistence` (load-or-empty).
    pub fn open(persistence: impl KnowledgePersistence + 'static) -> Result<Self, ChatbotError> {
        let base = persistence.load()?;
        Ok(Self {
            base,
            persistence: Box::new(persistence),
        })
    }

    /// Opens the JSON knowledge file at `path`.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, ChatbotError> {
        Self::open(JsonFilePersistence::new(path.as_ref()))
    }

    pub fn base(&self) -> &KnowledgeBase {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    pub fn location(&self) -> String {
        self.persistence.describe()
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.base.question_texts()
    }

    pub fn answer_for(&self, question: &str) -> Option<&str> {
        self.base.answer_for(question)
    }

    /// Appends `pair` and persists the whole base.
    ///
    /// If the save fails the pair is dropped again, so the in-memory base never
    /// holds an answer that is not on storage.
    pub fn learn(&mut self, pair: QaPair) -> Result<(), ChatbotError> {
        let question = pair.question.clone();
        self.base.push(pair);
        if let Err(e) = self.persistence.save(&self.base) {
            self.base.pop();
            tracing::error!(
                target: "faqbot::knowledge",
                location = %self.persistence.describe(),
                error = %e,
                "Failed to persist learned pair; discarded"
            );
            return Err(e);
        }
        tracing::info!(
            target: "faqbot::knowledge",
            question = %question,
            pairs = self.base.len(),
            "Learned new pair for '{}'",
            question
        );
        Ok(())
    }
}

impl std::fmt::Debug for KnowledgeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeStore")
            .field("location", &self.persistence.describe())
            .field("pairs", &self.base.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::InMemoryPersistence;

    #[test]
    fn test_missing_file_loads_empty_base() {
        let dir = tempfile::tempdir().unwrap();
        let base = load_knowledge_base(&dir.path().join("absent.json")).unwrap();
        assert!(base.is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_knowledge_base(&path).unwrap_err();
        assert!(matches!(err, ChatbotError::MalformedKnowledge { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            load_knowledge_base(&path),
            Err(ChatbotError::MalformedKnowledge { .. })
        ));
    }

    #[test]
    fn test_save_keeps_non_ascii_and_indentation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("kb.json");
        let base = KnowledgeBase::from_pairs(vec![QaPair::new("¿Qué hora es?", "Las cinco, señor 🕔")]);
        save_knowledge_base(&base, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("¿Qué hora es?"));
        assert!(text.contains("señor 🕔"));
        assert!(!text.contains("\\u"));
        assert!(text.contains("\n  \"questions\": ["));
        assert_eq!(load_knowledge_base(&path).unwrap(), base);
    }

    #[test]
    fn test_learn_appends_and_persists() {
        let persistence = InMemoryPersistence::new();
        let mut store = KnowledgeStore::open(persistence.clone()).unwrap();
        store.learn(QaPair::new("q1", "a1")).unwrap();
        store.learn(QaPair::new("q2", "a2")).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(persistence.save_count(), 2);
        let saved = persistence.snapshot().unwrap();
        assert_eq!(saved.pairs()[1], QaPair::new("q2", "a2"));
    }

    #[test]
    fn test_learn_rolls_back_when_save_fails() {
        let persistence = InMemoryPersistence::with_base(KnowledgeBase::from_pairs(vec![QaPair::new("q", "a")]));
        let mut store = KnowledgeStore::open(persistence.clone()).unwrap();
        persistence.fail_saves(true);

        let err = store.learn(QaPair::new("new", "answer")).unwrap_err();
        assert!(err.is_persistence_failure());
        assert_eq!(store.len(), 1);
        assert_eq!(store.answer_for("new"), None);
    }

    #[test]
    fn test_learn_to_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        let mut store = KnowledgeStore::open_path(&path).unwrap();
        // A directory where the file should be makes the write fail.
        fs::create_dir(&path).unwrap();

        let err = store.learn(QaPair::new("q", "a")).unwrap_err();
        assert!(err.is_persistence_failure());
        assert!(store.is_empty());
    }

    #[test]
    fn test_interrupted_write_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        let base = KnowledgeBase::from_pairs(vec![QaPair::new("hello", "world")]);
        save_knowledge_base(&base, &path).unwrap();

        // Half a document, then the device fills up.
        let err = replace_file(&path, |file| {
            file.write_all(b"{\n  \"questions\": [\n    {\"question\": \"big\", \"answer\": \"aaaa")?;
            Err(std::io::Error::new(ErrorKind::Other, "No space left on device"))
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "No space left on device");

        assert_eq!(load_knowledge_base(&path).unwrap(), base);
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1, "temporary file left behind");
    }
}
