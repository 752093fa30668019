use super::SessionPhase;
use serde::Serialize;
use std::fmt;

/// What the bot says at the end of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Stored answer of the closest question.
    Answer(String),
    /// Banned tokens found in the utterance; the turn was discarded.
    Banned(Vec<String>),
    /// No close question; the next utterance will be taken as the answer.
    TeachMe,
    Learned,
    Skipped,
    EmptyUtterance,
    EmptyAnswer,
    Goodbye,
}

impl Reply {
    pub fn ends_conversation(&self) -> bool {
        matches!(self, Reply::Goodbye)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Answer(answer) => f.write_str(answer),
            Reply::Banned(words) => write!(f, "You have been blocked for using banned words: {}", words.join(", ")),
            Reply::TeachMe => f.write_str("I don't know the answer. Can you teach me? Type the answer, or 'skip'."),
            Reply::Learned => f.write_str("Thank you! I learned something new!"),
            Reply::Skipped => f.write_str("Okay, I won't learn that one."),
            Reply::EmptyUtterance => f.write_str("Please type a question."),
            Reply::EmptyAnswer => f.write_str("Please type the answer, or 'skip' to cancel."),
            Reply::Goodbye => f.write_str("Goodbye!"),
        }
    }
}

/// Result of one turn as seen by a front door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnResponse {
    /// Text to show the user.
    pub answer: String,
    /// State the conversation is in after this turn.
    pub state: SessionPhase,
    /// True once the user said `quit`.
    pub ended: bool,
    /// Technical keywords found in the utterance.
    pub topics: Vec<String>,
}
