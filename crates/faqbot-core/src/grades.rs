//! Five-score average calculator with a pass/fail verdict.

use std::fmt;

/// Exactly this many scores are required.
pub const SCORE_COUNT: usize = 5;
/// Highest valid individual score.
pub const MAX_SCORE: u32 = 20;
/// Averages at or above this pass.
pub const PASSING_AVERAGE: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    NotApproved,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Approved => write!(f, "approved"),
            Verdict::NotApproved => write!(f, "not approved"),
        }
    }
}

/// Outcome of a valid set of scores.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeReport {
    pub scores: [u32; SCORE_COUNT],
    pub average: f64,
    pub verdict: Verdict,
}

impl GradeReport {
    pub fn approved(&self) -> bool {
        self.verdict == Verdict::Approved
    }
}

impl fmt::Display for GradeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "The average score is {:.2}. ", self.average)?;
        match self.verdict {
            Verdict::Approved => write!(f, "Congratulations, you passed!"),
            Verdict::NotApproved => write!(f, "Sorry, you did not pass."),
        }
    }
}

/// Why a set of scores was rejected. Nothing is computed for a rejected turn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradeError {
    #[error("Please enter valid scores: '{token}' is not a whole number.")]
    NotNumeric { token: String },
    #[error("Please enter exactly {expected} scores separated by spaces (got {found}).", expected = SCORE_COUNT)]
    WrongCount { found: usize },
    #[error("Please enter valid scores: each score must be at most {max} ('{token}' is too high).", max = MAX_SCORE)]
    OutOfRange { token: String },
}

/// Parses five whitespace-separated scores (0..=20) and averages them.
pub fn evaluate_grades(input: &str) -> Result<GradeReport, GradeError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();

    if let Some(token) = tokens.iter().find(|t| !t.chars().all(|c| c.is_ascii_digit())) {
        return Err(GradeError::NotNumeric {
            token: token.to_string(),
        });
    }
    if tokens.len() != SCORE_COUNT {
        return Err(GradeError::WrongCount { found: tokens.len() });
    }

    let mut scores = [0u32; SCORE_COUNT];
    for (slot, token) in scores.iter_mut().zip(&tokens) {
        // Digits-only tokens that overflow are out of range too.
        *slot = token
            .parse::<u32>()
            .ok()
            .filter(|score| *score <= MAX_SCORE)
            .ok_or_else(|| GradeError::OutOfRange {
                token: token.to_string(),
            })?;
    }

    let average = scores.iter().map(|s| f64::from(*s)).sum::<f64>() / SCORE_COUNT as f64;
    let verdict = if average >= PASSING_AVERAGE {
        Verdict::Approved
    } else {
        Verdict::NotApproved
    };
    Ok(GradeReport {
        scores,
        average,
        verdict,
    })
}
