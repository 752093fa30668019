//! Fuzzy question matching.
//!
//! Scores are Ratcliff/Obershelp ratios over characters: find the longest common
//! contiguous block, recurse on the pieces left and right of it, and score
//! `2 * matched / (len(a) + len(b))`. The best-scoring candidate wins if it reaches
//! the cutoff; ties keep the earliest candidate.

use std::collections::HashMap;

/// Minimum similarity a stored question needs to be returned as a match.
pub const DEFAULT_CUTOFF: f64 = 0.6;

/// Picks the single closest stored question for an utterance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matcher {
    cutoff: f64,
}

impl Matcher {
    /// `cutoff` is clamped to `[0.0, 1.0]`.
    pub fn new(cutoff: f64) -> Self {
        Self {
            cutoff: cutoff.clamp(0.0, 1.0),
        }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Returns the candidate most similar to `utterance`, or `None` when even the best
    /// one scores below the cutoff.
    pub fn best_match<'a, I>(&self, utterance: &str, candidates: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let target = Target::new(utterance);
        let mut best: Option<(&'a str, f64)> = None;

        for candidate in candidates {
            let chars: Vec<char> = candidate.chars().collect();
            // quick_ratio is an upper bound of ratio.
            let bound = target.quick_ratio(&chars);
            if bound < self.cutoff || best.is_some_and(|(_, score)| bound <= score) {
                continue;
            }
            let score = target.ratio(&chars);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }

        best.filter(|(_, score)| *score >= self.cutoff)
            .map(|(candidate, _)| candidate)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF)
    }
}

/// [`Matcher::best_match`] with the default cutoff.
pub fn find_best_match<'a, I>(utterance: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    Matcher::default().best_match(utterance, candidates)
}

/// Similarity of `candidate` to `utterance` in `[0.0, 1.0]`.
pub fn similarity_ratio(candidate: &str, utterance: &str) -> f64 {
    let chars: Vec<char> = candidate.chars().collect();
    Target::new(utterance).ratio(&chars)
}

/// The utterance side of a comparison, indexed once and reused for every candidate.
struct Target {
    chars: Vec<char>,
    /// Positions of each character, ascending.
    positions: HashMap<char, Vec<usize>>,
}

impl Target {
    fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in chars.iter().enumerate() {
            positions.entry(*c).or_default().push(j);
        }
        Self { chars, positions }
    }

    fn ratio(&self, a: &[char]) -> f64 {
        score(self.matched_chars(a), a.len() + self.chars.len())
    }

    /// Multiset intersection size, an upper bound of the matched character count.
    fn quick_ratio(&self, a: &[char]) -> f64 {
        let mut available: HashMap<char, isize> = HashMap::new();
        let mut matches = 0;
        for c in a {
            let left = available
                .entry(*c)
                .or_insert_with(|| self.positions.get(c).map_or(0, |p| p.len() as isize));
            if *left > 0 {
                matches += 1;
            }
            *left -= 1;
        }
        score(matches, a.len() + self.chars.len())
    }

    /// Total size of the matching blocks between `a` and the target.
    fn matched_chars(&self, a: &[char]) -> usize {
        let mut total = 0;
        let mut pending = vec![(0, a.len(), 0, self.chars.len())];
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }

    /// Longest block `a[i..i+k] == target[j..j+k]` inside the given ranges. Among equally
    /// long blocks the one starting earliest in `a`, then earliest in the target, wins.
    fn longest_match(&self, a: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        // run_len[j] = length of the match ending at a[i - 1] and target[j]
        let mut run_len: HashMap<usize, usize> = HashMap::new();

        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next_run_len = HashMap::new();
            if let Some(positions) = self.positions.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run_len.insert(j, k);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            run_len = next_run_len;
        }

        (best_i, best_j, best_k)
    }
}

fn score(matches: usize, length: usize) -> f64 {
    if length == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / length as f64
}
