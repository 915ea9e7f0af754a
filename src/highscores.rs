//! Session leaderboard
//!
//! Keeps the top 10 finished rounds per mode. Storage is the host's job; the
//! board only round-trips through JSON.

use serde::{Deserialize, Serialize};

use crate::sim::{GameMode, RoundSummary};

/// Maximum number of high scores kept per mode
pub const MAX_HIGH_SCORES: usize = 10;

/// Consumer of terminal round results (leaderboards, backends, analytics)
pub trait SummarySink {
    fn record(&mut self, summary: &RoundSummary, timestamp: f64);
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    pub best_streak: u32,
    pub mode: GameMode,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted descending by score within each mode
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Entries for one mode, best first
    pub fn top_for_mode(&self, mode: GameMode) -> impl Iterator<Item = &HighScoreEntry> {
        self.entries.iter().filter(move |e| e.mode == mode)
    }

    /// Check if a score qualifies for a mode's board
    pub fn qualifies(&self, mode: GameMode, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        let count = self.top_for_mode(mode).count();
        if count < MAX_HIGH_SCORES {
            return true;
        }
        // Must beat the lowest entry
        self.top_for_mode(mode).last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, mode: GameMode, score: u64) -> Option<usize> {
        if !self.qualifies(mode, score) {
            return None;
        }
        Some(self.top_for_mode(mode).filter(|e| e.score >= score).count() + 1)
    }

    /// Add a finished round. Returns the rank achieved or None if it didn't qualify.
    pub fn add_score(&mut self, summary: &RoundSummary, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(summary.mode, summary.score)?;

        let entry = HighScoreEntry {
            score: summary.score,
            best_streak: summary.best_streak,
            mode: summary.mode,
            timestamp,
        };
        // Sorted by score, ties keep the earlier entry first
        let pos = self
            .entries
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);

        let mut kept = 0;
        let mode = summary.mode;
        self.entries.retain(|e| {
            if e.mode != mode {
                return true;
            }
            kept += 1;
            kept <= MAX_HIGH_SCORES
        });

        log::info!("High score #{} in {} mode: {}", rank, mode.as_str(), summary.score);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self, mode: GameMode) -> Option<u64> {
        self.top_for_mode(mode).next().map(|e| e.score)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores
            .entries
            .sort_by(|a, b| b.score.cmp(&a.score));
        Ok(scores)
    }
}

impl SummarySink for HighScores {
    fn record(&mut self, summary: &RoundSummary, timestamp: f64) {
        if self.add_score(summary, timestamp).is_none() {
            log::debug!("Score {} did not make the board", summary.score);
        }
    }
}
