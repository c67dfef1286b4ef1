use super::error::MemoryError;
use crate::database::KeyValueStore;
use serde::{Deserialize, Serialize};

pub const LEADERBOARD_SIZE: usize = 5;

const BEST_TIME_KEY: &str = "bestTime";
const SCORES_KEY: &str = "scores";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub name: String,
    pub time: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RecordOutcome {
    pub new_best: bool,
    /// 1-based leaderboard position, if the score made the cut.
    pub rank: Option<usize>,
}

/// Best time and top-5 leaderboard of a single player, persisted through `S`.
pub struct ScoreStore<S> {
    storage: S,
    best_time: Option<u64>,
    leaderboard: Vec<Score>,
}

impl<S: KeyValueStore> ScoreStore<S> {
    /// Restores persisted values. Missing or unreadable entries count as empty.
    pub async fn load(storage: S) -> Result<Self, MemoryError> {
        let best_time = storage
            .get(BEST_TIME_KEY)
            .await?
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(%raw, %err, "discarding unreadable best time");
                    None
                }
            });

        let mut leaderboard = storage
            .get(SCORES_KEY)
            .await?
            .and_then(|raw| match serde_json::from_str::<Vec<Score>>(&raw) {
                Ok(scores) => Some(scores),
                Err(err) => {
                    tracing::warn!(%err, "discarding unreadable scoreboard");
                    None
                }
            })
            .unwrap_or_default();
        leaderboard.sort_by_key(|score| score.time);
        leaderboard.truncate(LEADERBOARD_SIZE);

        Ok(Self {
            storage,
            best_time,
            leaderboard,
        })
    }

    /// Loads the latest persisted state and records a completion on top of it.
    ///
    /// Use this when the store may have changed since an earlier load, e.g. a
    /// reset issued while a game was in progress.
    pub async fn record(
        storage: S,
        player_name: &str,
        elapsed_seconds: u64,
    ) -> Result<(Self, RecordOutcome), MemoryError> {
        let mut store = Self::load(storage).await?;
        let outcome = store.record_completion(player_name, elapsed_seconds).await?;
        Ok((store, outcome))
    }

    /// Persists both keys in one write; the in-memory state only changes once
    /// that write succeeded.
    pub async fn record_completion(
        &mut self,
        player_name: &str,
        elapsed_seconds: u64,
    ) -> Result<RecordOutcome, MemoryError> {
        let new_best = self.best_time.is_none_or(|best| elapsed_seconds < best);
        let best_time = if new_best {
            Some(elapsed_seconds)
        } else {
            self.best_time
        };

        // Stable: equal times keep insertion order, so the new score lands last among them.
        let inserted = self.leaderboard.len();
        let mut ranked: Vec<(usize, Score)> = self
            .leaderboard
            .iter()
            .cloned()
            .chain(std::iter::once(Score {
                name: player_name.to_owned(),
                time: elapsed_seconds,
            }))
            .enumerate()
            .collect();
        ranked.sort_by_key(|(_, score)| score.time);
        ranked.truncate(LEADERBOARD_SIZE);

        let rank = ranked
            .iter()
            .position(|(position, _)| *position == inserted)
            .map(|position| position + 1);
        let leaderboard: Vec<Score> = ranked.into_iter().map(|(_, score)| score).collect();

        let mut entries = vec![(SCORES_KEY, serde_json::to_string(&leaderboard)?)];
        if new_best {
            entries.push((BEST_TIME_KEY, elapsed_seconds.to_string()));
        }
        self.storage.set_all(&entries).await?;

        self.best_time = best_time;
        self.leaderboard = leaderboard;
        Ok(RecordOutcome { new_best, rank })
    }

    /// Clears the leaderboard. The best time is kept.
    pub async fn reset(&mut self, confirmed: bool) -> Result<(), MemoryError> {
        if !confirmed {
            return Err(MemoryError::DestructiveActionCancelled);
        }

        self.storage.remove(SCORES_KEY).await?;
        self.leaderboard.clear();
        Ok(())
    }

    pub fn best_time(&self) -> Option<u64> {
        self.best_time
    }

    pub fn leaderboard(&self) -> &[Score] {
        &self.leaderboard
    }
}
