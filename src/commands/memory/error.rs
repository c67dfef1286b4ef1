use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("a player name is required to start the game")]
    InvalidInput,

    #[error("scoreboard reset was not confirmed")]
    DestructiveActionCancelled,

    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("could not serialize scoreboard: {0}")]
    Serialization(#[from] serde_json::Error),
}
