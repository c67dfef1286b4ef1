pub const DEFAULT_DATABASE_URL: &str = "sqlite://match_duel.db?mode=rwc";
pub const DEFAULT_LOG_LEVEL: &str = "info";

type EnvError = Box<dyn std::error::Error + Send + Sync>;
type EnvResult<T> = Result<T, EnvError>;

/// Gets the Discord bot token from environment
pub fn discord_token() -> EnvResult<String> {
    dotenvy::var("DISCORD_TOKEN").map_err(|e| Box::new(e) as EnvError)
}

/// Gets the database URL from environment
pub fn database_url() -> EnvResult<Option<String>> {
    optional("DATABASE_URL")
}

/// Log filter used when `RUST_LOG` is not set
pub fn log_level() -> EnvResult<String> {
    Ok(optional("MATCH_DUEL_LOG")?.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()))
}

fn optional(key: &str) -> EnvResult<Option<String>> {
    match dotenvy::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(None),
        Err(e) => Err(Box::new(e) as EnvError),
    }
}
