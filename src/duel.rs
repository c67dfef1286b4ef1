use crate::commands::{self, memory::ActiveGames, util::command_error_handler};
use poise::serenity_prelude as serenity;
use sqlx::SqlitePool;

pub struct Data {
    pub database: SqlitePool,
    pub active_games: ActiveGames,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Builds the Poise framework with all commands and the provided prefix options
pub fn build_framework(
    prefix_options: poise::PrefixFrameworkOptions<Data, Error>,
    database: SqlitePool,
) -> poise::Framework<Data, Error> {
    poise::Framework::builder()
        .options(framework_options(prefix_options))
        .setup(move |ctx, ready, framework| {
            let database = database.clone();
            Box::pin(async move { setup_framework(ctx, ready, framework, database).await })
        })
        .build()
}

pub async fn run_client(
    token: String,
    intents: serenity::GatewayIntents,
    framework: poise::Framework<Data, Error>,
) -> Result<(), Error> {
    let mut client = serenity::Client::builder(token, intents)
        .framework(framework)
        .await?;

    client.start_autosharded().await?;

    Ok(())
}

fn framework_options(
    prefix_options: poise::PrefixFrameworkOptions<Data, Error>,
) -> poise::FrameworkOptions<Data, Error> {
    poise::FrameworkOptions {
        commands: commands::load_all(),
        prefix_options,
        on_error: |error| Box::pin(command_error_handler(error)),
        ..Default::default()
    }
}

async fn setup_framework(
    ctx: &serenity::Context,
    ready: &serenity::Ready,
    framework: &poise::Framework<Data, Error>,
    database: SqlitePool,
) -> Result<Data, Error> {
    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
    tracing::info!(user = %ready.user.display_name(), "connected and ready");

    Ok(Data {
        database,
        active_games: ActiveGames::default(),
    })
}
