use crate::{
    Context, Error,
    constants::{colors, icon},
    database::SqliteStorage,
    functions::{
        format::{discord, format_seconds, pretty_message},
        prompt::{ConfirmationOutcome, ConfirmationPromptOptions, confirmation_prompt},
        ui::component::{ComponentReply, respond_to_component},
    },
};
use poise::serenity_prelude as serenity;
use serenity::builder::EditMessage;
use serenity::collector::ComponentInteractionCollector;
use serenity::{CreateActionRow, CreateButton};
use std::future::IntoFuture;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

mod board;
mod card;
mod engine;
mod error;
mod scoreboard;
mod session;
mod timer;

pub use engine::{FlipOutcome, IgnoredAction, MISMATCH_DELAY, MatchEngine, Phase, PendingHide};
pub use error::MemoryError;
pub use scoreboard::{LEADERBOARD_SIZE, RecordOutcome, ScoreStore};
pub use session::{ActiveGames, GameSlot};

const BOARD_COLUMNS: usize = 4;
const GAME_TIMEOUT: Duration = Duration::from_secs(300);
const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(45);
const HIDDEN_LABEL: &str = "❔";
const RESTART_ID: &str = "restart";

/// Memory Match Duel: encontre os 8 pares no menor tempo.
#[poise::command(
    slash_command,
    prefix_command,
    category = "Jogos",
    rename = "memoria",
    subcommands("play", "scoreboard", "reset")
)]
pub async fn memory(_: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Começa uma partida contra o relógio.
#[poise::command(slash_command, prefix_command, category = "Jogos", rename = "jogar")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "Nome que aparecerá no placar"] nome: String,
) -> Result<(), Error> {
    let Some(slot) = ctx.data().active_games.try_claim(ctx.author().id) else {
        send_notice(
            &ctx,
            pretty_message(
                icon::ERROR,
                "Você já tem um jogo em andamento. Termine ou espere ele expirar.",
            ),
        )
        .await?;
        return Ok(());
    };

    let best_time = load_scores(&ctx).await?.best_time();
    let mut engine = MatchEngine::new();
    let started = engine.start_game(&nome, &mut rand::rng());
    match started {
        Ok(()) => {}
        Err(MemoryError::InvalidInput) => {
            send_notice(
                &ctx,
                pretty_message(icon::ERROR, "Digite seu nome para começar o jogo!"),
            )
            .await?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    tracing::info!(
        user_id = %ctx.author().id,
        player = engine.player_name().unwrap_or_default(),
        "memory game started"
    );

    run_game(ctx, engine, best_time, slot).await
}

/// Mostra o melhor tempo e as 5 partidas mais rápidas.
#[poise::command(slash_command, prefix_command, category = "Jogos", rename = "placar")]
pub async fn scoreboard(ctx: Context<'_>) -> Result<(), Error> {
    let scores = load_scores(&ctx).await?;

    let mut lines = vec![pretty_message(
        icon::ALARM,
        format!("Melhor tempo: {}", format_seconds(scores.best_time())),
    )];
    lines.push(String::new());

    if scores.leaderboard().is_empty() {
        lines.push("Nenhuma pontuação ainda.".to_string());
    } else {
        lines.extend(scores.leaderboard().iter().enumerate().map(|(index, score)| {
            format!(
                "**{}.** {}: {}",
                index + 1,
                discord::escape(&score.name),
                format_seconds(Some(score.time))
            )
        }));
    }

    ctx.send(
        poise::CreateReply::default().embed(
            serenity::CreateEmbed::new()
                .title(format!("🏆 Placar • Top {LEADERBOARD_SIZE}"))
                .colour(colors::MOON)
                .description(lines.join("\n")),
        ),
    )
    .await?;
    Ok(())
}

/// Apaga o seu placar. O melhor tempo é mantido.
#[poise::command(slash_command, prefix_command, category = "Jogos", rename = "resetar")]
pub async fn reset(ctx: Context<'_>) -> Result<(), Error> {
    let mut options = ConfirmationPromptOptions::new(pretty_message(
        icon::BELL,
        "Tem certeza que deseja resetar o placar? Essa ação não pode ser desfeita.",
    ));
    options.timeout = CONFIRMATION_TIMEOUT;

    let confirmation = confirmation_prompt(&ctx, ctx.author().id, options).await?;
    let confirmed = matches!(confirmation.outcome, ConfirmationOutcome::Accepted);

    let mut scores = load_scores(&ctx).await?;
    match scores.reset(confirmed).await {
        Ok(()) => {
            tracing::info!(user_id = %ctx.author().id, "scoreboard reset");
            ctx.send(
                poise::CreateReply::default()
                    .content(pretty_message(icon::CHECK, "O placar foi resetado!")),
            )
            .await?;
            Ok(())
        }
        Err(MemoryError::DestructiveActionCancelled) => {
            send_notice(&ctx, pretty_message(icon::HASTAG, "Nada foi alterado.")).await
        }
        Err(err) => Err(err.into()),
    }
}

enum GameEvent {
    Click(serenity::ComponentInteraction),
    HideMismatch(PendingHide),
    Inactive,
}

enum BoardAction {
    Flip(usize),
    Restart,
}

/// What the board message shows besides the cards themselves.
struct GameView {
    custom_id_prefix: String,
    status: String,
    best_time: Option<u64>,
}

async fn run_game(
    ctx: Context<'_>,
    mut engine: MatchEngine,
    best_time: Option<u64>,
    mut slot: GameSlot,
) -> Result<(), Error> {
    let mut view = GameView {
        custom_id_prefix: format!("match_{}_", rand::random::<u64>()),
        status: pretty_message(icon::BELL, "Abra dois botões e encontre os pares!"),
        best_time,
    };

    let (embed, components) = render_game(&engine, &view, true);
    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(embed)
                .components(components),
        )
        .await?;
    let message = reply.message().await?;
    let (channel_id, message_id) = (message.channel_id, message.id);

    let mut pending: Option<(PendingHide, Instant)> = None;

    loop {
        match next_event(&ctx, message_id, pending).await {
            GameEvent::Inactive => break,
            GameEvent::HideMismatch(ticket) => {
                pending = None;
                if engine.hide_mismatch(ticket) {
                    view.status = pretty_message(icon::BELL, "Tente de novo!");
                    let (embed, components) = render_game(&engine, &view, true);
                    channel_id
                        .edit_message(
                            ctx.serenity_context(),
                            message_id,
                            EditMessage::new().embed(embed).components(components),
                        )
                        .await?;
                }
            }
            GameEvent::Click(interaction) => {
                let Some(action) =
                    parse_action(&interaction.data.custom_id, &view.custom_id_prefix)
                else {
                    let notice = ComponentReply::Notice(foreign_button_notice());
                    respond_to_component(&ctx, &interaction, notice).await?;
                    continue;
                };

                match action {
                    BoardAction::Restart => {
                        if !slot.reclaim() {
                            let notice = ComponentReply::Notice(pretty_message(
                                icon::ERROR,
                                "Você já tem outro jogo em andamento.",
                            ));
                            respond_to_component(&ctx, &interaction, notice).await?;
                            continue;
                        }
                        engine.restart(&mut rand::rng())?;
                        pending = None;
                        view.best_time = load_scores(&ctx).await?.best_time();
                        view.status = pretty_message(icon::BELL, "Novo jogo! Encontre os pares.");
                        tracing::debug!(user_id = %ctx.author().id, "memory game restarted");
                    }
                    BoardAction::Flip(index) => match engine.flip(index) {
                        FlipOutcome::Ignored(reason) => {
                            let notice = ComponentReply::Notice(ignored_notice(reason));
                            respond_to_component(&ctx, &interaction, notice).await?;
                            continue;
                        }
                        FlipOutcome::FirstReveal => {}
                        FlipOutcome::Matched => {
                            view.status = pretty_message(icon::CHECK, "Você encontrou um par!");
                        }
                        FlipOutcome::Mismatch(ticket) => {
                            pending = Some((ticket, Instant::now() + MISMATCH_DELAY));
                            view.status = pretty_message(icon::ERROR, "Não foi dessa vez.");
                        }
                        FlipOutcome::Completed(completion) => {
                            slot.release();
                            let (scores, outcome) = ScoreStore::record(
                                player_storage(&ctx),
                                &completion.player_name,
                                completion.elapsed_seconds,
                            )
                            .await?;
                            view.best_time = scores.best_time();
                            tracing::info!(
                                user_id = %ctx.author().id,
                                player = %completion.player_name,
                                elapsed_seconds = completion.elapsed_seconds,
                                new_best = outcome.new_best,
                                rank = ?outcome.rank,
                                "memory game completed"
                            );
                            view.status = completion_message(
                                &completion.player_name,
                                completion.elapsed_seconds,
                                outcome,
                            );
                        }
                    },
                }

                let (embed, components) = render_game(&engine, &view, true);
                let redraw = ComponentReply::Redraw { embed, components };
                respond_to_component(&ctx, &interaction, redraw).await?;
            }
        }
    }

    if engine.phase() != Phase::Complete {
        tracing::info!(
            user_id = %ctx.author().id,
            elapsed_seconds = engine.elapsed_seconds(),
            "memory game abandoned"
        );
        view.status = pretty_message(icon::ERROR, "Jogo encerrado por inatividade.");
    }

    let (embed, _) = render_game(&engine, &view, false);
    engine.dispose();
    channel_id
        .edit_message(
            ctx.serenity_context(),
            message_id,
            EditMessage::new().embed(embed).components(Vec::new()),
        )
        .await?;

    Ok(())
}

/// Waits for the next click, or for the pending mismatch to be due.
async fn next_event(
    ctx: &Context<'_>,
    message_id: serenity::MessageId,
    pending: Option<(PendingHide, Instant)>,
) -> GameEvent {
    let clicked = ComponentInteractionCollector::new(ctx.serenity_context())
        .message_id(message_id)
        .author_id(ctx.author().id)
        .timeout(GAME_TIMEOUT)
        .into_future();

    match pending {
        None => clicked.await.map_or(GameEvent::Inactive, GameEvent::Click),
        Some((ticket, due)) => tokio::select! {
            interaction = clicked => interaction.map_or(GameEvent::Inactive, GameEvent::Click),
            _ = sleep_until(due) => GameEvent::HideMismatch(ticket),
        },
    }
}

fn player_storage(ctx: &Context<'_>) -> SqliteStorage {
    SqliteStorage::new(ctx.data().database.clone(), ctx.author().id.to_string())
}

async fn load_scores(ctx: &Context<'_>) -> Result<ScoreStore<SqliteStorage>, Error> {
    Ok(ScoreStore::load(player_storage(ctx)).await?)
}

async fn send_notice(ctx: &Context<'_>, content: String) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

fn foreign_button_notice() -> String {
    pretty_message(icon::ERROR, "Esse botão não pertence a esta partida.")
}

fn ignored_notice(reason: IgnoredAction) -> String {
    match reason {
        IgnoredAction::Resolving => {
            pretty_message(icon::TIMER, "Espere um instante enquanto escondo as peças.")
        }
        IgnoredAction::AlreadyRevealed | IgnoredAction::OutOfRange => {
            pretty_message(icon::ERROR, "Esse botão já foi utilizado. Escolha outro.")
        }
        IgnoredAction::NotPlaying => pretty_message(
            icon::BELL,
            "Essa partida já terminou. Use Reiniciar para jogar de novo.",
        ),
    }
}

fn completion_message(player_name: &str, elapsed_seconds: u64, outcome: RecordOutcome) -> String {
    let mut lines = vec![pretty_message(
        icon::GIFT,
        format!(
            "Parabéns, {}! Você completou o jogo em **{}** segundos.",
            discord::escape(player_name),
            elapsed_seconds
        ),
    )];

    if outcome.new_best {
        lines.push(pretty_message(icon::ALARM, "Novo recorde! 🎉"));
    }
    if let Some(rank) = outcome.rank {
        lines.push(pretty_message(
            icon::HASTAG,
            format!("Você ficou em **#{rank}** no placar."),
        ));
    }

    lines.join("\n")
}

fn render_game(
    engine: &MatchEngine,
    view: &GameView,
    interactive: bool,
) -> (serenity::CreateEmbed, Vec<CreateActionRow>) {
    let components = if interactive {
        build_components(engine, view)
    } else {
        Vec::new()
    };
    (build_embed(engine, view), components)
}

fn build_embed(engine: &MatchEngine, view: &GameView) -> serenity::CreateEmbed {
    let lines = [
        pretty_message(
            icon::CHECK,
            format!(
                "**{}/{}** pares encontrados",
                engine.matched_pairs(),
                engine.total_pairs()
            ),
        ),
        pretty_message(
            icon::TIMER,
            format!("Tempo: {}", format_seconds(Some(engine.elapsed_seconds()))),
        ),
        pretty_message(
            icon::ALARM,
            format!("Melhor tempo: {}", format_seconds(view.best_time)),
        ),
        String::new(),
        view.status.clone(),
    ];

    let player = engine.player_name().unwrap_or_default();
    serenity::CreateEmbed::new()
        .title(format!("🧠 Memory Match Duel • {}", discord::escape(player)))
        .colour(colors::MOON)
        .description(lines.join("\n"))
}

fn build_components(engine: &MatchEngine, view: &GameView) -> Vec<CreateActionRow> {
    let mismatch = match engine.phase() {
        Phase::Resolving { pair } => Some(pair),
        _ => None,
    };

    let cards = engine.board().cards();
    let mut rows: Vec<CreateActionRow> = cards
        .chunks(BOARD_COLUMNS)
        .enumerate()
        .map(|(row, chunk)| {
            let buttons = chunk
                .iter()
                .enumerate()
                .map(|(column, card)| {
                    let index = row * BOARD_COLUMNS + column;
                    let button =
                        CreateButton::new(format!("{}{}", view.custom_id_prefix, index));
                    let in_mismatch = mismatch.is_some_and(|pair| pair.contains(&index));

                    if card.matched {
                        button
                            .label(card.symbol.emoji())
                            .style(serenity::ButtonStyle::Success)
                            .disabled(true)
                    } else if in_mismatch {
                        button
                            .label(card.symbol.emoji())
                            .style(serenity::ButtonStyle::Danger)
                            .disabled(true)
                    } else if card.face_up {
                        button
                            .label(card.symbol.emoji())
                            .style(serenity::ButtonStyle::Secondary)
                            .disabled(true)
                    } else {
                        button
                            .label(HIDDEN_LABEL)
                            .style(serenity::ButtonStyle::Primary)
                    }
                })
                .collect();
            CreateActionRow::Buttons(buttons)
        })
        .collect();

    let restart = CreateButton::new(format!("{}{}", view.custom_id_prefix, RESTART_ID))
        .label("Reiniciar")
        .style(serenity::ButtonStyle::Secondary)
        .emoji(icon::GEAR.as_reaction());
    rows.push(CreateActionRow::Buttons(vec![restart]));

    rows
}

fn parse_action(custom_id: &str, prefix: &str) -> Option<BoardAction> {
    let suffix = custom_id.strip_prefix(prefix)?;
    if suffix == RESTART_ID {
        return Some(BoardAction::Restart);
    }
    suffix.parse().ok().map(BoardAction::Flip)
}
