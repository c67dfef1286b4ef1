use crate::{Context, Error};
use poise::serenity_prelude as serenity;
use serenity::CreateActionRow;
use serenity::builder::CreateInteractionResponseMessage;

/// How to answer a button click.
pub enum ComponentReply {
    /// Ephemeral note only the clicking user sees; the board message is untouched.
    Notice(String),
    /// Redraws the message the button belongs to.
    Redraw {
        embed: serenity::CreateEmbed,
        components: Vec<CreateActionRow>,
    },
}

pub async fn respond_to_component(
    ctx: &Context<'_>,
    interaction: &serenity::ComponentInteraction,
    reply: ComponentReply,
) -> Result<(), Error> {
    let response = match reply {
        ComponentReply::Notice(content) => serenity::CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(content)
                .ephemeral(true),
        ),
        ComponentReply::Redraw { embed, components } => {
            serenity::CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .components(components),
            )
        }
    };

    interaction
        .create_response(ctx.serenity_context(), response)
        .await?;
    Ok(())
}
