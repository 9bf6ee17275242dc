use crate::Context;
use lantern_backend::discord::status_embed;
use lantern_backend::helpers;
use poise::CreateReply;
use poise::command;
use poise::serenity_prelude::CreateEmbed;

pub(crate) type Error = Box<dyn std::error::Error + Send + Sync>;

/// Show the current server status and today's activity
#[command(slash_command)]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let view = data.board.latest();
    ctx.send(
        CreateReply::default()
            .embed(status_embed(&view, data.zone, data.refresh))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Show when a player was online today
#[command(slash_command)]
pub async fn player(
    ctx: Context<'_>,
    #[description = "Minecraft player name"] name: String,
) -> Result<(), Error> {
    let data = ctx.data();
    let view = data.board.latest();
    let embed = CreateEmbed::default()
        .title(format!("📊 {}", name))
        .color(view.color.rgb());

    let embed = match view.activity_for(&name) {
        Some(activity) => {
            let state = if activity.is_online() {
                "🟩 online now"
            } else {
                "⬜ offline"
            };
            embed
                .description(helpers::activity_line(activity))
                .field("Status", state, true)
                .field("Total today", activity.total_label(), true)
        }
        None => embed.description(format!("{} has not been online today.", name)),
    };

    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}
