use poise::CreateReply;
use tracing::warn;

use crate::commands::{guild_id, reply_error, rooms};
use crate::music::BoundChannel;
use crate::utils::{channels, embed};
use crate::{Context, Error};

/// Join a voice channel
#[poise::command(slash_command, guild_only)]
pub async fn joinroom(
    ctx: Context<'_>,
    #[description = "Voice channel name"] channel_name: String,
) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;
    let identity = ctx.data().identity;
    let rooms = rooms(ctx)?;

    let Some(room) = channels::find_room(&rooms, &channel_name) else {
        let e = embed::base(identity, "❌ Voice channel not found", embed::RED).description(
            format!("Available channels: {}", channels::room_names(&rooms, 5)),
        );
        ctx.send(CreateReply::default().embed(e).ephemeral(true))
            .await?;
        return Ok(());
    };

    if let Err(e) = ctx.data().audio(guild_id).connect(BoundChannel::from(room)).await {
        warn!(identity, guild = %guild_id, "joinroom: {e}");
        reply_error(ctx, "I could not join that voice channel.").await?;
        return Ok(());
    }

    let e = embed::base(identity, "🎵 Joined voice channel", embed::GREEN)
        .description(format!("Connected to **{}**", room.name))
        .field("Members", room.members.to_string(), true)
        .field("Bot", format!("#{identity}"), true)
        .field("24/7 mode", "✅ Staying connected", true)
        .footer(serenity::builder::CreateEmbedFooter::new(
            "I will stay here until you use /leave!",
        ));
    ctx.send(CreateReply::default().embed(e)).await?;
    Ok(())
}

/// Leave current voice channel
#[poise::command(slash_command, guild_only)]
pub async fn leave(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;

    match ctx.data().audio(guild_id).leave().await {
        Ok(departed) => {
            let e = embed::base(ctx.data().identity, "👋 Disconnected", embed::ORANGE).description(
                format!(
                    "Left **{}**\n\nUse `/joinroom` to connect again",
                    departed.channel.name
                ),
            );
            ctx.send(CreateReply::default().embed(e)).await?;
        }
        Err(_) => reply_error(ctx, "I am not connected to any voice channel!").await?,
    }
    Ok(())
}

/// List all voice channels
#[poise::command(slash_command, guild_only)]
pub async fn listrooms(ctx: Context<'_>) -> Result<(), Error> {
    let rooms = rooms(ctx)?;

    if rooms.is_empty() {
        reply_error(ctx, "This server has no voice channels!").await?;
        return Ok(());
    }

    let mut e = embed::base(ctx.data().identity, "🎙️ Voice channels", embed::BLUE)
        .description("Voice channels on this server:")
        .footer(serenity::builder::CreateEmbedFooter::new(format!(
            "Bot #{} • use /joinroom <name> to join",
            ctx.data().identity
        )));
    for room in rooms.iter().take(10) {
        e = e.field(&room.name, format!("👥 {} members", room.members), true);
    }

    ctx.send(CreateReply::default().embed(e)).await?;
    Ok(())
}
