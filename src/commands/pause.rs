use poise::CreateReply;

use crate::commands::{guild_id, reply_error, require_voice};
use crate::music::{queue, PlayerError};
use crate::utils::embed;
use crate::{Context, Error};

/// Pause current song
#[poise::command(slash_command, guild_only)]
pub async fn pause(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;
    if require_voice(ctx).await?.is_none() {
        return Ok(());
    }

    let identity = ctx.data().identity;
    match queue::pause(&ctx.data().registry, guild_id).await {
        Ok(track) => {
            let e = embed::base(identity, "⏸️ Paused", embed::ORANGE).description(format!(
                "**{}**\nUse `/resume` to continue playback",
                track.title
            ));
            ctx.send(CreateReply::default().embed(e)).await?;
        }
        Err(PlayerError::Engine(e)) => reply_error(ctx, &format!("Could not pause: {e}")).await?,
        Err(_) => reply_error(ctx, "Nothing is playing right now!").await?,
    }

    Ok(())
}

/// Resume paused song
#[poise::command(slash_command, guild_only)]
pub async fn resume(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;
    if require_voice(ctx).await?.is_none() {
        return Ok(());
    }

    let identity = ctx.data().identity;
    match queue::resume(&ctx.data().registry, guild_id).await {
        Ok(track) => {
            let e = embed::base(identity, "▶️ Resumed", embed::GREEN)
                .description(format!("**{}** is playing again", track.title));
            ctx.send(CreateReply::default().embed(e)).await?;
        }
        Err(PlayerError::Engine(e)) => reply_error(ctx, &format!("Could not resume: {e}")).await?,
        Err(_) => reply_error(ctx, "Nothing is paused!").await?,
    }

    Ok(())
}
