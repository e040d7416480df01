use poise::CreateReply;

use crate::commands::{guild_id, require_voice};
use crate::utils::embed;
use crate::{Context, Error};

/// Stop music and clear queue
#[poise::command(slash_command, guild_only)]
pub async fn stop(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;
    if require_voice(ctx).await?.is_none() {
        return Ok(());
    }

    let stopped = ctx.data().audio(guild_id).stop().await;

    let description = if stopped.had_track || stopped.cleared > 0 {
        format!(
            "Playback stopped and {} queued track(s) cleared.",
            stopped.cleared
        )
    } else {
        "Nothing was playing; the queue is empty.".to_string()
    };
    let e = embed::base(ctx.data().identity, "⏹️ Stopped", embed::RED).description(description);
    ctx.send(CreateReply::default().embed(e)).await?;

    Ok(())
}
