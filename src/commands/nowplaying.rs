use poise::CreateReply;

use crate::commands::{guild_id, reply_error};
use crate::music::{format_duration, queue, PlayerStatus};
use crate::utils::embed;
use crate::{Context, Error};

/// Show currently playing song
#[poise::command(slash_command, guild_only)]
pub async fn nowplaying(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;
    let registry = &ctx.data().registry;

    let Some(track) = queue::get_current(registry, guild_id).await else {
        reply_error(ctx, "Nothing is playing right now!").await?;
        return Ok(());
    };

    let status = queue::get_status(registry, guild_id).await;
    let volume = queue::get_volume(registry, guild_id).await;
    let position = match queue::get_track_handle(registry, guild_id).await {
        Some(handle) => handle.get_info().await.ok().map(|info| info.position),
        None => None,
    };

    let mut e = embed::now_playing(ctx.data().identity, &track);
    if status == PlayerStatus::Paused {
        e = e.title("⏸️ Paused");
    }
    if let Some(position) = position {
        e = e.field(
            "Position",
            format!("{} / {}", format_duration(position.as_secs()), track.duration()),
            true,
        );
    }
    e = e.field("Volume", format!("{}%", (volume * 100.0).round() as u32), true);

    ctx.send(CreateReply::default().embed(e)).await?;
    Ok(())
}
