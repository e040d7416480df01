use poise::serenity_prelude as serenity;
use tracing::info;

use crate::music::queue;
use crate::{Data, Error};

pub async fn handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if is_new.unwrap_or(false) {
                info!(identity = data.identity, guild = %guild.id, "joined guild: {}", guild.name);
            }
        }
        // unavailable means an outage, not a removal
        serenity::FullEvent::GuildDelete { incomplete, .. } if !incomplete.unavailable => {
            guild_removed(data, incomplete.id).await;
        }
        _ => {}
    }
    Ok(())
}

/// Forgets everything this identity held for a guild it no longer belongs to.
pub async fn guild_removed(data: &Data, guild_id: serenity::GuildId) {
    info!(identity = data.identity, guild = %guild_id, "left guild, discarding player");
    if let Some(handle) = queue::discard(&data.registry, guild_id).await {
        let _ = handle.stop();
    }
    if data.songbird.get(guild_id).is_some() {
        let _ = data.songbird.remove(guild_id).await;
    }
}
