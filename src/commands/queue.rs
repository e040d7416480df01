use poise::CreateReply;

use crate::commands::guild_id;
use crate::music::queue as music_queue;
use crate::utils::embed;
use crate::{Context, Error};

/// Show music queue
#[poise::command(slash_command, guild_only)]
pub async fn queue(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;

    let (current, tracks) = music_queue::get_queue_list(&ctx.data().registry, guild_id).await;
    let e = embed::queue_list(ctx.data().identity, current.as_ref(), &tracks);

    ctx.send(CreateReply::default().embed(e)).await?;
    Ok(())
}
