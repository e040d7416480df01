use poise::CreateReply;

use crate::commands::{guild_id, reply_error};
use crate::music::queue;
use crate::utils::embed;
use crate::{Context, Error};

/// Set volume (0-100)
#[poise::command(slash_command, guild_only)]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "Volume level (0-100)"]
    #[min = 0]
    #[max = 100]
    level: u32,
) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;

    if level > 100 {
        reply_error(ctx, "Volume must be between 0 and 100.").await?;
        return Ok(());
    }

    queue::set_volume(&ctx.data().registry, guild_id, level as f32 / 100.0).await;

    let e = embed::base(ctx.data().identity, "🔊 Volume", embed::BLUE)
        .description(format!("Volume set to **{level}%**"));
    ctx.send(CreateReply::default().embed(e)).await?;
    Ok(())
}
