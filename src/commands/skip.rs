use poise::CreateReply;

use crate::commands::{guild_id, reply_error, require_voice};
use crate::utils::embed;
use crate::{Context, Error};

/// Skip current song
#[poise::command(slash_command, guild_only)]
pub async fn skip(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;
    if require_voice(ctx).await?.is_none() {
        return Ok(());
    }

    let identity = ctx.data().identity;
    match ctx.data().audio(guild_id).skip().await {
        Ok(skipped) => {
            let msg = match &skipped.next {
                Some((next, _)) => format!("**{}** → **{}**", skipped.skipped.title, next.title),
                None => format!("**{}** (queue is now empty)", skipped.skipped.title),
            };
            let e = embed::base(identity, "⏭️ Skipped", embed::BLUE).description(msg);
            ctx.send(CreateReply::default().embed(e)).await?;
        }
        Err(_) => reply_error(ctx, "Nothing is playing right now!").await?,
    }

    Ok(())
}
