use poise::CreateReply;
use serenity::model::Timestamp;

use crate::credentials::MAX_IDENTITIES;
use crate::utils::embed;
use crate::{Context, Error};

/// Show bot information
#[poise::command(slash_command, guild_only)]
pub async fn botinfo(ctx: Context<'_>) -> Result<(), Error> {
    let identity = ctx.data().identity;
    let (tag, avatar) = {
        let me = ctx.cache().current_user();
        (me.tag(), me.face())
    };
    let guilds = ctx.cache().guild_count();
    let ping = ctx.ping().await;

    let e = embed::base(identity, format!("🤖 Bot #{identity}"), embed::PURPLE)
        .description("Multi-bot Discord music system")
        .field("Name", tag, true)
        .field("Bot number", format!("#{identity}"), true)
        .field("Ping", format!("{}ms", ping.as_millis()), true)
        .field("Servers", guilds.to_string(), true)
        .field("24/7 mode", "✅ Active", true)
        .field("Total bots", format!("{MAX_IDENTITIES} slots"), true)
        .thumbnail(avatar)
        .timestamp(Timestamp::now());

    ctx.send(CreateReply::default().embed(e)).await?;
    Ok(())
}

/// Test if slash commands work
#[poise::command(slash_command, rename = "test")]
pub async fn test_cmd(ctx: Context<'_>) -> Result<(), Error> {
    ctx.send(
        CreateReply::default()
            .content(format!("✅ Bot #{} is working!", ctx.data().identity))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
