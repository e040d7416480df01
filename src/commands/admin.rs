use poise::CreateReply;
use tracing::{info, warn};

use crate::commands::{guild_id, reply_error, require_admin, rooms};
use crate::fleet::MoveOutcome;
use crate::music::{queue, BoundChannel, PlayerStatus};
use crate::utils::{channels, embed};
use crate::{Context, Error};

/// [ADMIN] List all active bots
#[poise::command(slash_command, guild_only, default_member_permissions = "ADMINISTRATOR")]
pub async fn admin_botlist(ctx: Context<'_>) -> Result<(), Error> {
    if !require_admin(ctx).await? {
        return Ok(());
    }
    let guild_id = guild_id(ctx)?;
    ctx.defer().await?;

    let reports = ctx.data().fleet.reports(guild_id).await;

    let mut e = embed::base(ctx.data().identity, "🤖 Active bots", embed::GOLD)
        .description(format!("{} bot(s) online in this process", reports.len()));

    let present: Vec<_> = reports.iter().filter(|r| r.in_guild).collect();
    if present.is_empty() {
        e = e.description("No music bots found in this server");
    }
    for report in present {
        let voice = match &report.channel {
            Some(name) => format!("🟢 in **{name}** ({})", report.status),
            None => "🔴 not in a voice channel".to_string(),
        };
        let value = match &report.current {
            Some(title) => format!("{voice}\n🎵 {}", embed::truncate(title, 50)),
            None => voice,
        };
        e = e.field(format!("#{} {}", report.identity, report.tag), value, true);
    }

    ctx.send(CreateReply::default().embed(e)).await?;
    Ok(())
}

/// [ADMIN] Move all bots to a channel
#[poise::command(slash_command, guild_only, default_member_permissions = "ADMINISTRATOR")]
pub async fn admin_moveall(
    ctx: Context<'_>,
    #[description = "Voice channel name"] channel_name: String,
) -> Result<(), Error> {
    if !require_admin(ctx).await? {
        return Ok(());
    }
    let guild_id = guild_id(ctx)?;
    let rooms = rooms(ctx)?;

    let Some(room) = channels::find_room(&rooms, &channel_name) else {
        reply_error(
            ctx,
            &format!(
                "Voice channel '{channel_name}' not found!\nAvailable channels: {}",
                channels::room_names(&rooms, 5)
            ),
        )
        .await?;
        return Ok(());
    };

    ctx.defer().await?;
    let channel = BoundChannel::from(room);
    let outcomes = ctx.data().fleet.move_all(guild_id, &channel).await;
    info!(guild = %guild_id, channel = %channel.name, "admin move-all requested");

    let mut lines = Vec::new();
    let mut moved = 0;
    for (identity, outcome) in &outcomes {
        match outcome {
            MoveOutcome::Moved => {
                moved += 1;
                lines.push(format!("✅ Bot #{identity}"));
            }
            MoveOutcome::NotInGuild => {}
            MoveOutcome::Failed(reason) => lines.push(format!("❌ Bot #{identity}: {reason}")),
        }
    }
    if lines.is_empty() {
        lines.push("No bots available in this server.".to_string());
    }

    let e = embed::base(ctx.data().identity, "🚚 Move all bots", embed::GOLD)
        .description(format!(
            "{moved} bot(s) moved to **{}**\n\n{}",
            channel.name,
            lines.join("\n")
        ));
    ctx.send(CreateReply::default().embed(e)).await?;
    Ok(())
}

/// [ADMIN] Disconnect all bots
#[poise::command(slash_command, guild_only, default_member_permissions = "ADMINISTRATOR")]
pub async fn admin_disconnectall(ctx: Context<'_>) -> Result<(), Error> {
    if !require_admin(ctx).await? {
        return Ok(());
    }
    let guild_id = guild_id(ctx)?;
    ctx.defer().await?;

    let left = ctx.data().fleet.disconnect_all(guild_id).await;
    info!(guild = %guild_id, count = left.len(), "admin disconnect-all requested");

    let description = if left.is_empty() {
        "No bot was connected in this server.".to_string()
    } else {
        let ids: Vec<String> = left.iter().map(|id| format!("#{id}")).collect();
        format!("Disconnected: {}", ids.join(", "))
    };
    let e = embed::base(ctx.data().identity, "🔌 Disconnect all bots", embed::ORANGE)
        .description(description);
    ctx.send(CreateReply::default().embed(e)).await?;
    Ok(())
}

/// [ADMIN] Force this bot to join channel
#[poise::command(slash_command, guild_only, default_member_permissions = "ADMINISTRATOR")]
pub async fn admin_forcejoin(
    ctx: Context<'_>,
    #[description = "Voice channel name"] channel_name: String,
) -> Result<(), Error> {
    if !require_admin(ctx).await? {
        return Ok(());
    }
    let guild_id = guild_id(ctx)?;
    let identity = ctx.data().identity;
    let rooms = rooms(ctx)?;

    let Some(room) = channels::find_room(&rooms, &channel_name) else {
        reply_error(
            ctx,
            &format!(
                "Voice channel '{channel_name}' not found!\nAvailable channels: {}",
                channels::room_names(&rooms, 5)
            ),
        )
        .await?;
        return Ok(());
    };

    match ctx.data().audio(guild_id).connect(BoundChannel::from(room)).await {
        Ok(()) => {
            ctx.say(format!("✅ Bot #{identity} force-joined **{}**", room.name))
                .await?;
        }
        Err(e) => {
            warn!(identity, guild = %guild_id, "force join: {e}");
            reply_error(ctx, &format!("Failed to join: {e}")).await?;
        }
    }
    Ok(())
}

/// [ADMIN] Show detailed bot status
#[poise::command(slash_command, guild_only, default_member_permissions = "ADMINISTRATOR")]
pub async fn admin_status(ctx: Context<'_>) -> Result<(), Error> {
    if !require_admin(ctx).await? {
        return Ok(());
    }
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();
    let identity = data.identity;

    let tag = ctx.cache().current_user().tag();
    let ping = ctx.ping().await;
    let status = queue::get_status(&data.registry, guild_id).await;
    let channel = queue::get_channel(&data.registry, guild_id).await;
    let (current, queued) = queue::get_queue_list(&data.registry, guild_id).await;

    let mut e = embed::base(identity, format!("🔧 Bot #{identity} status"), embed::DARK_ORANGE)
        .field("Name", tag, true)
        .field("Bot number", format!("#{identity}"), true)
        .field("Ping", format!("{}ms", ping.as_millis()), true);

    e = match channel {
        Some(channel) if status != PlayerStatus::Idle => e
            .field("Voice channel", channel.name, true)
            .field("Voice status", format!("🟢 {status}"), true),
        _ => e.field("Voice status", "🔴 Disconnected", true),
    };

    if let Some(track) = current {
        e = e.field("Current song", embed::truncate(&track.title, 50), false);
    }
    e = e.field("Queue size", format!("{} song(s)", queued.len()), true);

    ctx.send(CreateReply::default().embed(e)).await?;
    Ok(())
}
