use poise::CreateReply;
use tracing::warn;

use crate::commands::{guild_id, require_voice};
use crate::music::state::Enqueued;
use crate::music::{queue, source, PlayerStatus, Requester};
use crate::utils::embed;
use crate::{Context, Error};

async fn send_failure(ctx: Context<'_>, message: &str) -> Result<(), Error> {
    ctx.send(CreateReply::default().embed(embed::error(ctx.data().identity, message)))
        .await?;
    Ok(())
}

/// Playlist position reported back; a track that starts right away sits at
/// the head.
fn reply_position(enqueued: &Enqueued) -> usize {
    match enqueued {
        Enqueued::Started { .. } => 1,
        Enqueued::Queued { position } => *position,
    }
}

/// Play music from YouTube
#[poise::command(slash_command, guild_only)]
pub async fn play(
    ctx: Context<'_>,
    #[description = "YouTube URL or search query"] query: String,
) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;
    let Some(channel) = require_voice(ctx).await? else {
        return Ok(());
    };

    ctx.defer().await?;

    let data = ctx.data();
    let audio = data.audio(guild_id);

    let idle = queue::get_status(&data.registry, guild_id).await == PlayerStatus::Idle;
    if idle || !audio.is_call_alive().await {
        if let Err(e) = audio.connect(channel).await {
            warn!(identity = data.identity, guild = %guild_id, "play: {e}");
            return send_failure(ctx, "Could not join your voice channel.").await;
        }
    }

    let requester = Requester {
        id: ctx.author().id,
        name: ctx.author().name.clone(),
    };
    let track = match source::resolve(&query, requester).await {
        Ok(track) => track,
        Err(e) => {
            warn!(identity = data.identity, guild = %guild_id, "could not resolve {query:?}: {e}");
            return send_failure(
                ctx,
                &format!("Failed to play that track ({e}). Check the link or try again."),
            )
            .await;
        }
    };

    let reply = match audio.play(track.clone()).await {
        Ok(enqueued) => embed::added_to_queue(data.identity, &track, reply_position(&enqueued)),
        Err(e) => return send_failure(ctx, &format!("Failed to play that track: {e}")).await,
    };

    ctx.send(CreateReply::default().embed(reply)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serenity::model::id::UserId;

    use super::*;
    use crate::music::Track;

    #[test]
    fn test_reply_position() {
        let track = Track {
            title: "Song".to_string(),
            url: "https://www.youtube.com/watch?v=x".to_string(),
            duration_secs: None,
            requester: Requester {
                id: UserId::new(1),
                name: "user".to_string(),
            },
            thumbnail: None,
        };
        let started = Enqueued::Started {
            track,
            generation: 4,
        };
        assert_eq!(reply_position(&started), 1);
        assert_eq!(reply_position(&Enqueued::Queued { position: 3 }), 3);
    }
}
