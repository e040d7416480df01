use poise::CreateReply;
use serenity::builder::CreateEmbedFooter;

use crate::commands::is_admin;
use crate::utils::embed;
use crate::{Context, Error};

const MUSIC_CMDS: &str = "\
`/play` - play music from YouTube
`/pause` - pause playback
`/resume` - resume playback
`/skip` - skip the current song
`/stop` - stop and clear the queue
`/queue` - show the queue
`/nowplaying` - show the current song
`/volume` - change the volume";

const CONTROL_CMDS: &str = "\
`/joinroom` - join a voice channel
`/leave` - leave the voice channel
`/listrooms` - list voice channels
`/botinfo` - bot information";

const ADMIN_CMDS: &str = "\
`/admin_botlist` - list every bot
`/admin_status` - detailed status
`/admin_forcejoin` - force this bot into a channel
`/admin_moveall` - move every bot into a channel
`/admin_disconnectall` - disconnect every bot";

/// Show all available commands
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let identity = ctx.data().identity;

    let mut e = embed::base(identity, format!("🎵 Bot #{identity} - commands"), embed::BLUE)
        .description("All available commands:")
        .field("🎵 Music", MUSIC_CMDS, false)
        .field("🤖 Control", CONTROL_CMDS, false)
        .footer(CreateEmbedFooter::new(format!(
            "Bot #{identity} • running 24/7 • type / to see commands"
        )));

    if is_admin(ctx) {
        e = e.field("🔧 Admin", ADMIN_CMDS, false);
    }

    ctx.send(CreateReply::default().embed(e).ephemeral(true))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_commands_exist() {
        let names: Vec<String> = crate::commands::all().into_iter().map(|c| c.name).collect();

        for line in [MUSIC_CMDS, CONTROL_CMDS, ADMIN_CMDS].iter().flat_map(|s| s.lines()) {
            let (usage, text) = line
                .split_once(" - ")
                .unwrap_or_else(|| panic!("malformed help line {line:?}"));
            assert!(!text.is_empty());
            let name = usage.trim_matches('`').trim_start_matches('/');
            assert!(names.iter().any(|n| n == name), "help lists unknown /{name}");
        }
    }
}
