mod admin;
mod help;
mod info;
mod nowplaying;
mod pause;
mod play;
mod queue;
mod skip;
mod stop;
mod voice;
mod volume;

use poise::CreateReply;
use serenity::model::id::GuildId;
use serenity::model::permissions::Permissions;

use crate::music::BoundChannel;
use crate::utils::{channels, embed};
use crate::{Context, Data, Error};

pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        play::play(),
        pause::pause(),
        pause::resume(),
        skip::skip(),
        stop::stop(),
        queue::queue(),
        nowplaying::nowplaying(),
        volume::volume(),
        voice::joinroom(),
        voice::leave(),
        voice::listrooms(),
        info::botinfo(),
        help::help(),
        info::test_cmd(),
        admin::admin_botlist(),
        admin::admin_moveall(),
        admin::admin_disconnectall(),
        admin::admin_forcejoin(),
        admin::admin_status(),
    ]
}

pub(crate) fn guild_id(ctx: Context<'_>) -> Result<GuildId, Error> {
    Ok(ctx.guild_id().ok_or("This command only works inside a server")?)
}

pub(crate) async fn reply_error(ctx: Context<'_>, message: &str) -> Result<(), Error> {
    ctx.send(
        CreateReply::default()
            .embed(embed::error(ctx.data().identity, message))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Permissions the invoking member holds in this channel, as sent with the interaction.
fn member_permissions(ctx: Context<'_>) -> Option<Permissions> {
    match ctx {
        poise::Context::Application(app) => app
            .interaction
            .member
            .as_ref()
            .and_then(|member| member.permissions),
        _ => None,
    }
}

/// Permissions missing from the interaction never grant admin rights.
pub(crate) fn has_admin(perms: Option<Permissions>) -> bool {
    perms.is_some_and(|perms| perms.administrator())
}

pub(crate) fn is_admin(ctx: Context<'_>) -> bool {
    has_admin(member_permissions(ctx))
}

/// Replies with a rejection and returns false when the caller is not an administrator.
pub(crate) async fn require_admin(ctx: Context<'_>) -> Result<bool, Error> {
    if is_admin(ctx) {
        return Ok(true);
    }
    reply_error(ctx, "This command requires administrator permissions!").await?;
    Ok(false)
}

pub(crate) fn caller_channel(ctx: Context<'_>) -> Option<BoundChannel> {
    let guild = ctx.guild()?;
    channels::user_channel(&guild, ctx.author().id)
}

/// Replies with a rejection when the caller is not in a voice channel.
pub(crate) async fn require_voice(ctx: Context<'_>) -> Result<Option<BoundChannel>, Error> {
    match caller_channel(ctx) {
        Some(channel) => Ok(Some(channel)),
        None => {
            reply_error(ctx, "You need to be in a voice channel first!").await?;
            Ok(None)
        }
    }
}

pub(crate) fn rooms(ctx: Context<'_>) -> Result<Vec<channels::VoiceRoom>, Error> {
    let guild = ctx.guild().ok_or("Could not read server information")?;
    Ok(channels::voice_rooms(&guild))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_admin() {
        assert!(!has_admin(None));
        assert!(!has_admin(Some(Permissions::empty())));
        assert!(!has_admin(Some(
            Permissions::MANAGE_GUILD | Permissions::MOVE_MEMBERS | Permissions::CONNECT
        )));
        assert!(has_admin(Some(Permissions::ADMINISTRATOR)));
        assert!(has_admin(Some(Permissions::ADMINISTRATOR | Permissions::SPEAK)));
    }
}
