use std::sync::Arc;

use poise::serenity_prelude as serenity;
use poise::CreateReply;
use serenity::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::gateway::ActivityData;
use serenity::model::guild::UnavailableGuild;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::credentials::Credential;
use crate::fleet::{Fleet, FleetRequest, IdentityReport, MoveOutcome};
use crate::music;
use crate::utils::embed;
use crate::{commands, events, Data, Error};

const FLEET_INBOX: usize = 16;

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let identity = ctx.data().identity;
            error!(identity, command = %ctx.command().name, "command failed: {error}");
            let reply = CreateReply::default()
                .embed(embed::error(
                    identity,
                    "Something went wrong while running that command!",
                ))
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                warn!(identity, "could not deliver error reply: {e}");
            }
        }
        poise::FrameworkError::UnknownInteraction {
            ctx,
            framework,
            interaction,
            ..
        } => {
            let identity = framework.user_data.identity;
            warn!(identity, command = %interaction.data.name, "unknown command");
            let response = CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content("❌ Unknown command!")
                    .ephemeral(true),
            );
            if let Err(e) = interaction.create_response(ctx, response).await {
                warn!(identity, "could not reject unknown command: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("error while handling error: {e}");
            }
        }
    }
}

/// Registers globally, then in every guild we are already in. Guild failures
/// are only logged.
async fn register_commands(
    ctx: &serenity::Context,
    identity: u8,
    commands: &[poise::Command<Data, Error>],
    guilds: &[UnavailableGuild],
) {
    match poise::builtins::register_globally(ctx, commands).await {
        Ok(()) => info!(identity, count = commands.len(), "synced slash commands globally"),
        Err(e) => error!(identity, "failed to sync slash commands globally: {e}"),
    }

    for guild in guilds {
        match poise::builtins::register_in_guild(ctx, commands, guild.id).await {
            Ok(()) => info!(identity, guild = %guild.id, "synced slash commands for guild"),
            Err(e) => warn!(identity, guild = %guild.id, "failed to sync slash commands for guild: {e}"),
        }
    }
}

async fn report(ctx: &serenity::Context, data: &Data, guild_id: serenity::GuildId) -> IdentityReport {
    let tag = ctx.cache.current_user().tag();
    let in_guild = ctx.cache.guild(guild_id).is_some();
    let players = data.registry.read().await;
    let player = players.get(&guild_id);

    IdentityReport {
        identity: data.identity,
        tag,
        in_guild,
        channel: player.and_then(|p| p.channel()).map(|c| c.name.clone()),
        status: player.map_or(music::PlayerStatus::Idle, |p| p.status()),
        current: player.and_then(|p| p.current()).map(|t| t.title.clone()),
    }
}

/// Serves fleet requests for this identity, one at a time.
async fn serve_fleet(ctx: serenity::Context, data: Data, mut inbox: mpsc::Receiver<FleetRequest>) {
    while let Some(request) = inbox.recv().await {
        match request {
            FleetRequest::Report { guild_id, reply } => {
                let _ = reply.send(report(&ctx, &data, guild_id).await);
            }
            FleetRequest::MoveTo {
                guild_id,
                channel,
                reply,
            } => {
                let in_guild = ctx.cache.guild(guild_id).is_some();
                let outcome = if in_guild {
                    match data.audio(guild_id).connect(channel).await {
                        Ok(()) => MoveOutcome::Moved,
                        Err(e) => MoveOutcome::Failed(e.to_string()),
                    }
                } else {
                    MoveOutcome::NotInGuild
                };
                let _ = reply.send(outcome);
            }
            FleetRequest::Disconnect { guild_id, reply } => {
                let left = data.audio(guild_id).leave().await.is_ok();
                let _ = reply.send(left);
            }
        }
    }
}

/// Runs one bot identity until its gateway session ends.
pub async fn run(credential: Credential, fleet: Arc<Fleet>) -> Result<(), Error> {
    let identity = credential.identity;
    let songbird = songbird::Songbird::serenity();
    let intents = serenity::GatewayIntents::non_privileged();

    let setup_fleet = Arc::clone(&fleet);
    let setup_songbird = Arc::clone(&songbird);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            let fleet = Arc::clone(&setup_fleet);
            let songbird = Arc::clone(&setup_songbird);
            Box::pin(async move {
                info!(
                    identity,
                    user = %ready.user.tag(),
                    guilds = ready.guilds.len(),
                    "bot is ready"
                );
                ctx.set_activity(Some(ActivityData::listening(format!(
                    "🎵 Bot #{identity} | /help"
                ))));

                register_commands(ctx, identity, &framework.options().commands, &ready.guilds)
                    .await;

                let data = Data {
                    identity,
                    registry: music::new_registry(),
                    http_client: reqwest::Client::new(),
                    songbird,
                    fleet: Arc::clone(&fleet),
                };

                let (tx, rx) = mpsc::channel(FLEET_INBOX);
                tokio::spawn(serve_fleet(ctx.clone(), data.clone(), rx));
                fleet.register(identity, tx).await;

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&credential.token, intents)
        .framework(framework)
        .voice_manager_arc(songbird)
        .await?;

    let result = client.start().await;
    fleet.deregister(identity).await;
    result.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::queue;

    #[tokio::test]
    async fn test_guild_removed_discards_player() {
        let data = Data {
            identity: 1,
            registry: music::new_registry(),
            http_client: reqwest::Client::new(),
            songbird: songbird::Songbird::serenity(),
            fleet: Arc::new(Fleet::new()),
        };
        let guild_id = serenity::GuildId::new(77);
        queue::join(
            &data.registry,
            guild_id,
            music::BoundChannel {
                id: serenity::ChannelId::new(3),
                name: "Lobby".to_string(),
            },
        )
        .await;

        events::guild_removed(&data, guild_id).await;

        assert!(!data.registry.read().await.contains_key(&guild_id));
    }
}
