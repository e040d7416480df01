use serenity::model::id::GuildId;
use songbird::tracks::ControlError;
use songbird::tracks::TrackHandle;

use super::keep_alive::KeepAlive;
use super::state::{Advance, Departed, Enqueued, Skipped, Stopped, TrackOutcome};
use super::{BoundChannel, GuildPlayer, PlayerError, PlayerRegistry, PlayerStatus, Track};

pub async fn join(registry: &PlayerRegistry, guild_id: GuildId, channel: BoundChannel) {
    let mut players = registry.write().await;
    players.entry(guild_id).or_default().join(channel);
}

pub async fn ensure_keep_alive<F>(registry: &PlayerRegistry, guild_id: GuildId, spawn: F) -> bool
where
    F: FnOnce() -> KeepAlive,
{
    let mut players = registry.write().await;
    players.entry(guild_id).or_default().ensure_keep_alive(spawn)
}

/// Check-and-append happens under a single write guard.
pub async fn enqueue(
    registry: &PlayerRegistry,
    guild_id: GuildId,
    track: Track,
) -> Result<Enqueued, PlayerError> {
    let mut players = registry.write().await;
    players.entry(guild_id).or_default().enqueue(track)
}

pub async fn advance(
    registry: &PlayerRegistry,
    guild_id: GuildId,
    generation: u64,
    outcome: TrackOutcome,
) -> Advance {
    let mut players = registry.write().await;
    match players.get_mut(&guild_id) {
        Some(player) => player.advance(generation, outcome),
        None => Advance::Stale,
    }
}

pub async fn skip(registry: &PlayerRegistry, guild_id: GuildId) -> Result<Skipped, PlayerError> {
    let mut players = registry.write().await;
    players
        .get_mut(&guild_id)
        .ok_or(PlayerError::NothingPlaying)?
        .skip()
}

pub async fn stop(registry: &PlayerRegistry, guild_id: GuildId) -> Stopped {
    let mut players = registry.write().await;
    players.entry(guild_id).or_default().stop()
}

fn engine_error(e: ControlError) -> PlayerError {
    PlayerError::Engine(e.to_string())
}

pub async fn pause(registry: &PlayerRegistry, guild_id: GuildId) -> Result<Track, PlayerError> {
    let mut players = registry.write().await;
    players
        .get_mut(&guild_id)
        .ok_or(PlayerError::NothingPlaying)?
        .pause_with(|handle| handle.map_or(Ok(()), |h| h.pause().map_err(engine_error)))
}

pub async fn resume(registry: &PlayerRegistry, guild_id: GuildId) -> Result<Track, PlayerError> {
    let mut players = registry.write().await;
    players
        .get_mut(&guild_id)
        .ok_or(PlayerError::NotPaused)?
        .resume_with(|handle| handle.map_or(Ok(()), |h| h.play().map_err(engine_error)))
}

pub async fn leave(registry: &PlayerRegistry, guild_id: GuildId) -> Result<Departed, PlayerError> {
    let mut players = registry.write().await;
    players
        .get_mut(&guild_id)
        .ok_or(PlayerError::NotConnected)?
        .leave()
}

pub async fn connection_lost(registry: &PlayerRegistry, guild_id: GuildId) -> Option<TrackHandle> {
    let mut players = registry.write().await;
    players
        .get_mut(&guild_id)
        .and_then(GuildPlayer::connection_lost)
}

/// Drops the guild's player entirely, cancelling its keep-alive.
pub async fn discard(registry: &PlayerRegistry, guild_id: GuildId) -> Option<TrackHandle> {
    let mut players = registry.write().await;
    players
        .remove(&guild_id)
        .and_then(|mut player| player.connection_lost())
}

pub async fn attach_handle(
    registry: &PlayerRegistry,
    guild_id: GuildId,
    generation: u64,
    handle: TrackHandle,
) -> bool {
    let mut players = registry.write().await;
    players
        .get_mut(&guild_id)
        .is_some_and(|player| player.attach_handle(generation, handle))
}

pub async fn set_volume(registry: &PlayerRegistry, guild_id: GuildId, volume: f32) {
    let mut players = registry.write().await;
    players.entry(guild_id).or_default().set_volume(volume);
}

pub async fn get_volume(registry: &PlayerRegistry, guild_id: GuildId) -> f32 {
    let players = registry.read().await;
    players
        .get(&guild_id)
        .map_or(super::state::DEFAULT_VOLUME, GuildPlayer::volume)
}

pub async fn get_current(registry: &PlayerRegistry, guild_id: GuildId) -> Option<Track> {
    let players = registry.read().await;
    players.get(&guild_id).and_then(|p| p.current().cloned())
}

pub async fn get_queue_list(registry: &PlayerRegistry, guild_id: GuildId) -> (Option<Track>, Vec<Track>) {
    let players = registry.read().await;
    match players.get(&guild_id) {
        Some(player) => (
            player.current().cloned(),
            player.queue().iter().cloned().collect(),
        ),
        None => (None, vec![]),
    }
}

pub async fn get_status(registry: &PlayerRegistry, guild_id: GuildId) -> PlayerStatus {
    let players = registry.read().await;
    players
        .get(&guild_id)
        .map_or(PlayerStatus::Idle, GuildPlayer::status)
}

pub async fn get_channel(registry: &PlayerRegistry, guild_id: GuildId) -> Option<BoundChannel> {
    let players = registry.read().await;
    players.get(&guild_id).and_then(|p| p.channel().cloned())
}

pub async fn get_track_handle(registry: &PlayerRegistry, guild_id: GuildId) -> Option<TrackHandle> {
    let players = registry.read().await;
    players
        .get(&guild_id)
        .and_then(|p| p.track_handle().cloned())
}

pub async fn has_keep_alive(registry: &PlayerRegistry, guild_id: GuildId) -> bool {
    let players = registry.read().await;
    players.get(&guild_id).is_some_and(GuildPlayer::has_keep_alive)
}
