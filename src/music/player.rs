use std::sync::Arc;

use async_trait::async_trait;
use serenity::model::id::GuildId;
use songbird::events::{Event, EventContext, EventHandler, TrackEvent};
use songbird::input::YoutubeDl;
use songbird::Songbird;
use tracing::{debug, error, info, warn};

use super::keep_alive::{KeepAlive, KEEP_ALIVE_INTERVAL};
use super::queue;
use super::state::{Advance, Departed, Enqueued, Skipped, Stopped, TrackOutcome};
use super::{BoundChannel, PlayerError, PlayerRegistry, Track};

/// Everything needed to drive playback for one guild of one identity.
#[derive(Clone)]
pub struct GuildAudio {
    pub identity: u8,
    pub guild_id: GuildId,
    pub registry: PlayerRegistry,
    pub songbird: Arc<Songbird>,
    pub http_client: reqwest::Client,
}

struct TrackNotifier {
    audio: GuildAudio,
    generation: u64,
    outcome: TrackOutcome,
}

#[async_trait]
impl EventHandler for TrackNotifier {
    async fn act(&self, _ctx: &EventContext<'_>) -> Option<Event> {
        let audio = self.audio.clone();
        let generation = self.generation;
        let outcome = self.outcome;

        tokio::spawn(async move {
            audio.advance(generation, outcome).await;
        });

        None
    }
}

impl GuildAudio {
    /// Joins `channel` and arms the keep-alive.
    pub async fn connect(&self, channel: BoundChannel) -> Result<(), PlayerError> {
        if !self.is_call_alive().await {
            // a player still bound to a dead call is reset first
            if let Some(handle) = queue::connection_lost(&self.registry, self.guild_id).await {
                let _ = handle.stop();
            }
        }

        self.songbird
            .join(self.guild_id, channel.id)
            .await
            .map_err(|e| PlayerError::Connect(e.to_string()))?;

        info!(
            identity = self.identity,
            guild = %self.guild_id,
            channel = %channel.name,
            "connected to voice channel"
        );
        queue::join(&self.registry, self.guild_id, channel).await;

        let audio = self.clone();
        queue::ensure_keep_alive(&self.registry, self.guild_id, move || audio.spawn_keep_alive())
            .await;
        Ok(())
    }

    fn spawn_keep_alive(self) -> KeepAlive {
        let probe = self.clone();
        KeepAlive::spawn(
            KEEP_ALIVE_INTERVAL,
            move || {
                let audio = probe.clone();
                async move { audio.is_call_alive().await }
            },
            move || async move {
                warn!(
                    identity = self.identity,
                    guild = %self.guild_id,
                    "voice connection gone, keep-alive stopping"
                );
                if let Some(handle) = queue::connection_lost(&self.registry, self.guild_id).await {
                    let _ = handle.stop();
                }
            },
        )
    }

    pub async fn is_call_alive(&self) -> bool {
        let Some(call) = self.songbird.get(self.guild_id) else {
            return false;
        };
        let alive = call.lock().await.current_connection().is_some();
        debug!(identity = self.identity, guild = %self.guild_id, alive, "keep-alive check");
        alive
    }

    /// Enqueues `track`, starting it when nothing was playing. The keep-alive
    /// is re-armed here since `stop` cancels it without leaving the channel.
    pub async fn play(&self, track: Track) -> Result<Enqueued, PlayerError> {
        let enqueued = queue::enqueue(&self.registry, self.guild_id, track).await?;
        let audio = self.clone();
        queue::ensure_keep_alive(&self.registry, self.guild_id, move || audio.spawn_keep_alive())
            .await;
        if let Enqueued::Started { track, generation } = &enqueued {
            self.start(track.clone(), *generation).await;
        }
        Ok(enqueued)
    }

    pub async fn skip(&self) -> Result<Skipped, PlayerError> {
        let skipped = queue::skip(&self.registry, self.guild_id).await?;
        if let Some(handle) = &skipped.handle {
            let _ = handle.stop();
        }
        if let Some((track, generation)) = &skipped.next {
            self.start(track.clone(), *generation).await;
        }
        Ok(skipped)
    }

    pub async fn stop(&self) -> Stopped {
        let stopped = queue::stop(&self.registry, self.guild_id).await;
        if let Some(handle) = &stopped.handle {
            let _ = handle.stop();
        }
        if let Some(call) = self.songbird.get(self.guild_id) {
            call.lock().await.stop();
        }
        stopped
    }

    pub async fn leave(&self) -> Result<Departed, PlayerError> {
        let departed = queue::leave(&self.registry, self.guild_id).await?;
        if let Some(handle) = &departed.handle {
            let _ = handle.stop();
        }
        if let Err(e) = self.songbird.remove(self.guild_id).await {
            warn!(identity = self.identity, guild = %self.guild_id, "voice disconnect: {e}");
        }
        info!(
            identity = self.identity,
            guild = %self.guild_id,
            channel = %departed.channel.name,
            "left voice channel"
        );
        Ok(departed)
    }

    async fn advance(&self, generation: u64, outcome: TrackOutcome) {
        match queue::advance(&self.registry, self.guild_id, generation, outcome).await {
            Advance::Start { track, generation } => self.start(track, generation).await,
            Advance::Drained => {
                info!(identity = self.identity, guild = %self.guild_id, "queue empty, staying connected");
            }
            Advance::Halted { dropped } => {
                warn!(
                    identity = self.identity,
                    guild = %self.guild_id,
                    dropped,
                    "too many consecutive playback failures, queue cleared"
                );
            }
            Advance::Stale => {}
        }
    }

    /// Hands `track` to the voice engine. Tracks that cannot be started count
    /// as failed and the queue moves on.
    async fn start(&self, mut track: Track, mut generation: u64) {
        loop {
            match self.begin(&track, generation).await {
                Ok(()) => {
                    info!(identity = self.identity, guild = %self.guild_id, "now playing: {}", track.title);
                    return;
                }
                Err(e) => {
                    error!(
                        identity = self.identity,
                        guild = %self.guild_id,
                        "playback failed for {}: {e}",
                        track.title
                    );
                    match queue::advance(&self.registry, self.guild_id, generation, TrackOutcome::Failed)
                        .await
                    {
                        Advance::Start {
                            track: next,
                            generation: next_generation,
                        } => {
                            track = next;
                            generation = next_generation;
                        }
                        Advance::Halted { dropped } => {
                            warn!(
                                identity = self.identity,
                                guild = %self.guild_id,
                                dropped,
                                "too many consecutive playback failures, queue cleared"
                            );
                            return;
                        }
                        Advance::Drained | Advance::Stale => return,
                    }
                }
            }
        }
    }

    async fn begin(&self, track: &Track, generation: u64) -> Result<(), PlayerError> {
        let call = self
            .songbird
            .get(self.guild_id)
            .ok_or(PlayerError::NotConnected)?;
        let volume = queue::get_volume(&self.registry, self.guild_id).await;
        let src = YoutubeDl::new(self.http_client.clone(), track.url.clone());

        let handle = {
            let mut handler = call.lock().await;
            let handle = handler.play_only(src.into());
            let _ = handle.set_volume(volume);

            for (event, outcome) in [
                (TrackEvent::End, TrackOutcome::Ended),
                (TrackEvent::Error, TrackOutcome::Failed),
            ] {
                handle
                    .add_event(
                        Event::Track(event),
                        TrackNotifier {
                            audio: self.clone(),
                            generation,
                            outcome,
                        },
                    )
                    .map_err(|e| PlayerError::Engine(e.to_string()))?;
            }
            handle
        };

        if !queue::attach_handle(&self.registry, self.guild_id, generation, handle.clone()).await {
            // replaced while we were starting it
            let _ = handle.stop();
        }
        Ok(())
    }
}
