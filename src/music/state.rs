use std::collections::VecDeque;

use songbird::tracks::TrackHandle;

use super::keep_alive::KeepAlive;
use super::{BoundChannel, Track};

pub const DEFAULT_VOLUME: f32 = 0.5;

/// Consecutive playback failures tolerated before the queue is dropped.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 3;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("not connected to a voice channel")]
    NotConnected,
    #[error("nothing is playing")]
    NothingPlaying,
    #[error("playback is not paused")]
    NotPaused,
    #[error("failed to join voice channel: {0}")]
    Connect(String),
    #[error("playback engine error: {0}")]
    Engine(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Playback {
    Stopped,
    Playing(Track),
    Paused(Track),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Connected {
        channel: BoundChannel,
        playback: Playback,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerStatus {
    Idle,
    ConnectedEmpty,
    Playing,
    Paused,
}

impl std::fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::ConnectedEmpty => write!(f, "Connected"),
            Self::Playing => write!(f, "Playing"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackOutcome {
    Ended,
    Failed,
}

/// How a freshly started engine handle has to be left when it is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachMode {
    Play,
    /// `pause` arrived while the track was still starting.
    Pause,
}

/// Result of enqueueing a track.
#[derive(Debug, PartialEq, Eq)]
pub enum Enqueued {
    /// Nothing was playing; the track became current and must be started.
    Started { track: Track, generation: u64 },
    /// Appended behind the current track; `position` is 1-based.
    Queued { position: usize },
}

/// What the driver has to do after a track finished or was skipped.
#[derive(Debug, PartialEq, Eq)]
pub enum Advance {
    Start { track: Track, generation: u64 },
    Drained,
    Halted { dropped: usize },
    Stale,
}

#[derive(Debug)]
pub struct Skipped {
    pub skipped: Track,
    pub next: Option<(Track, u64)>,
    pub handle: Option<TrackHandle>,
}

#[derive(Debug)]
pub struct Stopped {
    pub had_track: bool,
    pub cleared: usize,
    pub handle: Option<TrackHandle>,
}

#[derive(Debug)]
pub struct Departed {
    pub channel: BoundChannel,
    pub handle: Option<TrackHandle>,
}

/// Playback record for one guild of one bot identity.
pub struct GuildPlayer {
    queue: VecDeque<Track>,
    phase: Phase,
    volume: f32,
    generation: u64,
    failures: u32,
    track_handle: Option<TrackHandle>,
    keep_alive: Option<KeepAlive>,
}

impl Default for GuildPlayer {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            phase: Phase::Idle,
            volume: DEFAULT_VOLUME,
            generation: 0,
            failures: 0,
            track_handle: None,
            keep_alive: None,
        }
    }
}

impl GuildPlayer {
    pub fn status(&self) -> PlayerStatus {
        match &self.phase {
            Phase::Idle => PlayerStatus::Idle,
            Phase::Connected { playback, .. } => match playback {
                Playback::Stopped => PlayerStatus::ConnectedEmpty,
                Playback::Playing(_) => PlayerStatus::Playing,
                Playback::Paused(_) => PlayerStatus::Paused,
            },
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.phase, Phase::Connected { .. })
    }

    pub fn is_playing(&self) -> bool {
        self.status() == PlayerStatus::Playing
    }

    pub fn channel(&self) -> Option<&BoundChannel> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Connected { channel, .. } => Some(channel),
        }
    }

    pub fn current(&self) -> Option<&Track> {
        match &self.phase {
            Phase::Connected {
                playback: Playback::Playing(track) | Playback::Paused(track),
                ..
            } => Some(track),
            _ => None,
        }
    }

    pub fn queue(&self) -> &VecDeque<Track> {
        &self.queue
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn track_handle(&self) -> Option<&TrackHandle> {
        self.track_handle.as_ref()
    }

    pub fn has_keep_alive(&self) -> bool {
        self.keep_alive.as_ref().is_some_and(KeepAlive::is_running)
    }

    /// Binds the player to `channel`. Rebinding while connected keeps playback.
    pub fn join(&mut self, channel: BoundChannel) {
        match &mut self.phase {
            Phase::Idle => {
                self.phase = Phase::Connected {
                    channel,
                    playback: Playback::Stopped,
                };
            }
            Phase::Connected { channel: bound, .. } => *bound = channel,
        }
    }

    /// Installs a keep-alive unless one is already running; `spawn` is only
    /// called when it is needed.
    pub fn ensure_keep_alive<F>(&mut self, spawn: F) -> bool
    where
        F: FnOnce() -> KeepAlive,
    {
        if self.has_keep_alive() {
            return false;
        }
        self.keep_alive = Some(spawn());
        true
    }

    pub fn enqueue(&mut self, track: Track) -> Result<Enqueued, PlayerError> {
        let Phase::Connected { playback, .. } = &mut self.phase else {
            return Err(PlayerError::NotConnected);
        };

        match playback {
            Playback::Stopped => {
                self.generation += 1;
                self.failures = 0;
                *playback = Playback::Playing(track.clone());
                Ok(Enqueued::Started {
                    track,
                    generation: self.generation,
                })
            }
            Playback::Playing(_) | Playback::Paused(_) => {
                self.queue.push_back(track);
                Ok(Enqueued::Queued {
                    position: self.queue.len(),
                })
            }
        }
    }

    /// Moves to the next queued track after the track started as `generation`
    /// ended or failed.
    pub fn advance(&mut self, generation: u64, outcome: TrackOutcome) -> Advance {
        if generation != self.generation || self.current().is_none() {
            return Advance::Stale;
        }

        match outcome {
            TrackOutcome::Ended => self.failures = 0,
            TrackOutcome::Failed => {
                self.failures += 1;
                if self.failures >= MAX_CONSECUTIVE_FAILURES {
                    let dropped = self.queue.len();
                    self.queue.clear();
                    self.failures = 0;
                    self.generation += 1;
                    self.track_handle = None;
                    self.set_playback(Playback::Stopped);
                    return Advance::Halted { dropped };
                }
            }
        }

        match self.start_next() {
            Some((track, generation)) => Advance::Start { track, generation },
            None => Advance::Drained,
        }
    }

    pub fn skip(&mut self) -> Result<Skipped, PlayerError> {
        let skipped = self.current().cloned().ok_or(PlayerError::NothingPlaying)?;
        let handle = self.track_handle.take();
        self.failures = 0;
        let next = self.start_next();
        Ok(Skipped {
            skipped,
            next,
            handle,
        })
    }

    /// Always leaves an empty, non-playing player without a keep-alive.
    pub fn stop(&mut self) -> Stopped {
        let had_track = self.current().is_some();
        let cleared = self.queue.len();
        self.queue.clear();
        self.generation += 1;
        self.failures = 0;
        if let Some(keep_alive) = self.keep_alive.take() {
            keep_alive.cancel();
        }
        self.set_playback(Playback::Stopped);
        Stopped {
            had_track,
            cleared,
            handle: self.track_handle.take(),
        }
    }

    pub fn pause(&mut self) -> Result<&Track, PlayerError> {
        let Phase::Connected { playback, .. } = &mut self.phase else {
            return Err(PlayerError::NothingPlaying);
        };
        match std::mem::replace(playback, Playback::Stopped) {
            Playback::Playing(track) => {
                *playback = Playback::Paused(track);
            }
            other => {
                *playback = other;
                return Err(PlayerError::NothingPlaying);
            }
        }
        self.current().ok_or(PlayerError::NothingPlaying)
    }

    pub fn resume(&mut self) -> Result<&Track, PlayerError> {
        let Phase::Connected { playback, .. } = &mut self.phase else {
            return Err(PlayerError::NotPaused);
        };
        match std::mem::replace(playback, Playback::Stopped) {
            Playback::Paused(track) => {
                *playback = Playback::Playing(track);
            }
            other => {
                *playback = other;
                return Err(PlayerError::NotPaused);
            }
        }
        self.current().ok_or(PlayerError::NotPaused)
    }

    /// Pauses and hands the live handle, if any, to `engine`. When the engine
    /// refuses, the player is put back to Playing.
    pub fn pause_with<F>(&mut self, engine: F) -> Result<Track, PlayerError>
    where
        F: FnOnce(Option<&TrackHandle>) -> Result<(), PlayerError>,
    {
        let track = self.pause()?.clone();
        if let Err(e) = engine(self.track_handle.as_ref()) {
            self.set_playback(Playback::Playing(track));
            return Err(e);
        }
        Ok(track)
    }

    /// Counterpart of [`pause_with`](Self::pause_with); a refused resume stays Paused.
    pub fn resume_with<F>(&mut self, engine: F) -> Result<Track, PlayerError>
    where
        F: FnOnce(Option<&TrackHandle>) -> Result<(), PlayerError>,
    {
        let track = self.resume()?.clone();
        if let Err(e) = engine(self.track_handle.as_ref()) {
            self.set_playback(Playback::Paused(track));
            return Err(e);
        }
        Ok(track)
    }

    pub fn leave(&mut self) -> Result<Departed, PlayerError> {
        let Phase::Connected { channel, .. } = std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return Err(PlayerError::NotConnected);
        };
        self.reset();
        Ok(Departed {
            channel,
            handle: self.track_handle.take(),
        })
    }

    /// The voice connection vanished underneath us.
    pub fn connection_lost(&mut self) -> Option<TrackHandle> {
        self.phase = Phase::Idle;
        self.reset();
        self.track_handle.take()
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(handle) = &self.track_handle {
            let _ = handle.set_volume(self.volume);
        }
    }

    /// `None` when the track started as `generation` was already replaced.
    pub fn attach_mode(&self, generation: u64) -> Option<AttachMode> {
        if generation != self.generation {
            return None;
        }
        match self.status() {
            PlayerStatus::Playing => Some(AttachMode::Play),
            PlayerStatus::Paused => Some(AttachMode::Pause),
            PlayerStatus::Idle | PlayerStatus::ConnectedEmpty => None,
        }
    }

    /// Records the engine handle for the track started as `generation`,
    /// pausing it if the player was paused in the meantime. Returns false
    /// when that track was already replaced.
    pub fn attach_handle(&mut self, generation: u64, handle: TrackHandle) -> bool {
        let Some(mode) = self.attach_mode(generation) else {
            return false;
        };
        if mode == AttachMode::Pause {
            let _ = handle.pause();
        }
        self.track_handle = Some(handle);
        true
    }

    fn start_next(&mut self) -> Option<(Track, u64)> {
        self.generation += 1;
        self.track_handle = None;
        match self.queue.pop_front() {
            Some(track) => {
                self.set_playback(Playback::Playing(track.clone()));
                Some((track, self.generation))
            }
            None => {
                self.set_playback(Playback::Stopped);
                None
            }
        }
    }

    fn set_playback(&mut self, next: Playback) {
        if let Phase::Connected { playback, .. } = &mut self.phase {
            *playback = next;
        }
    }

    fn reset(&mut self) {
        self.queue.clear();
        self.generation += 1;
        self.failures = 0;
        if let Some(keep_alive) = self.keep_alive.take() {
            keep_alive.cancel();
        }
    }
}
