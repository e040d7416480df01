pub mod keep_alive;
pub mod player;
pub mod queue;
pub mod source;
pub mod state;

use std::collections::HashMap;
use std::sync::Arc;

use serenity::model::id::{ChannelId, GuildId, UserId};
use tokio::sync::RwLock;

pub use state::{GuildPlayer, Playback, PlayerError, PlayerStatus};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Requester {
    pub id: UserId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub url: String,
    pub duration_secs: Option<u64>,
    pub requester: Requester,
    pub thumbnail: Option<String>,
}

impl Track {
    pub fn duration(&self) -> String {
        self.duration_secs
            .map_or_else(|| "Live".to_string(), format_duration)
    }
}

/// Voice channel a player is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundChannel {
    pub id: ChannelId,
    pub name: String,
}

pub fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Guild players owned by one bot identity.
pub type PlayerRegistry = Arc<RwLock<HashMap<GuildId, GuildPlayer>>>;

pub fn new_registry() -> PlayerRegistry {
    Arc::new(RwLock::new(HashMap::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(3600), "1:00:00");
        assert_eq!(format_duration(3725), "1:02:05");
    }

    #[test]
    fn test_track_duration_live() {
        let track = Track {
            title: "stream".to_string(),
            url: "https://www.youtube.com/watch?v=live".to_string(),
            duration_secs: None,
            requester: Requester {
                id: UserId::new(1),
                name: "user".to_string(),
            },
            thumbnail: None,
        };
        assert_eq!(track.duration(), "Live");
    }
}
