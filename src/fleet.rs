use std::collections::BTreeMap;
use std::time::Duration;

use serenity::model::id::GuildId;
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::warn;

use crate::music::{BoundChannel, PlayerStatus};

const REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// How one identity sees a guild.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityReport {
    pub identity: u8,
    pub tag: String,
    pub in_guild: bool,
    pub channel: Option<String>,
    pub status: PlayerStatus,
    pub current: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    NotInGuild,
    Failed(String),
}

/// Requests served by an identity's control task against its own state.
#[derive(Debug)]
pub enum FleetRequest {
    Report {
        guild_id: GuildId,
        reply: oneshot::Sender<IdentityReport>,
    },
    MoveTo {
        guild_id: GuildId,
        channel: BoundChannel,
        reply: oneshot::Sender<MoveOutcome>,
    },
    Disconnect {
        guild_id: GuildId,
        reply: oneshot::Sender<bool>,
    },
}

/// Online identities of this process, addressed by identity number.
#[derive(Default)]
pub struct Fleet {
    members: RwLock<BTreeMap<u8, mpsc::Sender<FleetRequest>>>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, identity: u8, sender: mpsc::Sender<FleetRequest>) {
        self.members.write().await.insert(identity, sender);
    }

    pub async fn deregister(&self, identity: u8) {
        self.members.write().await.remove(&identity);
    }

    pub async fn online(&self) -> Vec<u8> {
        self.members.read().await.keys().copied().collect()
    }

    pub async fn is_online(&self, identity: u8) -> bool {
        self.members.read().await.contains_key(&identity)
    }

    async fn senders(&self) -> Vec<(u8, mpsc::Sender<FleetRequest>)> {
        self.members
            .read()
            .await
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect()
    }

    async fn ask<T>(
        identity: u8,
        sender: &mpsc::Sender<FleetRequest>,
        build: impl FnOnce(oneshot::Sender<T>) -> FleetRequest,
    ) -> Option<T> {
        let (tx, rx) = oneshot::channel();
        if sender.send(build(tx)).await.is_err() {
            warn!(identity, "fleet member is gone");
            return None;
        }
        match tokio::time::timeout(REPLY_TIMEOUT, rx).await {
            Ok(Ok(value)) => Some(value),
            _ => {
                warn!(identity, "fleet member did not answer");
                None
            }
        }
    }

    pub async fn reports(&self, guild_id: GuildId) -> Vec<IdentityReport> {
        let mut reports = Vec::new();
        for (identity, sender) in self.senders().await {
            if let Some(report) = Self::ask(identity, &sender, |reply| FleetRequest::Report {
                guild_id,
                reply,
            })
            .await
            {
                reports.push(report);
            }
        }
        reports
    }

    pub async fn move_all(&self, guild_id: GuildId, channel: &BoundChannel) -> Vec<(u8, MoveOutcome)> {
        let mut outcomes = Vec::new();
        for (identity, sender) in self.senders().await {
            let outcome = Self::ask(identity, &sender, |reply| FleetRequest::MoveTo {
                guild_id,
                channel: channel.clone(),
                reply,
            })
            .await
            .unwrap_or_else(|| MoveOutcome::Failed("no answer".to_string()));
            outcomes.push((identity, outcome));
        }
        outcomes
    }

    /// Identities that were connected in the guild and left.
    pub async fn disconnect_all(&self, guild_id: GuildId) -> Vec<u8> {
        let mut left = Vec::new();
        for (identity, sender) in self.senders().await {
            let disconnected = Self::ask(identity, &sender, |reply| FleetRequest::Disconnect {
                guild_id,
                reply,
            })
            .await
            .unwrap_or(false);
            if disconnected {
                left.push(identity);
            }
        }
        left
    }
}
