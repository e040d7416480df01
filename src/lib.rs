pub mod bot;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod events;
pub mod fleet;
pub mod music;
pub mod status;
pub mod utils;

use std::sync::Arc;

use serenity::model::id::GuildId;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Per-identity state handed to every command and event.
#[derive(Clone)]
pub struct Data {
    pub identity: u8,
    pub registry: music::PlayerRegistry,
    pub http_client: reqwest::Client,
    pub songbird: Arc<songbird::Songbird>,
    pub fleet: Arc<fleet::Fleet>,
}

impl Data {
    pub fn audio(&self, guild_id: GuildId) -> music::player::GuildAudio {
        music::player::GuildAudio {
            identity: self.identity,
            guild_id,
            registry: self.registry.clone(),
            songbird: self.songbird.clone(),
            http_client: self.http_client.clone(),
        }
    }
}
