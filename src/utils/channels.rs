use serenity::model::channel::ChannelType;
use serenity::model::guild::Guild;
use serenity::model::id::{ChannelId, UserId};

use crate::music::BoundChannel;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoiceRoom {
    pub id: ChannelId,
    pub name: String,
    pub position: u16,
    pub members: usize,
}

impl From<&VoiceRoom> for BoundChannel {
    fn from(room: &VoiceRoom) -> Self {
        BoundChannel {
            id: room.id,
            name: room.name.clone(),
        }
    }
}

/// Voice channels of `guild`, ordered by their position in the sidebar.
pub fn voice_rooms(guild: &Guild) -> Vec<VoiceRoom> {
    let mut rooms: Vec<VoiceRoom> = guild
        .channels
        .values()
        .filter(|ch| ch.kind == ChannelType::Voice)
        .map(|ch| VoiceRoom {
            id: ch.id,
            name: ch.name.clone(),
            position: ch.position,
            members: guild
                .voice_states
                .values()
                .filter(|vs| vs.channel_id == Some(ch.id))
                .count(),
        })
        .collect();
    rooms.sort_by_key(|room| (room.position, room.id));
    rooms
}

/// First room whose name contains `needle`, ignoring case.
pub fn find_room<'a>(rooms: &'a [VoiceRoom], needle: &str) -> Option<&'a VoiceRoom> {
    let needle = needle.trim().to_lowercase();
    rooms
        .iter()
        .find(|room| room.name.to_lowercase().contains(&needle))
}

pub fn room_names(rooms: &[VoiceRoom], limit: usize) -> String {
    rooms
        .iter()
        .take(limit)
        .map(|room| room.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The voice channel `user` currently sits in.
pub fn user_channel(guild: &Guild, user: UserId) -> Option<BoundChannel> {
    let channel_id = guild.voice_states.get(&user).and_then(|vs| vs.channel_id)?;
    let name = guild
        .channels
        .get(&channel_id)
        .map_or_else(|| channel_id.to_string(), |ch| ch.name.clone());
    Some(BoundChannel {
        id: channel_id,
        name,
    })
}
