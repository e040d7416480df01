use serenity::builder::{CreateEmbed, CreateEmbedFooter};

use crate::music::Track;

pub const GREEN: u32 = 0x00FF00;
pub const RED: u32 = 0xFF0000;
pub const ORANGE: u32 = 0xFFA500;
pub const BLUE: u32 = 0x0099FF;
pub const PURPLE: u32 = 0x9932CC;
pub const GOLD: u32 = 0xFFD700;
pub const DARK_ORANGE: u32 = 0xFF8C00;

const QUEUE_PAGE: usize = 10;

pub fn footer(identity: u8) -> CreateEmbedFooter {
    CreateEmbedFooter::new(format!("Bot #{identity}"))
}

pub fn base(identity: u8, title: impl Into<String>, color: u32) -> CreateEmbed {
    CreateEmbed::new()
        .title(title)
        .color(color)
        .footer(footer(identity))
}

pub fn added_to_queue(identity: u8, track: &Track, position: usize) -> CreateEmbed {
    let mut embed = base(identity, "✅ Added to queue", GREEN)
        .description(format!("**[{}]({})**", track.title, track.url))
        .field("Duration", track.duration(), true)
        .field("Position", position.to_string(), true)
        .field("Requested by", format!("<@{}>", track.requester.id), true);

    if let Some(thumb) = &track.thumbnail {
        embed = embed.thumbnail(thumb);
    }
    embed
}

pub fn now_playing(identity: u8, track: &Track) -> CreateEmbed {
    let mut embed = base(identity, "🎵 Now playing", GREEN)
        .description(format!("**[{}]({})**", track.title, track.url))
        .field("Duration", track.duration(), true)
        .field("Requested by", format!("<@{}>", track.requester.id), true);

    if let Some(thumb) = &track.thumbnail {
        embed = embed.thumbnail(thumb);
    }
    embed
}

pub fn queue_list(identity: u8, current: Option<&Track>, tracks: &[Track]) -> CreateEmbed {
    let mut description = String::new();

    if let Some(track) = current {
        description.push_str(&format!(
            "**Now playing:** [{}]({}) `{}`\n\n",
            track.title,
            track.url,
            track.duration()
        ));
    }

    if tracks.is_empty() {
        description.push_str("The queue is empty.");
    } else {
        for (i, track) in tracks.iter().take(QUEUE_PAGE).enumerate() {
            description.push_str(&format!(
                "**{}.** [{}]({}) `{}`\n",
                i + 1,
                track.title,
                track.url,
                track.duration()
            ));
        }
        if tracks.len() > QUEUE_PAGE {
            description.push_str(&format!("… and {} more", tracks.len() - QUEUE_PAGE));
        }
    }

    CreateEmbed::new()
        .title("📋 Queue")
        .description(description)
        .color(BLUE)
        .footer(CreateEmbedFooter::new(format!(
            "Bot #{identity} • {} tracks queued",
            tracks.len()
        )))
}

pub fn error(identity: u8, message: &str) -> CreateEmbed {
    base(identity, "❌ Error", RED).description(message)
}

pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 50), "short");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("한국어제목입니다", 5), "한국...");
    }
}
