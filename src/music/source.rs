use reqwest::Url;
use serde::Deserialize;
use tokio::process::Command;

use super::{Requester, Track};

const YOUTUBE_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtu.be",
];

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no results found")]
    NoResults,
    #[error("could not run yt-dlp: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("yt-dlp failed: {0}")]
    Extractor(String),
    #[error("unreadable yt-dlp output: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct YtDlpOutput {
    title: Option<String>,
    duration: Option<f64>,
    webpage_url: Option<String>,
    original_url: Option<String>,
    thumbnail: Option<String>,
}

/// True when `query` is a video URL that can be handed to the extractor as-is.
pub fn is_direct_locator(query: &str) -> bool {
    Url::parse(query.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| YOUTUBE_HOSTS.contains(&host.as_str()))
}

fn extractor_target(query: &str) -> String {
    let query = query.trim();
    if is_direct_locator(query) {
        query.to_string()
    } else {
        format!("ytsearch1:{query}")
    }
}

pub async fn resolve(query: &str, requester: Requester) -> Result<Track, ResolveError> {
    let target = extractor_target(query);

    let output = Command::new("yt-dlp")
        .args([
            "-j",
            "-f",
            "bestaudio",
            "--no-playlist",
            "--no-warnings",
            &target,
        ])
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ResolveError::Extractor(stderr.trim().to_string()));
    }

    parse_output(query, &output.stdout, requester)
}

/// Builds a track from `yt-dlp -j` output. A search with no hit prints nothing.
pub fn parse_output(
    query: &str,
    stdout: &[u8],
    requester: Requester,
) -> Result<Track, ResolveError> {
    let first_line = stdout
        .split(|b| *b == b'\n')
        .find(|line| !line.iter().all(u8::is_ascii_whitespace))
        .ok_or(ResolveError::NoResults)?;

    let info: YtDlpOutput = serde_json::from_slice(first_line)?;

    let url = info
        .webpage_url
        .or(info.original_url)
        .unwrap_or_else(|| query.trim().to_string());

    Ok(Track {
        title: info.title.unwrap_or_else(|| "Unknown title".to_string()),
        url,
        duration_secs: info.duration.filter(|d| *d >= 0.0).map(|d| d as u64),
        requester,
        thumbnail: info.thumbnail,
    })
}
