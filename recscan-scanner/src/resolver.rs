use crate::client::YouTubeClient;
use crate::error::Result;
use tracing::{debug, info, warn};
use url::Url;

const SHORT_LINK_HOST: &str = "youtu.be";

/// Pull the video id out of a watch URL (`?v=<id>`) or a `youtu.be/<id>`
/// short link. Purely syntactic.
pub fn extract_video_id(video_url: &str) -> Option<String> {
    let parsed = Url::parse(video_url).ok()?;

    if let Some((_, id)) = parsed
        .query_pairs()
        .find(|(name, value)| name == "v" && !value.is_empty())
    {
        return Some(id.into_owned());
    }

    if parsed.host_str() == Some(SHORT_LINK_HOST) {
        return parsed
            .path_segments()?
            .next()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string);
    }

    None
}

impl YouTubeClient {
    /// Find the channel that owns the video behind `video_url`.
    ///
    /// `None` without touching the network when no video id can be read
    /// from the URL, and `None` when the API knows no such video.
    pub async fn resolve_channel(&self, video_url: &str) -> Result<Option<String>> {
        let Some(video_id) = extract_video_id(video_url) else {
            warn!("No video id in {}", video_url);
            return Ok(None);
        };
        debug!("Resolved video id {} from {}", video_id, video_url);

        let channel_id = self
            .fetch_video(&video_id)
            .await?
            .and_then(|item| item.channel_id().map(str::to_string));

        match channel_id {
            Some(ref id) => info!("Video {} belongs to channel {}", video_id, id),
            None => warn!("Video {} not found or has no channel", video_id),
        }
        Ok(channel_id)
    }
}
