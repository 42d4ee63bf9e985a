use crate::api::{self, ChannelListResponse, PlaylistItemListResponse, VideoItem, VideoListResponse};
use crate::client::YouTubeClient;
use crate::error::Result;
use crate::transport::Endpoint;
use crate::video::Video;
use tracing::{debug, info, warn};

/// Largest page the playlistItems endpoint will hand out.
pub const PAGE_SIZE: u32 = 50;

/// Every video of a playlist, plus the count of items that had no video id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistListing {
    pub videos: Vec<Video>,
    pub skipped_items: usize,
}

impl YouTubeClient {
    /// Look up the playlist holding every upload of `channel_id`.
    ///
    /// `None` when the channel does not exist or the response carries no
    /// `contentDetails.relatedPlaylists.uploads`.
    pub async fn fetch_uploads(&self, channel_id: &str) -> Result<Option<String>> {
        let body = self
            .request(
                Endpoint::Channels,
                vec![
                    ("part", "contentDetails".to_string()),
                    ("id", channel_id.to_string()),
                ],
            )
            .await?;

        let response: ChannelListResponse = api::decode(Endpoint::Channels, body)?;
        let uploads = response
            .first()
            .and_then(|channel| channel.uploads_playlist())
            .map(str::to_string);

        if uploads.is_none() {
            warn!("No uploads playlist for channel {}", channel_id);
        }
        Ok(uploads)
    }

    /// Walk every page of `playlist_id` and collect its videos in order.
    ///
    /// Items without a video id are skipped.
    pub async fn list_videos(&self, playlist_id: &str) -> Result<Vec<Video>> {
        Ok(self.list_playlist(playlist_id).await?.videos)
    }

    /// Same walk as [`list_videos`](Self::list_videos), also reporting how
    /// many items were skipped for lacking a video id.
    pub async fn list_playlist(&self, playlist_id: &str) -> Result<PlaylistListing> {
        info!("Listing videos of playlist {}", playlist_id);

        let mut videos = Vec::new();
        let mut skipped = 0usize;
        let mut pages = 0usize;
        let mut cursor: Option<String> = None;

        loop {
            let mut params = vec![
                ("part", "snippet".to_string()),
                ("playlistId", playlist_id.to_string()),
                ("maxResults", PAGE_SIZE.to_string()),
            ];
            if let Some(ref token) = cursor {
                params.push(("pageToken", token.clone()));
            }

            let body = self.request(Endpoint::PlaylistItems, params).await?;
            let page: PlaylistItemListResponse = api::decode(Endpoint::PlaylistItems, body)?;
            pages += 1;

            let next = page.next_cursor().map(str::to_string);
            for item in page.into_items() {
                match item.video_id() {
                    Some(video_id) => {
                        videos.push(Video::new(item.title().to_string(), video_id.to_string()))
                    }
                    None => skipped += 1,
                }
            }
            debug!(
                "Page {} of {}: {} videos so far",
                pages,
                playlist_id,
                videos.len()
            );

            match next {
                Some(token) => cursor = Some(token),
                None => break,
            }
        }

        if skipped > 0 {
            warn!(
                "Skipped {} playlist item(s) without a video id in {}",
                skipped, playlist_id
            );
        }
        info!(
            "Playlist {} listed: {} videos across {} page(s)",
            playlist_id,
            videos.len(),
            pages
        );
        Ok(PlaylistListing {
            videos,
            skipped_items: skipped,
        })
    }

    /// Description text of `video_id`, empty when the video or field is absent.
    pub async fn fetch_description(&self, video_id: &str) -> Result<String> {
        let description = self
            .fetch_video(video_id)
            .await?
            .and_then(|item| item.description().map(str::to_string))
            .unwrap_or_default();
        Ok(description)
    }

    pub(crate) async fn fetch_video(&self, video_id: &str) -> Result<Option<VideoItem>> {
        let body = self
            .request(
                Endpoint::Videos,
                vec![
                    ("part", "snippet".to_string()),
                    ("id", video_id.to_string()),
                ],
            )
            .await?;

        let response: VideoListResponse = api::decode(Endpoint::Videos, body)?;
        Ok(response.into_items().into_iter().next())
    }
}
