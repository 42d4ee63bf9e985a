//! Typed views of the Data API responses the scanner reads.
//!
//! Every nested key is optional: a missing key means the resource is not
//! there (the callers turn that into `None`), while a key with the wrong
//! JSON type fails decoding with [`ScanError::MalformedResponse`].

use crate::error::{Result, ScanError};
use crate::transport::Endpoint;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub items: Option<Vec<T>>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

impl<T> ListResponse<T> {
    pub fn first(&self) -> Option<&T> {
        self.items.as_ref().and_then(|items| items.first())
    }

    pub fn into_items(self) -> Vec<T> {
        self.items.unwrap_or_default()
    }

    /// The continuation cursor, treating an empty token as end of listing.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_page_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct ChannelItem {
    #[serde(rename = "contentDetails")]
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelContentDetails {
    #[serde(rename = "relatedPlaylists")]
    pub related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

impl ChannelItem {
    pub fn uploads_playlist(&self) -> Option<&str> {
        self.content_details
            .as_ref()?
            .related_playlists
            .as_ref()?
            .uploads
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    pub snippet: Option<PlaylistItemSnippet>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItemSnippet {
    pub title: Option<String>,
    #[serde(rename = "resourceId")]
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

impl PlaylistItem {
    pub fn video_id(&self) -> Option<&str> {
        self.snippet
            .as_ref()?
            .resource_id
            .as_ref()?
            .video_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    pub fn title(&self) -> &str {
        self.snippet
            .as_ref()
            .and_then(|s| s.title.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
pub struct VideoItem {
    pub snippet: Option<VideoSnippet>,
}

#[derive(Debug, Deserialize)]
pub struct VideoSnippet {
    pub description: Option<String>,
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
}

impl VideoItem {
    pub fn channel_id(&self) -> Option<&str> {
        self.snippet
            .as_ref()?
            .channel_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.snippet.as_ref()?.description.as_deref()
    }
}

pub type ChannelListResponse = ListResponse<ChannelItem>;
pub type PlaylistItemListResponse = ListResponse<PlaylistItem>;
pub type VideoListResponse = ListResponse<VideoItem>;

pub fn decode<T: DeserializeOwned>(endpoint: Endpoint, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|source| ScanError::MalformedResponse {
        endpoint: endpoint.path(),
        source,
    })
}
