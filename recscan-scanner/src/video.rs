use serde::{Deserialize, Serialize};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// One entry of a channel's upload history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub video_id: String,
    pub link: String,
}

impl Video {
    pub fn new(title: String, video_id: String) -> Self {
        let link = watch_link(&video_id);
        Self {
            title,
            video_id,
            link,
        }
    }
}

pub fn watch_link(video_id: &str) -> String {
    format!("{}{}", WATCH_URL, video_id)
}
