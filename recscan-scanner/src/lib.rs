pub mod api;
pub mod cache;
pub mod catalog;
pub mod client;
pub mod error;
pub mod resolver;
pub mod transport;
pub mod video;

pub use cache::ResponseCache;
pub use catalog::PlaylistListing;
pub use client::YouTubeClient;
pub use error::{Result, ScanError};
pub use resolver::extract_video_id;
pub use transport::{DEFAULT_API_BASE, Endpoint, HttpTransport, QueryParam, Transport};
pub use video::Video;
