use crate::error::{Result, ScanError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Instant;
use tracing::debug;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// The three Data API resources the scanner reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Channels,
    PlaylistItems,
    Videos,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Channels => "channels",
            Endpoint::PlaylistItems => "playlistItems",
            Endpoint::Videos => "videos",
        }
    }
}

/// A single query parameter as sent on the wire.
pub type QueryParam = (&'static str, String);

/// Black-box request/response function the client is built on.
///
/// Implementations return the decoded JSON body of a successful response and
/// map everything else (network failure, non-2xx status, undecodable body)
/// to a [`ScanError`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, endpoint: Endpoint, params: &[QueryParam]) -> Result<Value>;
}

pub struct HttpTransport {
    client: Client,
    api_base: String,
}

impl HttpTransport {
    pub fn new(api_base: &str) -> Result<Self> {
        Self::with_timeout(api_base, None)
    }

    /// `None` keeps reqwest's default of no overall request timeout.
    pub fn with_timeout(api_base: &str, timeout_secs: Option<u64>) -> Result<Self> {
        // Validate once up front so every request can assume a usable base.
        Url::parse(api_base)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", api_base, e)))?;

        let mut builder = Client::builder()
            .user_agent("recscan/0.1 (https://github.com/trapdoorsec/recscan)")
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .tcp_keepalive(std::time::Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5));

        if let Some(secs) = timeout_secs {
            builder = builder
                .timeout(std::time::Duration::from_secs(secs))
                .connect_timeout(std::time::Duration::from_secs(secs.div_ceil(2)));
        }

        Ok(Self {
            client: builder.build()?,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url> {
        let raw = format!("{}/{}", self.api_base, endpoint.path());
        Url::parse(&raw).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", raw, e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, endpoint: Endpoint, params: &[QueryParam]) -> Result<Value> {
        let url = self.endpoint_url(endpoint)?;
        debug!("GET {} ({} params)", url, params.len());

        let start = Instant::now();
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(
            "{} answered {} in {:?}",
            endpoint.path(),
            status.as_u16(),
            start.elapsed()
        );

        if !status.is_success() {
            return Err(ScanError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ScanError::MalformedResponse {
            endpoint: endpoint.path(),
            source,
        })
    }
}
