use crate::cache::{RequestKey, ResponseCache};
use crate::error::Result;
use crate::transport::{Endpoint, QueryParam, Transport};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Data API client shared by the channel resolver and the catalog fetcher.
///
/// Requests are issued one at a time, in call order. When a cache is
/// attached, a request whose exact parameter tuple was already answered is
/// served from it and never reaches the transport.
pub struct YouTubeClient {
    transport: Arc<dyn Transport>,
    api_key: String,
    cache: Option<Arc<ResponseCache>>,
    requests_issued: AtomicUsize,
}

impl YouTubeClient {
    pub fn with_transport(transport: Arc<dyn Transport>, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            cache: None,
            requests_issued: AtomicUsize::new(0),
        }
    }

    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&Arc<ResponseCache>> {
        self.cache.as_ref()
    }

    /// Number of requests that went out over the transport.
    pub fn requests_issued(&self) -> usize {
        self.requests_issued.load(Ordering::Relaxed)
    }

    pub(crate) async fn request(&self, endpoint: Endpoint, mut params: Vec<QueryParam>) -> Result<Value> {
        params.push(("key", self.api_key.clone()));

        let key = self
            .cache
            .as_ref()
            .map(|_| RequestKey::new(endpoint, &params));

        if let (Some(cache), Some(key)) = (&self.cache, &key)
            && let Some(hit) = cache.get(key)
        {
            debug!("Cache hit for {}", endpoint.path());
            return Ok(hit);
        }

        self.requests_issued.fetch_add(1, Ordering::Relaxed);

        let body = self.transport.get(endpoint, &params).await?;

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.insert(key, body.clone());
        }

        Ok(body)
    }
}
