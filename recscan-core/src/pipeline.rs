use crate::classify::{Category, classify};
use crate::extract::{ExtractionReport, extract_with_report};
use indicatif::{ProgressBar, ProgressStyle};
use recscan_scanner::{Result, Video, YouTubeClient};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Options for configuring a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub show_progress_bars: bool,
}

/// Callback for reporting pipeline progress
pub type PipelineProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// A resource link found in one video's description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub video_title: String,
    pub video_link: String,
    pub resource_title: String,
    pub resource_link: String,
    pub category: Category,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub videos_scanned: usize,
    pub descriptions_with_section: usize,
    pub resources_found: usize,
    pub skipped_entries: usize,
    /// Playlist items with no video id (deleted or private uploads).
    #[serde(default)]
    pub skipped_playlist_items: usize,
    pub requests_issued: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub channel_id: String,
    pub playlist_id: String,
    pub videos: Vec<Video>,
    pub resources: Vec<ResourceRecord>,
    pub stats: PipelineStats,
    /// Categories kept by [`retain_categories`](Self::retain_categories);
    /// empty when no filter was applied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category_filter: Vec<Category>,
}

/// Resources of one category, as shown on one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub records: Vec<&'a ResourceRecord>,
}

impl PipelineOutput {
    pub fn by_category(&self) -> Vec<CategoryGroup<'_>> {
        group_by_category(&self.resources)
    }

    /// Keep only the resources filed under one of `categories`.
    pub fn retain_categories(&mut self, categories: &[Category]) {
        self.resources.retain(|r| categories.contains(&r.category));
        self.stats.resources_found = self.resources.len();
        self.category_filter = categories.to_vec();
    }

    pub fn is_filtered(&self) -> bool {
        !self.category_filter.is_empty()
    }
}

/// Group records by category, groups ordered by category name and records
/// kept in their original order.
pub fn group_by_category(records: &[ResourceRecord]) -> Vec<CategoryGroup<'_>> {
    let mut by_name: BTreeMap<&'static str, CategoryGroup<'_>> = BTreeMap::new();

    for record in records {
        by_name
            .entry(record.category.as_str())
            .or_insert_with(|| CategoryGroup {
                category: record.category,
                records: Vec::new(),
            })
            .records
            .push(record);
    }

    by_name.into_values().collect()
}

/// Extract and classify the resources listed in one video's description.
pub fn build_records(video: &Video, description: &str) -> (Vec<ResourceRecord>, ExtractionReport) {
    let report = extract_with_report(description);
    let records = report
        .entries
        .iter()
        .map(|entry| ResourceRecord {
            video_title: video.title.clone(),
            video_link: video.link.clone(),
            resource_title: entry.title.clone(),
            resource_link: entry.link.clone(),
            category: classify(&entry.link, &entry.title),
        })
        .collect();
    (records, report)
}

/// Run the full catalog scan for `channel_id`.
///
/// Returns `Ok(None)` when the channel has no uploads playlist. Requests go
/// out strictly one after another; transport failures abort the run.
pub async fn execute_pipeline(
    client: &YouTubeClient,
    channel_id: &str,
    options: &PipelineOptions,
    progress_callback: Option<PipelineProgressCallback>,
) -> Result<Option<PipelineOutput>> {
    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Looking up uploads playlist...");
        Some(pb)
    } else {
        None
    };

    let update = |msg: String| {
        if let Some(ref pb) = progress_bar {
            pb.set_message(msg.clone());
        }
        if let Some(ref callback) = progress_callback {
            callback(msg);
        }
    };

    let result = scan_channel(client, channel_id, &update).await;

    if let Some(ref pb) = progress_bar {
        match result {
            Ok(Some(ref output)) => pb.finish_with_message(format!(
                "Scan complete! {} videos, {} resources",
                output.stats.videos_scanned, output.stats.resources_found
            )),
            _ => pb.finish_and_clear(),
        }
    }

    result
}

async fn scan_channel(
    client: &YouTubeClient,
    channel_id: &str,
    update: &dyn Fn(String),
) -> Result<Option<PipelineOutput>> {
    let requests_before = client.requests_issued();

    let Some(playlist_id) = client.fetch_uploads(channel_id).await? else {
        warn!("Channel {} has no uploads playlist", channel_id);
        return Ok(None);
    };

    update(format!("Listing videos in {}...", playlist_id));
    let listing = client.list_playlist(&playlist_id).await?;
    let videos = listing.videos;
    info!("Scanning {} video descriptions", videos.len());

    let mut resources = Vec::new();
    let mut stats = PipelineStats {
        skipped_playlist_items: listing.skipped_items,
        ..PipelineStats::default()
    };

    for (idx, video) in videos.iter().enumerate() {
        update(format!(
            "Scanning description {}/{}: {}",
            idx + 1,
            videos.len(),
            video.title
        ));

        let description = client.fetch_description(&video.video_id).await?;
        let (records, extraction) = build_records(video, &description);

        stats.videos_scanned += 1;
        if extraction.has_section {
            stats.descriptions_with_section += 1;
        }
        stats.skipped_entries += extraction.skipped_entries;
        resources.extend(records);
    }

    stats.resources_found = resources.len();
    stats.requests_issued = client.requests_issued() - requests_before;

    if stats.skipped_entries > 0 {
        warn!(
            "{} numbered entr{} did not match the resource format and were skipped",
            stats.skipped_entries,
            if stats.skipped_entries == 1 { "y" } else { "ies" }
        );
    }
    info!(
        "Pipeline finished for {}: {} videos, {} resources, {} requests",
        channel_id, stats.videos_scanned, stats.resources_found, stats.requests_issued
    );

    Ok(Some(PipelineOutput {
        channel_id: channel_id.to_string(),
        playlist_id,
        videos,
        resources,
        stats,
        category_filter: Vec::new(),
    }))
}
