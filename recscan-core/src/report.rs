// Report generation from pipeline output

use crate::classify::Category;
use crate::pipeline::PipelineOutput;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const MAX_CELL_WIDTH: usize = 60;
pub const EMPTY_STATE: &str = "No resources found in the video descriptions.";
pub const FILTERED_EMPTY_STATE: &str = "No resources matched the selected categories.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

pub fn render_report(output: &PipelineOutput, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(output)),
        ReportFormat::Json => generate_json_report(output),
        ReportFormat::Csv => Ok(generate_csv_report(output)),
        ReportFormat::Markdown => Ok(generate_markdown_report(output)),
    }
}

/// Resource count per category, in precedence order, zero counts omitted.
pub fn category_counts(output: &PipelineOutput) -> Vec<(Category, usize)> {
    Category::ALL
        .iter()
        .map(|&category| {
            let count = output
                .resources
                .iter()
                .filter(|r| r.category == category)
                .count();
            (category, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Line shown in place of the resource tables when there is nothing to list.
pub fn empty_state(output: &PipelineOutput) -> &'static str {
    if output.is_filtered() {
        FILTERED_EMPTY_STATE
    } else {
        EMPTY_STATE
    }
}

fn filter_names(output: &PipelineOutput) -> String {
    output
        .category_filter
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn generate_text_report(output: &PipelineOutput) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push('\n');
    report.push_str("                        RECSCAN CHANNEL RESOURCE REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("Channel:      {}\n", output.channel_id));
    report.push_str(&format!("Playlist:     {}\n", output.playlist_id));
    report.push_str(&format!("Generated:    {}\n", generated_at()));
    if output.is_filtered() {
        report.push_str(&format!("Filter:       {}\n", filter_names(output)));
    }
    report.push('\n');

    section_header(&mut report, "SUMMARY");
    report.push_str(&format!("Videos:           {}\n", output.videos.len()));
    report.push_str(&format!("Resources:        {}\n", output.resources.len()));
    for (category, count) in category_counts(output) {
        report.push_str(&format!("  [{}] {}\n", category, count));
    }
    if output.stats.skipped_entries > 0 {
        report.push_str(&format!(
            "Skipped entries:  {}  (numbered lines not in '<n>. <title> : <url>' form)\n",
            output.stats.skipped_entries
        ));
    }
    if output.stats.skipped_playlist_items > 0 {
        report.push_str(&format!(
            "Skipped videos:   {}  (playlist items without a video id)\n",
            output.stats.skipped_playlist_items
        ));
    }
    report.push_str(&format!("API requests:     {}\n", output.stats.requests_issued));
    report.push('\n');

    section_header(&mut report, "VIDEOS");
    let video_rows: Vec<Vec<String>> = output
        .videos
        .iter()
        .map(|v| vec![v.title.clone(), v.video_id.clone(), v.link.clone()])
        .collect();
    report.push_str(&format_table(&["Title", "Video ID", "Link"], &video_rows));
    report.push('\n');

    section_header(&mut report, "RESOURCES");
    let groups = output.by_category();
    if groups.is_empty() {
        report.push_str(empty_state(output));
        report.push_str("\n\n");
    }
    for group in groups {
        report.push_str(&format!("{} Resources ({})\n", group.category, group.records.len()));
        report.push_str(&"─".repeat(80));
        report.push('\n');
        let rows: Vec<Vec<String>> = group
            .records
            .iter()
            .map(|r| {
                vec![
                    r.video_title.clone(),
                    r.video_link.clone(),
                    r.resource_title.clone(),
                    r.resource_link.clone(),
                ]
            })
            .collect();
        report.push_str(&format_table(
            &["Video", "Video Link", "Resource", "Link"],
            &rows,
        ));
        report.push('\n');
    }

    report.push_str(RULE);
    report.push('\n');
    report.push_str("                          End of Report\n");
    report.push_str(RULE);
    report.push('\n');

    report
}

pub fn generate_json_report(output: &PipelineOutput) -> Result<String, serde_json::Error> {
    let categories: serde_json::Map<String, serde_json::Value> = output
        .by_category()
        .into_iter()
        .map(|group| {
            (
                group.category.to_string(),
                serde_json::json!(group.records),
            )
        })
        .collect();

    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "recscan",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": generated_at(),
                "format": "json"
            },
            "channel": {
                "id": output.channel_id,
                "uploads_playlist": output.playlist_id
            },
            "summary": {
                "total_videos": output.videos.len(),
                "total_resources": output.resources.len(),
                "stats": output.stats,
                "category_filter": output.category_filter,
                "category_breakdown": category_counts(output)
                    .into_iter()
                    .map(|(category, count)| (category.to_string(), serde_json::json!(count)))
                    .collect::<serde_json::Map<_, _>>()
            },
            "videos": output.videos,
            "resources": output.resources,
            "categories": categories
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// The resource table, one row per record.
pub fn generate_csv_report(output: &PipelineOutput) -> String {
    let mut report = String::from("video_title,video_link,resource_title,resource_link,category\n");
    for r in &output.resources {
        let row = [
            r.video_title.as_str(),
            r.video_link.as_str(),
            r.resource_title.as_str(),
            r.resource_link.as_str(),
            r.category.as_str(),
        ]
        .map(csv_field)
        .join(",");
        report.push_str(&row);
        report.push('\n');
    }
    report
}

pub fn generate_markdown_report(output: &PipelineOutput) -> String {
    let mut report = String::new();

    report.push_str("# Channel Resource Report\n\n");
    report.push_str(&format!("- **Channel:** `{}`\n", output.channel_id));
    report.push_str(&format!("- **Uploads playlist:** `{}`\n", output.playlist_id));
    report.push_str(&format!("- **Generated:** {}\n", generated_at()));
    report.push_str(&format!("- **Videos:** {}\n", output.videos.len()));
    if output.is_filtered() {
        report.push_str(&format!("- **Filter:** {}\n", filter_names(output)));
    }
    report.push_str(&format!("- **Resources:** {}\n\n", output.resources.len()));

    report.push_str("## Videos\n\n");
    report.push_str("| Title | Video ID | Link |\n|---|---|---|\n");
    for v in &output.videos {
        report.push_str(&format!(
            "| {} | `{}` | {} |\n",
            md_cell(&v.title),
            v.video_id,
            md_cell(&v.link)
        ));
    }
    report.push('\n');

    report.push_str("## Resources\n\n");
    let groups = output.by_category();
    if groups.is_empty() {
        report.push_str(&format!("_{}_\n", empty_state(output)));
    }
    for group in groups {
        report.push_str(&format!("### {} ({})\n\n", group.category, group.records.len()));
        report.push_str("| Video | Resource | Link |\n|---|---|---|\n");
        for r in group.records {
            report.push_str(&format!(
                "| [{}]({}) | {} | {} |\n",
                md_cell(&r.video_title),
                md_cell(&r.video_link),
                md_cell(&r.resource_title),
                md_cell(&r.resource_link)
            ));
        }
        report.push('\n');
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

// Helper functions

fn generated_at() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn section_header(report: &mut String, title: &str) {
    report.push_str(RULE);
    report.push('\n');
    report.push_str(title);
    report.push('\n');
    report.push_str(RULE);
    report.push_str("\n\n");
}

fn truncate_cell(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        cell.to_string()
    } else {
        let mut cut: String = cell.chars().take(MAX_CELL_WIDTH - 1).collect();
        cut.push('…');
        cut
    }
}

fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| truncate_cell(c)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let render = |row: &[String]| -> String {
        let padded: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let pad = widths[i] - cell.chars().count();
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect();
        format!("  {}\n", padded.join("  ").trim_end())
    };

    let header_row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut table = render(&header_row);
    let underline: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    table.push_str(&render(&underline));
    for row in &cells {
        table.push_str(&render(row));
    }
    table
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn md_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
