pub mod classify;
pub mod config;
pub mod extract;
pub mod pipeline;
pub mod report;

use colored::Colorize;

pub use classify::{Category, classify};
pub use extract::{ExtractionReport, ResourceEntry, extract, extract_with_report};
pub use pipeline::{
    CategoryGroup, PipelineOptions, PipelineOutput, PipelineProgressCallback, PipelineStats,
    ResourceRecord, build_records, execute_pipeline, group_by_category,
};

const BANNER: &str = r#"
  ┬─┐┌─┐┌─┐┌─┐┌─┐┌─┐┌┐┌
  ├┬┘├┤ │  └─┐│  ├─┤│││
  ┴└─└─┘└─┘└─┘└─┘┴ ┴┘└┘
"#;

/// Writes to stderr; stdout is reserved for reports.
pub fn print_banner() {
    eprintln!("{}", BANNER.bright_cyan().bold());
    eprintln!(
        "  {} {}\n",
        "channel resource harvester".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}
