pub mod handlers;

pub use handlers::{
    EXIT_FAILURE, EXIT_NOT_FOUND, EXIT_SUCCESS, ScanOutcome, ScanTarget, build_client,
    format_extracted, init_logging, parse_categories, parse_report_format, read_description,
    resolve_settings, scan_target, write_default_config,
};
