use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use recscan_core::config::{self, Settings};
use recscan_core::report::{self, ReportFormat};
use recscan_core::{Category, PipelineOptions, PipelineOutput, classify, execute_pipeline, extract};
use recscan_scanner::{HttpTransport, ResponseCache, YouTubeClient, extract_video_id};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_NOT_FOUND: i32 = 2;

/// What the user asked `run` to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    VideoUrl(String),
    ChannelId(String),
}

#[derive(Debug)]
pub enum ScanOutcome {
    Found(PipelineOutput),
    /// The URL carries no recognizable video id.
    NoVideoId,
    /// The video does not exist or has no channel.
    ChannelNotFound,
    /// The channel does not exist or has no uploads playlist.
    NoUploads(String),
}

impl ScanOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            ScanOutcome::Found(_) => EXIT_SUCCESS,
            _ => EXIT_NOT_FOUND,
        }
    }
}

// Helper functions

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "recscan=debug,recscan_core=debug,recscan_scanner=debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // A second call (tests) leaves the first subscriber in place.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Layer config file, environment and the `--api-key` flag, in that order.
pub fn resolve_settings<F>(config_path: &Path, api_key_flag: Option<&str>, lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::load(config_path)?;
    settings.apply_env(lookup);
    if let Some(key) = api_key_flag {
        settings.api_key = Some(key.to_string());
    }
    Ok(settings)
}

pub fn build_client(settings: &Settings, use_cache: bool) -> Result<YouTubeClient> {
    let api_key = settings.require_api_key()?;
    let transport = HttpTransport::with_timeout(&settings.api_base, settings.timeout_secs)
        .with_context(|| format!("Cannot use API base {}", settings.api_base))?;

    let client = YouTubeClient::with_transport(Arc::new(transport), api_key);
    Ok(if use_cache {
        client.with_cache(Arc::new(ResponseCache::new()))
    } else {
        client
    })
}

pub fn parse_categories(names: &[String]) -> Result<Vec<Category>> {
    names
        .iter()
        .map(|name| {
            Category::from_str(name).ok_or_else(|| {
                let known: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
                anyhow!("Unknown category '{}' (expected one of: {})", name, known.join(", "))
            })
        })
        .collect()
}

pub fn parse_report_format(name: &str) -> Result<ReportFormat> {
    ReportFormat::from_str(name)
        .ok_or_else(|| anyhow!("Unknown report format '{}' (expected text, json, csv or markdown)", name))
}

/// Resolve the target to a channel and run the catalog pipeline over it.
pub async fn scan_target(
    client: &YouTubeClient,
    target: &ScanTarget,
    show_progress: bool,
) -> Result<ScanOutcome> {
    let channel_id = match target {
        ScanTarget::ChannelId(id) => id.clone(),
        ScanTarget::VideoUrl(url) => {
            if extract_video_id(url).is_none() {
                return Ok(ScanOutcome::NoVideoId);
            }
            match client.resolve_channel(url).await? {
                Some(id) => id,
                None => return Ok(ScanOutcome::ChannelNotFound),
            }
        }
    };
    debug!("Scanning channel {}", channel_id);

    let options = PipelineOptions {
        show_progress_bars: show_progress,
    };
    Ok(match execute_pipeline(client, &channel_id, &options, None).await? {
        Some(output) => ScanOutcome::Found(output),
        None => ScanOutcome::NoUploads(channel_id),
    })
}

/// Description text from `input`, or all of stdin when `None`.
pub fn read_description(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read description file {}", path.display())),
        None => io::read_to_string(io::stdin()).context("Failed to read description from stdin"),
    }
}

/// Extractor and classifier output for one description, as `extract` prints it.
pub fn format_extracted(description: &str, json: bool) -> serde_json::Result<String> {
    let entries = extract(description);

    if json {
        let rows: Vec<serde_json::Value> = entries
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "title": entry.title,
                    "link": entry.link,
                    "category": classify(&entry.link, &entry.title),
                })
            })
            .collect();
        return serde_json::to_string_pretty(&rows);
    }

    if entries.is_empty() {
        return Ok(format!("{}\n", report::EMPTY_STATE));
    }
    let mut out = String::new();
    for entry in &entries {
        out.push_str(&format!(
            "[{}] {} : {}\n",
            classify(&entry.link, &entry.title),
            entry.title,
            entry.link
        ));
    }
    Ok(out)
}

pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
    }
    fs::write(path, config::DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config file {}", path.display()))
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> String {
    print!("{} ", msg.bright_cyan().bold());
    let _ = io::stdout().flush();
    let mut response = String::new();
    if io::stdin().read_line(&mut response).is_err() {
        return String::new();
    }
    response.trim().to_lowercase()
}

fn print_error(context: &str, err: &anyhow::Error) {
    eprintln!("{} {}: {:#}", "✗".red().bold(), context, err);
}

fn load_settings(args: &ArgMatches) -> Result<Settings> {
    let api_key = args.get_one::<String>("api-key").map(String::as_str);
    resolve_settings(&config::default_config_path(), api_key, |name| {
        std::env::var(name).ok()
    })
}

// Command handlers

pub fn handle_init(args: &ArgMatches) -> i32 {
    print_divider();
    println!("{}", "  RECSCAN INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let dir = args
        .get_one::<String>("PATH")
        .map(String::as_str)
        .unwrap_or(config::DEFAULT_CONFIG_DIR);
    let force = args.get_flag("force");
    let config_path = config::config_path_in(dir);

    println!(
        "{} Target: {}",
        "→".blue(),
        config_path.display().to_string().bright_white()
    );
    println!();

    if config_path.exists() && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!("A config file already exists:");
        println!(
            "  {} {}",
            "•".yellow(),
            config_path.display().to_string().bright_white()
        );
        println!();

        let response = print_prompt("Overwrite it with the defaults? [y/N]:");
        println!();

        if response != "y" && response != "yes" {
            println!("{} Initialization cancelled.", "✗".red().bold());
            return EXIT_SUCCESS;
        }
        println!("{} Proceeding with overwrite", "→".yellow().bold());
        println!();
    }

    if let Err(e) = write_default_config(&config_path) {
        print_error("Initialization failed", &e);
        return EXIT_FAILURE;
    }

    print_divider();
    println!("{}", "  INITIALIZATION COMPLETE".green().bold());
    print_divider();
    println!();
    println!(
        "{} Config file: {}",
        "✓".green().bold(),
        config_path.display().to_string().bright_white()
    );
    println!(
        "{} Set api_key there or export {}",
        "ℹ".blue(),
        config::API_KEY_ENV.bright_white()
    );
    println!();
    EXIT_SUCCESS
}

pub async fn handle_run(args: &ArgMatches, quiet: bool) -> i32 {
    match run(args, quiet).await {
        Ok(code) => code,
        Err(e) => {
            print_error("Scan failed", &e);
            EXIT_FAILURE
        }
    }
}

async fn run(args: &ArgMatches, quiet: bool) -> Result<i32> {
    let mut settings = load_settings(args)?;
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        settings.timeout_secs = Some(*timeout);
    }

    let format_name = args
        .get_one::<String>("format")
        .cloned()
        .unwrap_or_else(|| settings.format.clone());
    let format = parse_report_format(&format_name)?;

    let category_names: Vec<String> = args
        .get_many::<String>("category")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let categories = parse_categories(&category_names)?;

    let use_cache = settings.cache && !args.get_flag("no-cache");
    let client = build_client(&settings, use_cache)?;

    let target = match (
        args.get_one::<String>("url"),
        args.get_one::<String>("channel-id"),
    ) {
        (Some(url), _) => ScanTarget::VideoUrl(url.clone()),
        (None, Some(id)) => ScanTarget::ChannelId(id.clone()),
        (None, None) => return Err(anyhow!("Either --url or --channel-id must be provided")),
    };

    if !quiet {
        let shown = match &target {
            ScanTarget::VideoUrl(url) => url,
            ScanTarget::ChannelId(id) => id,
        };
        eprintln!("\n{} Scanning {}", "▶".bright_cyan(), shown.bright_white());
        eprintln!("API base: {}", settings.api_base);
        eprintln!("Response cache: {}\n", if use_cache { "on" } else { "off" });
    }

    let outcome = scan_target(&client, &target, !quiet).await?;
    let code = outcome.exit_code();

    let mut output = match outcome {
        ScanOutcome::Found(output) => output,
        ScanOutcome::NoVideoId => {
            eprintln!("{} No video id found in the URL", "✗".red().bold());
            return Ok(code);
        }
        ScanOutcome::ChannelNotFound => {
            eprintln!("{} Video not found or has no channel", "✗".red().bold());
            return Ok(code);
        }
        ScanOutcome::NoUploads(channel_id) => {
            eprintln!(
                "{} Channel {} not found or has no uploads playlist",
                "✗".red().bold(),
                channel_id
            );
            return Ok(code);
        }
    };

    if !categories.is_empty() {
        output.retain_categories(&categories);
    }
    if let Some(cache) = client.cache() {
        debug!(
            "Response cache: {} entries, {} hits, {} misses",
            cache.len(),
            cache.hits(),
            cache.misses()
        );
    }

    let rendered = report::render_report(&output, format).context("Failed to render report")?;

    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            report::save_report(&rendered, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !quiet {
                eprintln!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", rendered),
    }

    Ok(code)
}

pub async fn handle_resolve(args: &ArgMatches) -> i32 {
    match resolve(args).await {
        Ok(code) => code,
        Err(e) => {
            print_error("Resolve failed", &e);
            EXIT_FAILURE
        }
    }
}

async fn resolve(args: &ArgMatches) -> Result<i32> {
    let settings = load_settings(args)?;
    let client = build_client(&settings, false)?;
    let url = args
        .get_one::<String>("url")
        .ok_or_else(|| anyhow!("--url is required"))?;

    if extract_video_id(url).is_none() {
        eprintln!("{} No video id found in {}", "✗".red().bold(), url);
        return Ok(EXIT_NOT_FOUND);
    }

    match client.resolve_channel(url).await? {
        Some(channel_id) => {
            println!("{}", channel_id);
            Ok(EXIT_SUCCESS)
        }
        None => {
            eprintln!("{} Video not found or has no channel", "✗".red().bold());
            Ok(EXIT_NOT_FOUND)
        }
    }
}

pub fn handle_extract(args: &ArgMatches) -> i32 {
    let input = args.get_one::<PathBuf>("input").map(PathBuf::as_path);
    let json = args.get_one::<String>("format").map(String::as_str) == Some("json");

    let result = read_description(input).and_then(|description| {
        format_extracted(&description, json).context("Failed to render entries")
    });

    match result {
        Ok(text) => {
            print!("{}", text);
            EXIT_SUCCESS
        }
        Err(e) => {
            print_error("Extract failed", &e);
            EXIT_FAILURE
        }
    }
}
