use crate::CLAP_STYLING;
use clap::{ArgGroup, arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("recscan")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("recscan")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Log request and pagination details to stderr")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Writes a default recscan config file")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Directory to store config.toml in")
                        .default_value("~/.config/recscan/"),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Overwrite an existing config file without asking")
                        .required(false),
                ),
        )
        .subcommand(
            command!("run")
                .about(
                    "Scan every upload of a channel and collect the resources listed under \
                'USEFUL RESOURCES:' in each description",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("Any video URL of the channel (watch?v=... or youtu.be/...)"),
                )
                .arg(
                    arg!(--"channel-id" <ID>)
                        .required(false)
                        .help("Channel id to scan directly, skipping the video lookup"),
                )
                .group(
                    ArgGroup::new("target")
                        .args(["url", "channel-id"])
                        .required(true),
                )
                .arg(
                    arg!(-k --"api-key" <KEY>)
                        .required(false)
                        .help("YouTube Data API key (default: $YOUTUBE_API_KEY or config file)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv, markdown (default: config file or text)")
                        .value_parser(["text", "json", "csv", "markdown", "md"]),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"category" <NAME>)
                        .required(false)
                        .help("Only report resources in this category (repeatable)")
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(--"no-cache")
                        .required(false)
                        .help("Send every request even when an identical one was already answered")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            command!("resolve")
                .about("Print the channel id that uploaded a video")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The video URL to resolve"),
                )
                .arg(
                    arg!(-k --"api-key" <KEY>)
                        .required(false)
                        .help("YouTube Data API key (default: $YOUTUBE_API_KEY or config file)"),
                ),
        )
        .subcommand(
            command!("extract")
                .about("Extract and classify resources from a description file, without any network access")
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(false)
                        .help("Description text file (default: read stdin)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text or json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
}
