use std::path::PathBuf;

use clap::Parser;

/// Harvest the tag catalog of a JavaScript-rendered browse page into JSON.
#[derive(Debug, Parser)]
#[command(name = "tag-harvester", version, about)]
pub struct Cli {
    /// Catalog page to harvest
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Where to write the JSON artifact
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// RON configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Ceiling for the wait after each tag activation
    #[arg(long, value_name = "MS")]
    pub settle_timeout_ms: Option<u64>,

    /// Interval between counter polls
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Write the artifact on a single line
    #[arg(long)]
    pub compact: bool,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Chromium executable to launch
    #[arg(long, value_name = "PATH")]
    pub chrome: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}
