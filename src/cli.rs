use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "xray-rs",
    version,
    about = "Run the xray community web scanner and collect a normalized report"
)]
pub struct Args {
    /// Candidate xray executable, tried in the order given (repeatable)
    #[clap(long = "xray-path", value_name = "PATH")]
    pub xray_paths: Vec<PathBuf>,

    /// YAML file with search_path, config_path and cache_dir
    #[clap(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// xray config file passed through as --config
    #[clap(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for scratch files
    #[clap(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Target URL (repeatable)
    #[clap(short, long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// File with one target URL per line
    #[clap(long, value_name = "FILE")]
    pub url_file: Option<PathBuf>,

    /// Crawl each target with xray's basic crawler instead of a batched url file
    #[clap(long)]
    pub crawler: bool,

    /// Extra xray webscan flags, shell-quoted (e.g. "--plugins sqldet,xss")
    #[clap(short, long, default_value = "", allow_hyphen_values = true)]
    pub args: String,

    /// Per-run timeout in seconds, 0 waits forever
    #[clap(short, long, default_value = "0")]
    pub timeout: u64,

    /// Write the report to this file
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Report format (json, txt)
    #[clap(long, default_value = "json")]
    pub output_format: String,

    /// Log file
    #[clap(long)]
    pub log_file: Option<PathBuf>,

    /// Verbose output
    #[clap(short, long)]
    pub verbose: bool,

    /// Silent mode (no banner, errors only)
    #[clap(short, long)]
    pub silent: bool,
}
