use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "scan_app")]
#[command(about = "Upload a scan for analysis and download the health report", long_about = None)]
#[command(version)]
pub struct Cli {
    /// RON configuration file (defaults to ./scan.ron when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the analysis server.
    #[arg(long)]
    pub server: Option<String>,

    /// Directory that receives downloaded reports.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Cancel a running analysis when a new one is submitted.
    #[arg(long)]
    pub supersede: bool,

    /// Log destination: terminal, file or both.
    #[arg(long, default_value = "file")]
    pub log: String,

    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Image to select on startup.
    #[arg(long)]
    pub image: Option<PathBuf>,
}
