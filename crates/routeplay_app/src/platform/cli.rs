use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use routeplay_logging::LogDestination;

use super::config::FramingSetting;

#[derive(Debug, Parser)]
#[command(
    name = "routeplay",
    version,
    about = "Run a route optimization job, follow its progress and replay the result"
)]
pub struct Cli {
    /// Route file to upload. Takes precedence over --sample.
    #[arg(long, conflicts_with = "sample")]
    pub file: Option<PathBuf>,

    /// Identifier of a sample file already on the server.
    #[arg(long)]
    pub sample: Option<String>,

    /// Base url of the optimization server.
    #[arg(long)]
    pub server: Option<String>,

    /// RON configuration file; missing files fall back to defaults.
    #[arg(long, default_value = "routeplay.ron")]
    pub config: PathBuf,

    /// Save the result files into this directory after completion.
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub framing: Option<FramingArg>,

    #[arg(long, value_enum, default_value_t = LogArg::Terminal)]
    pub log: LogArg,

    /// Log debug output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the effective configuration as RON and exit.
    #[arg(long)]
    pub print_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FramingArg {
    Buffered,
    PerChunk,
}

impl From<FramingArg> for FramingSetting {
    fn from(arg: FramingArg) -> Self {
        match arg {
            FramingArg::Buffered => FramingSetting::Buffered,
            FramingArg::PerChunk => FramingSetting::PerChunk,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
