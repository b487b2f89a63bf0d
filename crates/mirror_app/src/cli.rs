use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use mirror_logging::LogDestination;

use crate::config::Overrides;

/// Mirror the pages listed in a sitemap, with their stylesheets, images and fonts.
#[derive(Debug, Parser)]
#[command(name = "sitemirror", version)]
#[command(about = "Render sitemap pages in headless Chromium and save them locally", long_about = None)]
pub struct Cli {
    /// Sitemap to read: a file path or an http(s) URL.
    pub sitemap: String,

    /// Directory that receives one sub-directory per page.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Mirror at most N pages from the start of the sitemap.
    #[arg(short, long, value_name = "N")]
    pub limit: Option<usize>,

    /// RON configuration file; flags given here take precedence over it.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Chrome/Chromium executable to launch.
    #[arg(long, value_name = "PATH")]
    pub chrome: Option<PathBuf>,

    /// Seconds to wait for a page to load and go network idle.
    #[arg(long, value_name = "SECS")]
    pub navigation_timeout: Option<u64>,

    /// Count failed stylesheets as asset failures instead of failing the page.
    #[arg(long)]
    pub tolerate_stylesheet_errors: bool,

    /// Also write the log to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log per-stage progress.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            output_dir: self.output.clone(),
            page_limit: self.limit,
            navigation_timeout_secs: self.navigation_timeout,
            chrome_executable: self.chrome.clone(),
            tolerate_stylesheet_errors: self.tolerate_stylesheet_errors,
        }
    }
}
