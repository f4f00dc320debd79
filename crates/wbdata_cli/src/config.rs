//! Command-line and environment configuration.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use wbdata_core::UpstreamConfig;

#[derive(Debug, Parser)]
#[command(
    name = "wbdata",
    version,
    about = "Data service for World Bank economic indicators"
)]
pub struct Cli {
    /// SQLite database file holding imported collections.
    #[arg(long, env = "WBDATA_DB", default_value = "data.db", global = true)]
    pub db: PathBuf,

    /// trace|debug|info|warn|error. Defaults to debug in debug builds, info otherwise.
    #[arg(long, env = "WBDATA_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs go to stderr when unset.
    #[arg(long, env = "WBDATA_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    /// Base URL of the World Bank API.
    #[arg(
        long,
        env = "WBDATA_UPSTREAM_URL",
        default_value = "http://api.worldbank.org",
        global = true
    )]
    pub upstream_url: String,

    /// Connect/read timeout for upstream requests, in seconds.
    #[arg(long, env = "WBDATA_TIMEOUT_SECS", default_value_t = 10, global = true)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the `/collections` HTTP API.
    Serve {
        /// Socket address to listen on.
        #[arg(long, env = "WBDATA_BIND", default_value = "127.0.0.1:5000")]
        bind: String,
    },
    /// Import one indicator into the local store (or show the cached copy).
    Import {
        /// Indicator code, e.g. NY.GDP.MKTP.CD.
        indicator: String,
    },
    /// List imported collections.
    List,
    /// Print the importable indicator codes.
    Catalog,
}

impl Cli {
    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig {
            base_url: self.upstream_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
