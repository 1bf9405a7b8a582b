//! Clap derive structure for the `check-mesh-node` binary.
//!
//! A flat argument set, no subcommands: the binary does exactly one check
//! per invocation, as the monitoring scheduler expects.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use meshmon_core::FeedSchema;

/// check-mesh-node -- monitoring check for mesh-network routers
#[derive(Debug, Parser)]
#[command(
    name = "check-mesh-node",
    version,
    about = "Check a mesh router's online state and client count",
    long_about = "Checks one router in a mesh-network fleet-status feed and reports\n\
        its online state plus connected-client count in monitoring-plugin\n\
        format: one status line with perfdata, exit codes 0-3."
)]
pub struct Cli {
    /// Router to check, by hostname as published in the feed
    #[arg(long, short = 'n')]
    pub name: String,

    /// Status feed URL; repeat to add fallback sources tried in order
    #[arg(long = "url", short = 'u', value_name = "URL")]
    pub urls: Vec<String>,

    /// Warning threshold for the client count
    #[arg(long, short = 'w', value_name = "COUNT")]
    pub warning: Option<u32>,

    /// Critical threshold for the client count
    #[arg(long, short = 'c', value_name = "COUNT")]
    pub critical: Option<u32>,

    /// Document shape published by the feed
    #[arg(long, value_enum)]
    pub schema: Option<SchemaArg>,

    /// Cache file path (defaults to check-mesh-node.json in the temp dir)
    #[arg(long, value_name = "PATH")]
    pub cache_file: Option<PathBuf>,

    /// Maximum cache age in seconds before a re-fetch
    #[arg(long, value_name = "SECONDS")]
    pub max_age: Option<u64>,

    /// Per-request network timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Feed profile from the config file
    #[arg(long, short = 'p', env = "MESHMON_PROFILE")]
    pub profile: Option<String>,

    /// Increase diagnostic verbosity on stderr (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// CLI-level mirror of [`FeedSchema`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaArg {
    /// {"nodes": [{"name", "id", "flags", "clientcount"}, ..]}
    NodeList,
    /// {"nodes": [{"nodeinfo", "flags", "statistics"}, ..]}
    NodeInfo,
    /// {"<mac>": {"hostname", "status", "clients"}, ..}
    MacMap,
}

impl From<SchemaArg> for FeedSchema {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::NodeList => Self::NodeList,
            SchemaArg::NodeInfo => Self::NodeInfo,
            SchemaArg::MacMap => Self::MacMap,
        }
    }
}
