//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// G-Core cloud client CLI
#[derive(Parser, Debug)]
#[command(name = "gcorecloud")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML); falls back to GCLOUD_* variables
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Project id, overrides the configured one
    #[arg(short, long, global = true)]
    pub project: Option<u64>,

    /// Region id, overrides the configured one
    #[arg(short, long, global = true)]
    pub region: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Regions (global)
    Regions {
        #[command(subcommand)]
        command: RegionCommands,
    },

    /// GPU bare-metal clusters
    Clusters {
        #[command(subcommand)]
        command: ClusterCommands,
    },

    /// Load balancers
    Loadbalancers {
        #[command(subcommand)]
        command: LoadBalancerCommands,
    },

    /// Asynchronous tasks
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegionCommands {
    /// List all regions
    List(ListArgs),
    /// Show one region
    Get { region_id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum ClusterCommands {
    /// List clusters in the project and region
    List(ListArgs),
    /// Show one cluster
    Get { cluster_id: String },
    /// Rename a cluster
    Rename { cluster_id: String, name: String },
    /// Delete a cluster
    Delete {
        cluster_id: String,

        /// Also delete every floating IP of the cluster
        #[arg(long)]
        all_floating_ips: bool,

        /// Also delete every reserved fixed IP of the cluster
        #[arg(long)]
        all_reserved_fixed_ips: bool,

        /// Also delete every volume of the cluster
        #[arg(long)]
        all_volumes: bool,

        /// Volumes to delete (comma-separated)
        #[arg(long, value_delimiter = ',')]
        volume_ids: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum LoadBalancerCommands {
    /// List load balancers in the project and region
    List(ListArgs),
    /// Show one load balancer
    Get { load_balancer_id: String },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Show one task
    Get { task_id: String },
}

/// Options shared by every list command
#[derive(Args, Debug, Clone, Copy)]
pub struct ListArgs {
    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one resource per line)
    Json,
    /// Human-readable output
    Pretty,
}
