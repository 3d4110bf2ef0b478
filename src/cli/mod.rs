//! CLI module
//!
//! Command-line interface over the resource operations.
//!
//! # Commands
//!
//! - `regions list|get` - Global regions
//! - `clusters list|get|rename|delete` - GPU bare-metal clusters
//! - `loadbalancers list|get` - Load balancers
//! - `tasks get` - Asynchronous tasks

mod commands;
mod runner;

pub use commands::{
    Cli, ClusterCommands, Commands, ListArgs, LoadBalancerCommands, OutputFormat, RegionCommands,
    TaskCommands,
};
pub use runner::Runner;
