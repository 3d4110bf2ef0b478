#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # G-Core cloud client
//!
//! A typed client for the G-Core cloud management API.
//!
//! ## Features
//!
//! - **Link-following pagination**: collections are walked one page at a time
//!   by following each page's `rel: "next"` link
//! - **Resource extraction**: decode `results` into typed records, failing the
//!   whole page on any malformed entry
//! - **Tagged unions**: network interface configs keyed by a `type`
//!   discriminator, decoded and encoded symmetrically
//! - **Tasks**: read created resource ids out of finished tasks
//! - **HTTP**: retries with backoff and client-side rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gcorecloud::{resources::clusters, ClientConfig, CloudClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let cloud = CloudClient::from_config(config)?;
//!
//!     let client = clusters::service(&cloud)?;
//!     let mut pager = clusters::list(&client)?;
//!     while let Some(page) = pager.next_page().await? {
//!         for cluster in page.extract()? {
//!             println!("{} {:?}", cluster.name, cluster.status);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  resources: clusters · loadbalancers · regions · tasks       │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌────────────┬────────────────┼──────────────┬────────────────┐
//! │   client   │   pagination   │   extract    │    variant     │
//! ├────────────┼────────────────┼──────────────┼────────────────┤
//! │ URL scope  │ Pager          │ results → T  │ type-tagged    │
//! │ JSON calls │ LinkedPage     │ single → T   │ interfaces     │
//! └────────────┴────────────────┴──────────────┴────────────────┘
//!                               │
//! ┌──────────────────────────────────────────────────────────────┐
//! │  http: Transport · retries · backoff · rate limit            │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Link-following pagination
pub mod pagination;

/// Typed extraction of resources from response bodies
pub mod extract;

/// Discriminated unions
pub mod variant;

/// Request option validation
pub mod validate;

/// Client configuration
pub mod config;

/// Service clients and URL building
pub mod client;

/// Resource families
pub mod resources;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::{CloudClient, ResourceScope, ServiceClient};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use pagination::{LinkedPage, Page, Pager};
pub use types::*;
pub use variant::{InterfaceConfig, TaggedUnion};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
