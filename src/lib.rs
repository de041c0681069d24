//! # pulsarctl: Command-Line Administration for Pulsar and BookKeeper
//!
//! This crate implements a command-line client for the administrative REST
//! APIs of an Apache Pulsar cluster and the HTTP service of its BookKeeper
//! bookies.  It provides:
//!
//! - **Namespace Policies**: Reading, setting and removing the message,
//!   subscription and replicator dispatch rates of a namespace
//! - **Bookie Operations**: Listing bookies, inspecting disks and journals,
//!   and driving garbage collection
//! - **Layered Configuration**: Flags over a YAML config file over defaults
//! - **Structured Output**: Decoded results rendered as JSON or YAML
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Binary (global options, logging)        │
//! ├─────────────────────────────────────────┤
//! │ Command groups (verbs, flags, help)     │
//! ├─────────────────────────────────────────┤
//! │ Typed resources (Namespaces, Bookie)    │
//! ├─────────────────────────────────────────┤
//! │ AdminClient (URLs, auth, error mapping) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ### Namespace Names
//!
//! ```rust
//! # use pulsarctl::NamespaceName;
//! let namespace: NamespaceName = "public/default".parse().unwrap();
//! assert_eq!(namespace.tenant(), "public");
//! assert_eq!(namespace.admin_path(), "/admin/v2/namespaces/public/default");
//!
//! // Names that carry a cluster use the v1 layout.
//! let legacy: NamespaceName = "sample/standalone/ns1".parse().unwrap();
//! assert!(legacy.is_v1());
//!
//! assert!("public".parse::<NamespaceName>().is_err());
//! ```
//!
//! ### Dispatch Rates
//!
//! ```rust
//! # use pulsarctl::DispatchRate;
//! let rate = DispatchRate {
//!     dispatch_throttling_rate_in_msg: 100,
//!     ..DispatchRate::default()
//! };
//! let json = serde_json::to_value(&rate).unwrap();
//! assert_eq!(json["dispatchThrottlingRateInMsg"], 100);
//! assert_eq!(json["dispatchThrottlingRateInByte"], -1);
//! ```

#![deny(missing_docs)]
mod bookie;
mod errors;
mod namespace;

/// Command-line interface utilities for program termination and output formatting.
///
/// This module provides the output format switch and the helpers that render
/// decoded results as JSON or YAML.
pub mod cli_utils;

/// Command-line interface command handlers.
///
/// This module contains the `namespaces` and `bookie` command groups, with
/// each group implemented in a dedicated submodule.
pub mod commands;

/// Client configuration: flags, config file and defaults.
pub mod config;

/// Long-form help text shared by every verb.
pub mod description;

/// HTTP client utilities for the Pulsar admin and bookie services.
///
/// This module builds endpoint URLs, attaches credentials, and maps non-2xx
/// responses to [`RemoteError`].
pub mod http_utils;

/// Installation of the global tracing subscriber.
pub mod logging;

pub use bookie::{Bookie, BookieState, BookieType, FileType, GcStatus};
pub use config::{ConfigOverrides, CtlConfig};
pub use description::LongDescription;
pub use errors::{CtlError, RemoteError, Result};
pub use http_utils::{AdminClient, Service};
pub use namespace::{
    DispatchRate, DispatchRateKind, NamespaceName, NamespaceNameParseError, Namespaces,
};
