//! Typed configuration for Groupscope.
//!
//! Configuration is layered: defaults, then an optional TOML or JSON file,
//! then `GROUPSCOPE_*` environment variables.
//!
//! # Configuration File Format
//!
//! ```toml
//! [upstream]
//! base_url = "https://app.airfocus.com/api"
//! timeout = "30s"
//! connect_timeout = "5s"
//!
//! [cache]
//! ttl = "5m"
//!
//! [logging]
//! level = "info"
//! json = true
//! ```
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use groupscope_config::GroupscopeConfig;
//!
//! let config = GroupscopeConfig::builder()
//!     .cache_ttl(Duration::from_secs(60))
//!     .build()
//!     .unwrap();
//! assert_eq!(config.cache.ttl, Duration::from_secs(60));
//! ```

#![doc(html_root_url = "https://docs.rs/groupscope-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
pub mod duration;
mod error;

pub use config::{
    CacheSettings, GroupscopeConfig, GroupscopeConfigBuilder, UpstreamSettings, DEFAULT_BASE_URL,
    ENV_PREFIX,
};
pub use error::{ConfigError, ConfigResult};
pub use groupscope_telemetry::LogConfig;
