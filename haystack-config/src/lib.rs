//! Configuration loading and tracing setup for hosts embedding the
//! Haystack list engine.
//!
//! ```no_run
//! use haystack_config::{ListConfig, init_tracing};
//!
//! # fn main() -> anyhow::Result<()> {
//! init_tracing()?;
//! let (config, source) = ListConfig::load_from_env()?;
//! tracing::info!(?source, interval = ?config.refresh_interval(), "list config loaded");
//! # Ok(())
//! # }
//! ```
#![allow(missing_docs)]

pub mod list;
pub mod telemetry;

pub use list::{CONFIG_JSON_ENV, CONFIG_PATH_ENV, ConfigSource, ListConfig};
pub use telemetry::{DEFAULT_FILTER, init_tracing, init_tracing_with};
