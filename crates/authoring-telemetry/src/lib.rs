//! # Authoring Telemetry
//!
//! Logging bootstrap for the authoring publication lifecycle.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use authoring_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     // Lifecycle log lines are now emitted
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AUTHORING_SERVICE_NAME` | `authoring-publication` | Service name in logs |
//! | `AUTHORING_LOG_LEVEL` | `info` | Log level filter |
//! | `AUTHORING_JSON_LOGS` | `false` | JSON formatted logs |
//! | `AUTHORING_CONSOLE_OUTPUT` | `true` | Console output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install log subscriber: {0}")]
    SubscriberInit(String),
}
