//! EduSolve observability: tracing subscriber setup with optional OTLP export.
//!
//! Console output goes to stderr so it never mixes with a rendered correction
//! on stdout. OTLP export is enabled only when an endpoint is configured.
//!
//! # Quick Start
//!
//! ```no_run
//! use edusolve_observability::{init, ObservabilityConfig};
//!
//! let config = ObservabilityConfig::new("edusolve")
//!     .with_console(true)
//!     .with_log_level("edusolve=debug");
//!
//! init(config)?;
//! tracing::info!("ready");
//! # Ok::<(), edusolve_observability::ObservabilityError>(())
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_SERVICE_NAME` - Service name (default `edusolve`)
//! - `OTEL_SERVICE_VERSION` - Service version
//! - `OTEL_EXPORTER_OTLP_ENDPOINT` - OTLP endpoint
//! - `EDUSOLVE_LOG` or `RUST_LOG` - Log level filter

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracing;

pub use config::ObservabilityConfig;
pub use error::ObservabilityError;
pub use telemetry::{init, shutdown};
pub use tracing::{record_duration, record_error};
