//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//!     → handed to the transport and the log subscriber
//!
//! command-line tokens
//!     → cli::parse_args
//!     → RequestConfig (immutable, one per launch)
//! ```
//!
//! # Design Decisions
//! - All settings fields have defaults; a missing file means `Settings::default()`
//! - Validation separates syntactic (serde) from semantic checks
//! - Per-request flags never live in the settings file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ObservabilityConfig, RequestConfig, Settings, TransportBackend, TransportConfig};
pub use validation::{validate_config, ValidationError};
