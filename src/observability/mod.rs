//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (launch state changes, transport and decode failures)
//!     → logging.rs subscriber → stderr
//!
//! stdout stays reserved for the fetch output itself.
//! ```

pub mod logging;

pub use logging::init_logging;
