//! HTTP fetch subsystem.
//!
//! # Data Flow
//! ```text
//! RequestConfig
//!     → launch.rs (fresh HeaderStore + body buffer, state machine)
//!     → transport.rs (one round trip via libcurl or reqwest, raw header lines then body chunks)
//!     → headers.rs (each header line parsed as it arrives)
//!     → decoder.rs (charset inference, strict decoding, once per launch)
//!     → stdout (header echo, verbose notes, content-bytes, text)
//! ```

pub mod decoder;
pub mod headers;
pub mod launch;
pub mod transport;

pub use decoder::{DecodedResponse, EncodingSource, ResponseDecoder, FALLBACK_ENCODING};
pub use headers::{HeaderLine, HeaderStore};
pub use launch::{LaunchOutcome, LaunchState, Launcher};
pub use transport::{
    normalize_url, CurlTransport, HttpTransport, ReqwestTransport, ResponseSink, Transport,
};
