//! Hash processor seam.
//!
//! The request handler never talks to the threat-intelligence service itself. It
//! builds a [`QueryContext`] for the request, hands it to a [`HashProcessor`]
//! together with the normalized hash list, and formats whatever comes back.
//!
//! - [`HashProcessor`] - async trait implemented by lookup backends
//! - [`LocalProcessor`] - backend that records the batch without any lookup
//! - [`ProcessOutcome`] - report file (text mode) or result records (display mode)
//! - [`ProcessorError`] - structured failure kinds surfaced as HTTP 501

mod local;
mod types;

pub use local::LocalProcessor;
pub use types::{OutputMode, ProcessOutcome, QueryContext, SampleRecord};

use async_trait::async_trait;
use thiserror::Error;

/// Failure kinds a processor can report.
///
/// The `Display` text is what ends up after "Problem with query to Autofocus: "
/// in the HTTP response.
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("authentication with the threat-intelligence service failed")]
    AuthFailure,

    #[error("quota exceeded")]
    QuotaExceeded,

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("report i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Looks up metadata for a batch of hashes.
///
/// Implementations must not keep per-request state: everything a call needs is in
/// `ctx`, and calls for different requests may run concurrently.
#[async_trait]
pub trait HashProcessor: Send + Sync {
    /// Text-mode requests expect [`ProcessOutcome::Report`], display-mode requests
    /// expect [`ProcessOutcome::Records`].
    async fn process(
        &self,
        ctx: &QueryContext,
        hashes: &[String],
    ) -> Result<ProcessOutcome, ProcessorError>;
}
