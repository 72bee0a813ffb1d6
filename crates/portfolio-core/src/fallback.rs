//! Fetch-with-fallback.
//!
//! Every read endpoint follows the same shape: resolve config, call the
//! upstream once, reshape the answer into the internal schema, and on any
//! failure hand back a fallback payload of that same schema. The helper in
//! this module owns that control flow so each upstream adapter only supplies
//! three pieces:
//!
//! - a **fetcher** that talks to the upstream and returns its raw shape,
//! - a **validator** that turns the raw shape into the internal schema,
//! - a **fallback factory** used when either of the above fails.
//!
//! Nothing is retried. A single failed attempt goes straight to the fallback,
//! and the result is tagged with a [`Provenance`] so callers can tell live
//! data from substitute data.
//!
//! The helper never panics past its boundary: a panic in any of the three
//! pieces is caught and degrades to [`LastResort::last_resort`].

use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};

use futures::FutureExt;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Classified failure of a single upstream call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// A required credential or username is absent. Expected, not an error.
    #[error("{0} is not configured")]
    MissingConfig(&'static str),

    #[error("{service} answered with status {status}")]
    Status { service: String, status: u16 },

    #[error("malformed upstream body: {0}")]
    Malformed(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

impl UpstreamError {
    pub fn status(service: impl Into<String>, status: u16) -> Self {
        Self::Status {
            service: service.into(),
            status,
        }
    }

    pub fn malformed(err: impl Display) -> Self {
        Self::Malformed(err.to_string())
    }

    pub fn transport(err: impl Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn is_missing_config(&self) -> bool {
        matches!(self, Self::MissingConfig(_))
    }
}

/// Turns a non-2xx status into [`UpstreamError::Status`].
pub fn ensure_success(service: &str, status: u16) -> Result<(), UpstreamError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(UpstreamError::status(service, status))
    }
}

/// Static payload used when even the fallback factory fails.
pub trait LastResort {
    fn last_resort() -> Self;
}

impl<T> LastResort for Vec<T> {
    fn last_resort() -> Self {
        Vec::new()
    }
}

/// Where a payload came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Provenance {
    Live,
    Fallback { reason: String },
}

/// A payload together with its provenance.
#[derive(Debug, Clone)]
pub struct Sourced<T> {
    pub data: T,
    pub provenance: Provenance,
}

impl<T> Sourced<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            provenance: Provenance::Live,
        }
    }

    pub fn fallback(data: T, reason: impl Into<String>) -> Self {
        Self {
            data,
            provenance: Provenance::Fallback {
                reason: reason.into(),
            },
        }
    }

    pub fn is_live(&self) -> bool {
        self.provenance == Provenance::Live
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match &self.provenance {
            Provenance::Live => None,
            Provenance::Fallback { reason } => Some(reason),
        }
    }
}

/// Runs `fetch`, shapes its output with `validate`, and falls back to
/// `fallback()` on any [`UpstreamError`] or panic.
pub async fn fetch_with_fallback<T, R, Fetch, Fut, Validate, Fallback>(
    service: &str,
    fetch: Fetch,
    validate: Validate,
    fallback: Fallback,
) -> Sourced<T>
where
    T: LastResort,
    Fetch: FnOnce() -> Fut,
    Fut: Future<Output = Result<R, UpstreamError>>,
    Validate: FnOnce(R) -> Result<T, UpstreamError>,
    Fallback: FnOnce() -> T,
{
    let attempt = AssertUnwindSafe(async move { fetch().await.and_then(validate) })
        .catch_unwind()
        .await;

    let reason = match attempt {
        Ok(Ok(data)) => return Sourced::live(data),
        Ok(Err(err)) => {
            log_upstream_failure(service, &err);
            err.to_string()
        }
        Err(panic) => {
            error!(
                service,
                "upstream adapter panicked: {}",
                panic_message(panic.as_ref())
            );
            "unexpected failure".to_string()
        }
    };

    match catch_unwind(AssertUnwindSafe(fallback)) {
        Ok(data) => Sourced::fallback(data, reason),
        Err(panic) => {
            error!(
                service,
                "fallback factory panicked, using last-resort payload: {}",
                panic_message(panic.as_ref())
            );
            Sourced::fallback(T::last_resort(), reason)
        }
    }
}

fn log_upstream_failure(service: &str, err: &UpstreamError) {
    match err {
        UpstreamError::MissingConfig(what) => {
            debug!(service, "{what} not configured, serving fallback payload");
        }
        UpstreamError::Status { status, .. } => {
            warn!(service, status, "upstream returned non-success status, serving fallback");
        }
        UpstreamError::Malformed(detail) => {
            warn!(service, "upstream body failed validation: {detail}");
        }
        UpstreamError::Transport(detail) => {
            warn!(service, "upstream call failed: {detail}");
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
