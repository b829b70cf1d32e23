//! Transport collaborator trait.

use std::future::Future;

use crate::{Request, Response, Result};

/// An external HTTP transport.
///
/// The pipeline issues one `perform` per pass (including restarts) and
/// never applies decisions to a transport failure: an `Err` from
/// `perform` is terminal for the whole call. Implementations must resolve
/// each invocation at most once and map their own failure causes
/// (connectivity, DNS, timeout) into
/// [`Error::Unknown`](crate::Error::Unknown).
pub trait Transport: Send + Sync {
    /// Execute a request and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if no HTTP response could be obtained.
    fn perform(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}
