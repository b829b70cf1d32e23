//! Typed endpoint descriptors.
//!
//! An [`Endpoint`] describes one logical call: target path, method, an
//! optional JSON body, and the ordered decision list to run against the
//! response. The expected payload type is the type parameter, not a
//! runtime value.

use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use http::Method;
use serde::de::DeserializeOwned;

use crate::{DecisionList, Result, Retry};

/// Immutable per-call request descriptor.
///
/// # Example
///
/// ```
/// use verdict_core::Endpoint;
///
/// #[derive(Debug, serde::Deserialize)]
/// struct Fact {
///     fact: String,
///     length: u32,
/// }
///
/// let endpoint = Endpoint::<Fact>::get("fact").with_retry(3);
/// assert_eq!(endpoint.path(), "fact");
/// ```
pub struct Endpoint<T> {
    method: Method,
    path: String,
    body: Option<Bytes>,
    decisions: DecisionList<T>,
    _payload: PhantomData<fn() -> T>,
}

impl<T> Clone for Endpoint<T> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            path: self.path.clone(),
            body: self.body.clone(),
            decisions: self.decisions.clone(),
            _payload: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Endpoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("decisions", &self.decisions)
            .finish_non_exhaustive()
    }
}

impl<T> Endpoint<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Creates an endpoint with the standard decision list.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            decisions: DecisionList::standard(),
            _payload: PhantomData,
        }
    }

    /// GET endpoint with the standard decision list.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST endpoint with the standard decision list.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }
}

impl<T> Endpoint<T> {
    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Target path, resolved against the client's base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// JSON request body, if set.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// The decision list this endpoint runs.
    #[must_use]
    pub const fn decisions(&self) -> &DecisionList<T> {
        &self.decisions
    }

    /// Replaces the decision list wholesale.
    #[must_use]
    pub fn with_decisions(mut self, decisions: DecisionList<T>) -> Self {
        self.decisions = decisions;
        self
    }

    /// Prepends a [`Retry`] decision with the given budget.
    ///
    /// The retry sits ahead of the transport-status check, so non-2xx
    /// responses restart until the budget runs out.
    #[must_use]
    pub fn with_retry(mut self, attempts: u32) -> Self
    where
        T: Send + 'static,
    {
        self.decisions = self.decisions.prepended(Retry::new(attempts));
        self
    }

    /// Sets a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<B: serde::Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(crate::to_json(body)?);
        Ok(self)
    }
}
