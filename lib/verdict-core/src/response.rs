//! Transport response handling.
//!
//! A [`Response`] is the raw result of one transport call: status code,
//! headers, and the unparsed body bytes. It lives for the duration of one
//! pipeline pass; decisions turn it into an envelope and then a payload.

use std::collections::HashMap;

use bytes::Bytes;

use crate::{Error, Result, ServiceEnvelope};

/// Raw HTTP response with status, headers, and body bytes.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Raw body bytes.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Decode the body as a [`ServiceEnvelope`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::EnvelopeDecode`] if the body is not a valid
    /// envelope.
    pub fn envelope(&self) -> Result<ServiceEnvelope> {
        crate::from_json(&self.body).map_err(|e| Error::envelope_decode(e.path, e.message))
    }
}
