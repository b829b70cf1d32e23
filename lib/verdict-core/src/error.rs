//! The error domain: every way a call can fail, as a typed value.

use std::collections::HashMap;

use derive_more::{Display, Error, From};

use crate::ServiceEnvelope;

/// Main error type for pipeline calls.
///
/// Every terminal condition is surfaced as one of these variants; nothing
/// is swallowed silently. Transport-level failures never pass through the
/// decision chain and arrive as [`Error::Unknown`].
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Expected response data was absent.
    #[display("response data missing")]
    DataMissing,

    /// The transport produced no usable HTTP response.
    #[display("no usable HTTP response")]
    NonHttpResponse,

    /// Transport-level HTTP status outside 2xx.
    #[display("service error {status}")]
    #[from(skip)]
    Service {
        /// HTTP status code.
        status: u16,
    },

    /// Service-level status code mapped to a known application error.
    #[display("API error {code}: {message}")]
    #[from(skip)]
    Api {
        /// Service status code from the envelope.
        code: u16,
        /// Message from the error-code table.
        message: String,
        /// The envelope that carried the code.
        #[error(not(source))]
        envelope: ServiceEnvelope,
    },

    /// Service-level status code outside the known-code table.
    #[display("unknown service status code")]
    #[from(skip)]
    UnknownStatusCode {
        /// The envelope that carried the code.
        #[error(not(source))]
        envelope: ServiceEnvelope,
    },

    /// The response body could not be decoded as a service envelope.
    #[display("envelope decode error at '{path}': {message}")]
    #[from(skip)]
    EnvelopeDecode {
        /// JSON path to the failing field.
        path: String,
        /// Underlying decode error message.
        message: String,
    },

    /// The envelope payload could not be decoded as the expected type.
    #[display("payload decode error at '{path}': {message}")]
    #[from(skip)]
    PayloadDecode {
        /// JSON path to the failing field.
        path: String,
        /// Underlying decode error message.
        message: String,
    },

    /// Opaque transport failure (connectivity, DNS, timeout).
    #[display("transport error: {_0}")]
    #[from(skip)]
    Unknown(#[error(not(source))] String),

    /// The decision list ran out without reaching a terminal outcome.
    ///
    /// This is a configuration defect in the caller-assembled list, not an
    /// ordinary call failure.
    #[display("decision list exhausted without a terminal outcome")]
    ExhaustedDecisions,

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a service error from a transport status code.
    #[must_use]
    pub const fn service(status: u16) -> Self {
        Self::Service { status }
    }

    /// Create an API error from a known service status code.
    #[must_use]
    pub fn api(code: u16, message: impl Into<String>, envelope: ServiceEnvelope) -> Self {
        Self::Api {
            code,
            message: message.into(),
            envelope,
        }
    }

    /// Create an unknown-status-code error.
    #[must_use]
    pub const fn unknown_status(envelope: ServiceEnvelope) -> Self {
        Self::UnknownStatusCode { envelope }
    }

    /// Create an envelope decode error.
    #[must_use]
    pub fn envelope_decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EnvelopeDecode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a payload decode error.
    #[must_use]
    pub fn payload_decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PayloadDecode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an opaque transport error.
    #[must_use]
    pub fn unknown(cause: impl Into<String>) -> Self {
        Self::Unknown(cause.into())
    }

    /// Transport status code, if this is a service error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status } => Some(*status),
            _ => None,
        }
    }

    /// Service status code, if this is an API error.
    #[must_use]
    pub const fn code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The envelope attached to the error, if any.
    #[must_use]
    pub const fn envelope(&self) -> Option<&ServiceEnvelope> {
        match self {
            Self::Api { envelope, .. } | Self::UnknownStatusCode { envelope } => Some(envelope),
            _ => None,
        }
    }

    /// Returns `true` if this is a known application error.
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Returns `true` if this is a transport-level status failure.
    #[must_use]
    pub const fn is_service(&self) -> bool {
        matches!(self, Self::Service { .. })
    }

    /// Returns `true` if this indicates a misconfigured decision list.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::ExhaustedDecisions)
    }
}

// ============================================================================
// Error-Code Table
// ============================================================================

/// Mapping from well-known service status codes to human-readable messages.
///
/// The default table covers the codes the service documents; callers extend
/// it through configuration rather than by touching pipeline logic.
///
/// # Example
///
/// ```
/// use verdict_core::ErrorCodeTable;
///
/// let table = ErrorCodeTable::default().with_entry(418, "teapot");
/// assert_eq!(table.message(404), Some("not found"));
/// assert_eq!(table.message(418), Some("teapot"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCodeTable {
    entries: HashMap<u16, String>,
}

impl Default for ErrorCodeTable {
    fn default() -> Self {
        Self::empty()
            .with_entry(403, "forbidden")
            .with_entry(404, "not found")
            .with_entry(500, "internal server error")
    }
}

impl ErrorCodeTable {
    /// Creates a table with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds or replaces an entry.
    #[must_use]
    pub fn with_entry(mut self, code: u16, message: impl Into<String>) -> Self {
        self.entries.insert(code, message.into());
        self
    }

    /// Message for a known code.
    #[must_use]
    pub fn message(&self, code: u16) -> Option<&str> {
        self.entries.get(&code).map(String::as_str)
    }

    /// Returns `true` if the code is known.
    #[must_use]
    pub fn contains(&self, code: u16) -> bool {
        self.entries.contains_key(&code)
    }
}
