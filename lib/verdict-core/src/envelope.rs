//! The service-level response envelope.
//!
//! Every payload is wrapped in a two-level shape on the wire: the outer
//! envelope carries a human-readable message and a service status code,
//! the inner `Data` value is the payload the caller actually asked for.
//!
//! ```json
//! {"Message": "ok", "StatusCode": 200, "Data": {"fact": "x", "length": 1}}
//! ```

use serde_json::Value;

/// Canonical service-level success code carried in the envelope.
pub const SERVICE_SUCCESS_CODE: u16 = 200;

/// Outer service envelope, parsed once per pipeline pass.
///
/// Wire keys are case-sensitive (`Message`, `StatusCode`, `Data`); every
/// field may be absent. `Data` must be a JSON object or array so it can be
/// re-serialized and decoded into the caller's payload type.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct ServiceEnvelope {
    #[serde(rename = "Message")]
    message: Option<String>,
    #[serde(rename = "StatusCode")]
    status_code: Option<u16>,
    #[serde(rename = "Data")]
    data: Option<Value>,
}

impl ServiceEnvelope {
    /// Creates an envelope from its parts.
    #[must_use]
    pub const fn new(message: Option<String>, status_code: Option<u16>, data: Option<Value>) -> Self {
        Self {
            message,
            status_code,
            data,
        }
    }

    /// Human-readable service message, if the service sent one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Service-level status code.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// The yet-undecoded inner payload.
    #[must_use]
    pub const fn payload(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Status code equals the canonical success code.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code == Some(SERVICE_SUCCESS_CODE)
    }
}
