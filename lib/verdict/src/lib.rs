//! Decision-driven HTTP response pipeline.
//!
//! A response travels through an ordered chain of decisions: reject
//! transport failures, unwrap the service envelope, map service error
//! codes, decode the payload; a retry decision can restart the whole
//! chain against a fresh transport call. The caller describes one typed
//! endpoint and receives exactly one typed result.
//!
//! # Example
//!
//! ```ignore
//! use verdict::{ApiClient, Endpoint};
//!
//! #[derive(Debug, serde::Deserialize)]
//! struct Fact {
//!     fact: String,
//!     length: u32,
//! }
//!
//! let client = ApiClient::from_url("https://catfact.ninja")?;
//! let fact: Fact = client.call(Endpoint::get("fact").with_retry(2)).await?;
//! ```

mod api_client;
mod client;
mod config;
pub mod prelude;

// Re-export client types
pub use api_client::ApiClient;
pub use client::HyperClient;
pub use config::{ApiConfig, ClientConfig, ClientConfigBuilder};

// Re-export core types
pub use verdict_core::{
    Decision, DecisionFuture, DecisionList, DecodeError, Endpoint, Error, ErrorCodeTable, Outcome,
    ParseEnvelope, ParsePayload, Request, RequestBuilder, Response, Result, Retry,
    SERVICE_SUCCESS_CODE, ServiceEnvelope, ServiceStatus, Transport, TransportStatus, from_json,
    pipeline, to_json,
};

// Re-export http types for methods and status codes
pub use verdict_core::{Method, StatusCode};
