//! Core types and the decision pipeline for the verdict HTTP client.
//!
//! This crate is transport-free. It provides:
//! - [`Endpoint`] - typed request descriptor
//! - [`Request`] and [`RequestBuilder`] - transport request types
//! - [`Response`] - raw transport response
//! - [`ServiceEnvelope`] - the outer service-level response wrapper
//! - [`Decision`], [`Outcome`], [`DecisionList`] - the pipeline unit and
//!   its built-ins
//! - [`pipeline`] - the runner that drives a call across restarts
//! - [`Error`], [`Result`], [`ErrorCodeTable`] - the error domain
//! - [`Transport`] - the collaborator trait a concrete HTTP client
//!   implements

mod codec;
mod decision;
mod endpoint;
mod envelope;
mod error;
pub mod pipeline;
pub mod prelude;
mod request;
mod response;
mod transport;

pub use codec::{DecodeError, from_json, to_json};
pub use decision::{
    Decision, DecisionFuture, DecisionList, Outcome, ParseEnvelope, ParsePayload, Retry,
    ServiceStatus, TransportStatus,
};
pub use endpoint::Endpoint;
pub use envelope::{SERVICE_SUCCESS_CODE, ServiceEnvelope};
pub use error::{Error, ErrorCodeTable, Result};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use transport::Transport;

// Re-export http crate types for methods and status codes
pub use http::{Method, StatusCode};
