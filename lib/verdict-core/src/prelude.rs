//! Prelude module for convenient imports.
//!
//! ```ignore
//! use verdict_core::prelude::*;
//! ```

pub use crate::{
    Decision, DecisionList, Endpoint, Error, ErrorCodeTable, Method, Outcome, Request,
    RequestBuilder, Response, Result, Retry, ServiceEnvelope, Transport, from_json, to_json,
};
