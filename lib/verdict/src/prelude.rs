//! Prelude module for convenient imports.
//!
//! ```ignore
//! use verdict::prelude::*;
//! ```

pub use crate::{
    ApiClient, ApiConfig, ClientConfig, Decision, DecisionList, Endpoint, Error, ErrorCodeTable,
    HyperClient, Method, Outcome, Request, Response, Result, Retry, ServiceEnvelope, Transport,
};
pub use serde::{Deserialize, Serialize};
