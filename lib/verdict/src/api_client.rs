//! The client facade.
//!
//! [`ApiClient`] owns the mapping from an [`Endpoint`] to a transport
//! invocation: it joins the endpoint path onto the configured base URL,
//! applies the configured headers, and hands the request to the pipeline
//! runner. One `call` per logical call; restarts re-enter the transport
//! through the same facade-built request.

use tracing::{info, warn};
use verdict_core::pipeline;

use crate::{ApiConfig, Endpoint, HyperClient, Request, Result, Transport};

/// Typed API client over any [`Transport`].
///
/// # Example
///
/// ```ignore
/// use verdict::{ApiClient, Endpoint};
///
/// #[derive(Debug, serde::Deserialize)]
/// struct Fact {
///     fact: String,
///     length: u32,
/// }
///
/// let client = ApiClient::from_url("https://catfact.ninja")?;
/// let fact: Fact = client.call(Endpoint::get("fact")).await?;
/// ```
#[derive(Debug)]
pub struct ApiClient<C = HyperClient> {
    transport: C,
    config: ApiConfig,
}

impl<C: Clone> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            config: self.config.clone(),
        }
    }
}

impl ApiClient<HyperClient> {
    /// Creates a client over a default [`HyperClient`] from a base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn from_url(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::new(HyperClient::new(), ApiConfig::parse(base_url)?))
    }
}

impl<C> ApiClient<C> {
    /// Creates a client from a transport and an API configuration.
    #[must_use]
    pub const fn new(transport: C, config: ApiConfig) -> Self {
        Self { transport, config }
    }

    /// The API configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Get a reference to the inner transport.
    #[must_use]
    pub const fn transport(&self) -> &C {
        &self.transport
    }
}

impl<C: Transport> ApiClient<C> {
    /// Run one logical call: issue the transport request and drive the
    /// endpoint's decision list to a terminal result.
    ///
    /// Exactly one success value or one typed error is delivered per call;
    /// dropping the returned future cancels the in-flight transport call
    /// without delivering anything.
    ///
    /// # Errors
    ///
    /// Returns the typed error the pipeline terminated with.
    pub async fn call<T: Send>(&self, endpoint: Endpoint<T>) -> Result<T> {
        let request = self.build_request(&endpoint)?;

        info!(method = %request.method(), url = %request.url(), "starting call");
        let result = pipeline::run(&self.transport, &endpoint, request).await;
        match &result {
            Ok(_) => info!("call completed"),
            Err(error) => warn!(%error, "call failed"),
        }
        result
    }

    fn build_request<T>(&self, endpoint: &Endpoint<T>) -> Result<Request> {
        let url = self.config.base_url().join(endpoint.path())?;

        let mut builder = Request::builder(endpoint.method().clone(), url);
        for (name, value) in self.config.headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = endpoint.body() {
            builder = builder
                .header("Content-Type", "application/json")
                .body(body.clone());
        }

        Ok(builder.build())
    }
}
