//! Decisions: the unit of pipeline logic.
//!
//! A [`Decision`] pairs a pure predicate ([`Decision::should_apply`]) with
//! an effect ([`Decision::apply`]) that yields exactly one [`Outcome`].
//! The pipeline walks an ordered [`DecisionList`], applies the first
//! decision whose predicate matches, and acts on its outcome.
//!
//! The built-in chain ([`DecisionList::standard`]) is, in order:
//! [`TransportStatus`], [`ParseEnvelope`], [`ServiceStatus`],
//! [`ParsePayload`]. Callers prepend [`Retry`] (or rearrange freely) via
//! [`Endpoint::with_decisions`](crate::Endpoint::with_decisions).

use std::any::Any;
use std::fmt;
use std::future::{self, Future};
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{Endpoint, Error, ErrorCodeTable, Response, ServiceEnvelope};

/// Boxed single-shot future returned by [`Decision::apply`].
pub type DecisionFuture<'a, T> = Pin<Box<dyn Future<Output = Outcome<T>> + Send + 'a>>;

/// The one result a decision's effect yields.
pub enum Outcome<T> {
    /// Advance to the next decision with updated in-flight state.
    Continue(Response, Option<ServiceEnvelope>),
    /// Abandon the pass; issue a fresh transport call and run this list.
    Restart(DecisionList<T>),
    /// Terminate the whole call with a typed error.
    Failed(Error),
    /// Terminate the whole call with the decoded value.
    Done(T),
}

/// One predicate+effect unit in the response-processing chain.
///
/// Predicates must be pure: safe to call repeatedly, in any order, with no
/// side effects. Effects run at most once per pass, only for the first
/// decision whose predicate matched.
pub trait Decision<T>: Send + Sync {
    /// Pure predicate: does this decision apply to the current state?
    fn should_apply(
        &self,
        endpoint: &Endpoint<T>,
        response: &Response,
        envelope: Option<&ServiceEnvelope>,
    ) -> bool;

    /// Perform the decision's effect, yielding exactly one [`Outcome`].
    fn apply<'a>(
        &'a self,
        endpoint: &'a Endpoint<T>,
        response: Response,
        envelope: Option<ServiceEnvelope>,
    ) -> DecisionFuture<'a, T>;

    /// Type-erased self, used by [`DecisionList::replacing`] to locate a
    /// decision by concrete type.
    fn as_any(&self) -> &dyn Any;
}

fn ready<'a, T: Send + 'a>(outcome: Outcome<T>) -> DecisionFuture<'a, T> {
    Box::pin(future::ready(outcome))
}

// ============================================================================
// Decision List
// ============================================================================

/// Ordered sequence of decisions; order is significant.
///
/// The list is never mutated in place while being evaluated: a restart
/// supplies a wholesale replacement built with [`DecisionList::replacing`].
pub struct DecisionList<T> {
    items: Vec<Arc<dyn Decision<T>>>,
}

impl<T> Clone for DecisionList<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T> fmt::Debug for DecisionList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionList")
            .field("len", &self.items.len())
            .finish()
    }
}

impl<T> DecisionList<T> {
    /// Creates a list with no decisions.
    ///
    /// An empty list cannot terminate a pass; running it is a
    /// configuration defect reported as
    /// [`Error::ExhaustedDecisions`](crate::Error::ExhaustedDecisions).
    #[must_use]
    pub const fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends a decision.
    #[must_use]
    pub fn with(mut self, decision: impl Decision<T> + 'static) -> Self {
        self.items.push(Arc::new(decision));
        self
    }

    /// Inserts a decision at the front of the list.
    #[must_use]
    pub fn prepended(mut self, decision: impl Decision<T> + 'static) -> Self {
        self.items.insert(0, Arc::new(decision));
        self
    }

    /// Produces a new list where the first decision of concrete type `D`
    /// is replaced by `replacement`, or removed when `replacement` is
    /// `None`. The original list is untouched.
    #[must_use]
    pub fn replacing<D: 'static>(&self, replacement: Option<Arc<dyn Decision<T>>>) -> Self {
        let mut items = Vec::with_capacity(self.items.len());
        let mut replaced = false;
        for item in &self.items {
            if !replaced && item.as_any().is::<D>() {
                replaced = true;
                if let Some(replacement) = &replacement {
                    items.push(Arc::clone(replacement));
                }
            } else {
                items.push(Arc::clone(item));
            }
        }
        Self { items }
    }

    /// Number of decisions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list holds no decisions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Decision at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arc<dyn Decision<T>>> {
        self.items.get(index)
    }

    /// Iterates over the decisions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<dyn Decision<T>>> {
        self.items.iter()
    }
}

impl<T> DecisionList<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// The default built-in chain with the default error-code table.
    #[must_use]
    pub fn standard() -> Self {
        Self::standard_with_table(ErrorCodeTable::default())
    }

    /// The default built-in chain with a caller-supplied error-code table.
    #[must_use]
    pub fn standard_with_table(table: ErrorCodeTable) -> Self {
        Self::empty()
            .with(TransportStatus)
            .with(ParseEnvelope)
            .with(ServiceStatus::new(table))
            .with(ParsePayload)
    }
}

impl<T> FromIterator<Arc<dyn Decision<T>>> for DecisionList<T> {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Decision<T>>>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Built-in Decisions
// ============================================================================

/// Rejects transport-level failures: applies when the HTTP status is
/// outside `[200, 300)` and fails the call with
/// [`Error::Service`](crate::Error::Service).
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportStatus;

impl<T: Send + 'static> Decision<T> for TransportStatus {
    fn should_apply(
        &self,
        _endpoint: &Endpoint<T>,
        response: &Response,
        _envelope: Option<&ServiceEnvelope>,
    ) -> bool {
        !response.is_success()
    }

    fn apply<'a>(
        &'a self,
        _endpoint: &'a Endpoint<T>,
        response: Response,
        _envelope: Option<ServiceEnvelope>,
    ) -> DecisionFuture<'a, T> {
        ready(Outcome::Failed(Error::service(response.status())))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Decodes the service envelope from the raw body. Always applies;
/// continues with the parsed envelope attached, or fails with
/// [`Error::EnvelopeDecode`](crate::Error::EnvelopeDecode).
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseEnvelope;

impl<T: Send + 'static> Decision<T> for ParseEnvelope {
    fn should_apply(
        &self,
        _endpoint: &Endpoint<T>,
        _response: &Response,
        _envelope: Option<&ServiceEnvelope>,
    ) -> bool {
        true
    }

    fn apply<'a>(
        &'a self,
        _endpoint: &'a Endpoint<T>,
        response: Response,
        _envelope: Option<ServiceEnvelope>,
    ) -> DecisionFuture<'a, T> {
        ready(match response.envelope() {
            Ok(envelope) => Outcome::Continue(response, Some(envelope)),
            Err(error) => Outcome::Failed(error),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Maps service-level error codes into the error domain.
///
/// Applies whenever the envelope's status code is not the canonical
/// success code (including an absent envelope or code). A code found in
/// the table fails with [`Error::Api`](crate::Error::Api); a miss fails
/// with [`Error::UnknownStatusCode`](crate::Error::UnknownStatusCode); an
/// absent envelope fails with
/// [`Error::DataMissing`](crate::Error::DataMissing).
#[derive(Debug, Clone, Default)]
pub struct ServiceStatus {
    table: ErrorCodeTable,
}

impl ServiceStatus {
    /// Creates the decision with a caller-supplied error-code table.
    #[must_use]
    pub const fn new(table: ErrorCodeTable) -> Self {
        Self { table }
    }
}

impl<T: Send + 'static> Decision<T> for ServiceStatus {
    fn should_apply(
        &self,
        _endpoint: &Endpoint<T>,
        _response: &Response,
        envelope: Option<&ServiceEnvelope>,
    ) -> bool {
        !envelope.is_some_and(ServiceEnvelope::is_success)
    }

    fn apply<'a>(
        &'a self,
        _endpoint: &'a Endpoint<T>,
        _response: Response,
        envelope: Option<ServiceEnvelope>,
    ) -> DecisionFuture<'a, T> {
        let error = match envelope {
            None => Error::DataMissing,
            Some(envelope) => match envelope.status_code() {
                Some(code) => match self.table.message(code) {
                    Some(message) => Error::api(code, message.to_owned(), envelope),
                    None => Error::unknown_status(envelope),
                },
                None => Error::unknown_status(envelope),
            },
        };
        ready(Outcome::Failed(error))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Retries transport-level failures a bounded number of times.
///
/// Applies when the HTTP status is outside `[200, 300)` and the remaining
/// counter is positive. Restarts with the endpoint's list where this
/// decision is replaced by its decremented self, or removed once the
/// counter reaches zero, so every restart strictly shrinks the budget and
/// the call terminates.
///
/// Position relative to [`TransportStatus`] is the caller's choice: list
/// order is explicit and whichever comes first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retry {
    left: u32,
}

impl Retry {
    /// Creates the decision with a remaining-retry budget.
    #[must_use]
    pub const fn new(left: u32) -> Self {
        Self { left }
    }

    /// Remaining retries.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.left
    }
}

impl<T: Send + 'static> Decision<T> for Retry {
    fn should_apply(
        &self,
        _endpoint: &Endpoint<T>,
        response: &Response,
        _envelope: Option<&ServiceEnvelope>,
    ) -> bool {
        !response.is_success() && self.left > 0
    }

    fn apply<'a>(
        &'a self,
        endpoint: &'a Endpoint<T>,
        _response: Response,
        _envelope: Option<ServiceEnvelope>,
    ) -> DecisionFuture<'a, T> {
        // The in-flight list only ever diverges from the endpoint's list by
        // this counter, so rebuilding from the endpoint with the decremented
        // value reproduces the current list.
        let next = (self.left > 1)
            .then(|| Arc::new(Self::new(self.left - 1)) as Arc<dyn Decision<T>>);
        ready(Outcome::Restart(endpoint.decisions().replacing::<Self>(next)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Decodes the envelope payload into the caller's expected type.
///
/// Always applies; absent payload fails with
/// [`Error::DataMissing`](crate::Error::DataMissing), a decode failure
/// with [`Error::PayloadDecode`](crate::Error::PayloadDecode), and success
/// completes the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParsePayload;

fn decode_payload<T: DeserializeOwned>(envelope: Option<&ServiceEnvelope>) -> crate::Result<T> {
    let payload = envelope
        .and_then(ServiceEnvelope::payload)
        .ok_or(Error::DataMissing)?;
    // The inner value is re-serialized to bytes before decoding, matching
    // the wire contract that `Data` is an object or array.
    let bytes = crate::to_json(payload)?;
    crate::from_json(&bytes).map_err(|e| Error::payload_decode(e.path, e.message))
}

impl<T: DeserializeOwned + Send + 'static> Decision<T> for ParsePayload {
    fn should_apply(
        &self,
        _endpoint: &Endpoint<T>,
        _response: &Response,
        _envelope: Option<&ServiceEnvelope>,
    ) -> bool {
        true
    }

    fn apply<'a>(
        &'a self,
        _endpoint: &'a Endpoint<T>,
        _response: Response,
        envelope: Option<ServiceEnvelope>,
    ) -> DecisionFuture<'a, T> {
        ready(match decode_payload(envelope.as_ref()) {
            Ok(value) => Outcome::Done(value),
            Err(error) => Outcome::Failed(error),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;

    use super::*;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Fact {
        fact: String,
        length: u32,
    }

    fn endpoint() -> Endpoint<Fact> {
        Endpoint::get("fact")
    }

    fn response(status: u16, body: &str) -> Response {
        Response::new(status, HashMap::new(), Bytes::from(body.to_owned()))
    }

    fn envelope(body: &str) -> ServiceEnvelope {
        crate::from_json(body.as_bytes()).expect("envelope")
    }

    #[test]
    fn transport_status_predicate() {
        let endpoint = endpoint();
        let decision = TransportStatus;

        for status in [200, 204, 299] {
            assert!(!decision.should_apply(&endpoint, &response(status, ""), None));
        }
        for status in [199, 300, 404, 500] {
            assert!(decision.should_apply(&endpoint, &response(status, ""), None));
        }
    }

    #[tokio::test]
    async fn transport_status_fails_with_service_error() {
        let endpoint = endpoint();
        let outcome = TransportStatus.apply(&endpoint, response(500, ""), None).await;

        assert!(matches!(
            outcome,
            Outcome::Failed(Error::Service { status: 500 })
        ));
    }

    #[tokio::test]
    async fn parse_envelope_continues_with_envelope() {
        let endpoint = endpoint();
        let body = r#"{"Message":"ok","StatusCode":200,"Data":{"fact":"x","length":1}}"#;

        assert!(ParseEnvelope.should_apply(&endpoint, &response(200, body), None));

        let outcome = ParseEnvelope.apply(&endpoint, response(200, body), None).await;
        match outcome {
            Outcome::Continue(_, Some(envelope)) => {
                assert_eq!(envelope.status_code(), Some(200));
            }
            _ => panic!("expected Continue with envelope"),
        }
    }

    #[tokio::test]
    async fn parse_envelope_rejects_malformed_body() {
        let endpoint = endpoint();
        let outcome = ParseEnvelope
            .apply(&endpoint, response(200, "not json"), None)
            .await;

        assert!(matches!(
            outcome,
            Outcome::Failed(Error::EnvelopeDecode { .. })
        ));
    }

    #[test]
    fn service_status_predicate() {
        let endpoint = endpoint();
        let decision = ServiceStatus::default();
        let ok = response(200, "");

        let success = envelope(r#"{"StatusCode":200}"#);
        assert!(!decision.should_apply(&endpoint, &ok, Some(&success)));

        let failure = envelope(r#"{"StatusCode":404}"#);
        assert!(decision.should_apply(&endpoint, &ok, Some(&failure)));

        let no_code = envelope("{}");
        assert!(decision.should_apply(&endpoint, &ok, Some(&no_code)));

        assert!(decision.should_apply(&endpoint, &ok, None));
    }

    #[tokio::test]
    async fn service_status_maps_known_codes() {
        let endpoint = endpoint();
        let decision = ServiceStatus::default();
        let env = envelope(r#"{"StatusCode":404}"#);

        let outcome = decision.apply(&endpoint, response(200, ""), Some(env)).await;
        match outcome {
            Outcome::Failed(Error::Api {
                code,
                message,
                envelope,
            }) => {
                assert_eq!(code, 404);
                assert_eq!(message, "not found");
                assert_eq!(envelope.status_code(), Some(404));
            }
            _ => panic!("expected Api error"),
        }
    }

    #[tokio::test]
    async fn service_status_flags_unknown_codes() {
        let endpoint = endpoint();
        let decision = ServiceStatus::default();
        let env = envelope(r#"{"StatusCode":999}"#);

        let outcome = decision.apply(&endpoint, response(200, ""), Some(env)).await;
        assert!(matches!(
            outcome,
            Outcome::Failed(Error::UnknownStatusCode { .. })
        ));

        // Absent code is unknown too.
        let outcome = decision
            .apply(&endpoint, response(200, ""), Some(envelope("{}")))
            .await;
        assert!(matches!(
            outcome,
            Outcome::Failed(Error::UnknownStatusCode { .. })
        ));
    }

    #[tokio::test]
    async fn service_status_requires_envelope() {
        let endpoint = endpoint();
        let outcome = ServiceStatus::default()
            .apply(&endpoint, response(200, ""), None)
            .await;

        assert!(matches!(outcome, Outcome::Failed(Error::DataMissing)));
    }

    #[tokio::test]
    async fn parse_payload_completes_with_value() {
        let endpoint = endpoint();
        let env = envelope(r#"{"StatusCode":200,"Data":{"fact":"x","length":1}}"#);

        let outcome = ParsePayload.apply(&endpoint, response(200, ""), Some(env)).await;
        match outcome {
            Outcome::Done(fact) => assert_eq!(
                fact,
                Fact {
                    fact: "x".to_string(),
                    length: 1,
                }
            ),
            _ => panic!("expected Done"),
        }
    }

    #[tokio::test]
    async fn parse_payload_requires_data() {
        let endpoint = endpoint();

        let outcome = ParsePayload.apply(&endpoint, response(200, ""), None).await;
        assert!(matches!(outcome, Outcome::Failed(Error::DataMissing)));

        let env = envelope(r#"{"StatusCode":200}"#);
        let outcome = ParsePayload.apply(&endpoint, response(200, ""), Some(env)).await;
        assert!(matches!(outcome, Outcome::Failed(Error::DataMissing)));
    }

    #[tokio::test]
    async fn parse_payload_reports_decode_failure() {
        let endpoint = endpoint();
        let env = envelope(r#"{"StatusCode":200,"Data":{"fact":"x"}}"#);

        let outcome = ParsePayload.apply(&endpoint, response(200, ""), Some(env)).await;
        assert!(matches!(
            outcome,
            Outcome::Failed(Error::PayloadDecode { .. })
        ));
    }

    #[test]
    fn retry_predicate_honors_budget() {
        let endpoint = endpoint();

        assert!(Decision::<Fact>::should_apply(
            &Retry::new(1),
            &endpoint,
            &response(500, ""),
            None
        ));
        assert!(!Decision::<Fact>::should_apply(
            &Retry::new(0),
            &endpoint,
            &response(500, ""),
            None
        ));
        assert!(!Decision::<Fact>::should_apply(
            &Retry::new(3),
            &endpoint,
            &response(200, ""),
            None
        ));
    }

    #[tokio::test]
    async fn retry_restarts_with_decremented_self() {
        let endpoint = Endpoint::<Fact>::get("fact").with_retry(2);
        let original_len = endpoint.decisions().len();
        let retry = Retry::new(2);

        let Outcome::Restart(next) = retry.apply(&endpoint, response(500, ""), None).await else {
            panic!("expected Restart");
        };

        assert_eq!(next.len(), original_len);
        let decremented = next
            .iter()
            .find_map(|d| d.as_any().downcast_ref::<Retry>())
            .expect("retry still present");
        assert_eq!(decremented.remaining(), 1);
    }

    #[tokio::test]
    async fn retry_removes_itself_when_exhausted() {
        let endpoint = Endpoint::<Fact>::get("fact").with_retry(1);
        let original_len = endpoint.decisions().len();
        let retry = Retry::new(1);

        let Outcome::Restart(next) = retry.apply(&endpoint, response(500, ""), None).await else {
            panic!("expected Restart");
        };

        assert_eq!(next.len(), original_len - 1);
        assert!(
            next.iter()
                .all(|d| d.as_any().downcast_ref::<Retry>().is_none())
        );
    }

    #[test]
    fn replacing_swaps_first_match_only() {
        let list = DecisionList::<Fact>::empty()
            .with(TransportStatus)
            .with(TransportStatus)
            .with(ParsePayload);

        let swapped =
            list.replacing::<TransportStatus>(Some(Arc::new(Retry::new(5)) as Arc<dyn Decision<Fact>>));
        assert_eq!(swapped.len(), 3);
        assert!(
            swapped
                .get(0)
                .expect("first")
                .as_any()
                .downcast_ref::<Retry>()
                .is_some()
        );
        assert!(
            swapped
                .get(1)
                .expect("second")
                .as_any()
                .downcast_ref::<TransportStatus>()
                .is_some()
        );
    }

    #[test]
    fn replacing_with_none_removes() {
        let list = DecisionList::<Fact>::standard();
        let len = list.len();

        let removed = list.replacing::<ParseEnvelope>(None);
        assert_eq!(removed.len(), len - 1);
        // No match leaves the list unchanged.
        let unchanged = removed.replacing::<ParseEnvelope>(None);
        assert_eq!(unchanged.len(), removed.len());
    }

    #[test]
    fn standard_list_order() {
        let list = DecisionList::<Fact>::standard();
        assert_eq!(list.len(), 4);
        assert!(
            list.get(0)
                .expect("first")
                .as_any()
                .downcast_ref::<TransportStatus>()
                .is_some()
        );
        assert!(
            list.get(3)
                .expect("last")
                .as_any()
                .downcast_ref::<ParsePayload>()
                .is_some()
        );
    }
}
