//! The pipeline runner.
//!
//! [`run`] drives one logical call to completion across possibly many
//! transport attempts. Each pass walks the decision list strictly in
//! order, applies the first decision whose predicate matches, and acts on
//! its [`Outcome`]: `Continue` keeps walking the same pass with updated
//! state, `Restart` loops back to a fresh transport call with a new list,
//! `Failed`/`Done` terminate the call exactly once.
//!
//! Cancellation is dropping the returned future: the in-flight transport
//! call is aborted with it and no result is ever delivered.

use tracing::{debug, warn};

use crate::{DecisionList, Endpoint, Error, Outcome, Request, Response, Result, Transport};

/// Result of one pass over the decision list.
enum Verdict<T> {
    Done(T),
    Failed(Error),
    Restart(DecisionList<T>),
}

/// Drive one logical call to a terminal result.
///
/// Issues a transport call, evaluates the endpoint's decision list against
/// the response, and repeats with the replacement list on every restart.
/// Transport failures bypass the decision chain entirely.
///
/// # Errors
///
/// Returns the typed error a decision terminated with, the transport
/// failure as-is, or [`Error::ExhaustedDecisions`] when a pass runs out of
/// decisions without reaching a terminal outcome.
pub async fn run<T, C>(transport: &C, endpoint: &Endpoint<T>, request: Request) -> Result<T>
where
    T: Send,
    C: Transport,
{
    let mut decisions = endpoint.decisions().clone();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        debug!(
            attempt,
            method = %request.method(),
            url = %request.url(),
            "issuing transport call"
        );

        // A transport failure is terminal immediately; decisions only ever
        // see real HTTP responses.
        let response = transport.perform(request.clone()).await.inspect_err(|error| {
            warn!(%error, attempt, "transport call failed");
        })?;

        match evaluate(endpoint, response, &decisions).await {
            Verdict::Done(value) => return Ok(value),
            Verdict::Failed(error) => return Err(error),
            Verdict::Restart(next) => {
                debug!(attempt, "restarting with a new decision list");
                decisions = next;
            }
        }
    }
}

/// Evaluate one pass: first applicable decision wins per step.
async fn evaluate<T: Send>(
    endpoint: &Endpoint<T>,
    mut response: Response,
    decisions: &DecisionList<T>,
) -> Verdict<T> {
    let mut envelope = None;
    let mut index = 0;

    while let Some(decision) = decisions.get(index) {
        index += 1;

        if !decision.should_apply(endpoint, &response, envelope.as_ref()) {
            continue;
        }

        debug!(step = index, "applying decision");
        match decision.apply(endpoint, response, envelope).await {
            Outcome::Continue(next_response, next_envelope) => {
                response = next_response;
                envelope = next_envelope;
            }
            Outcome::Restart(next) => return Verdict::Restart(next),
            Outcome::Failed(error) => return Verdict::Failed(error),
            Outcome::Done(value) => return Verdict::Done(value),
        }
    }

    // Running off the end means the caller assembled a list that cannot
    // terminate; report the configuration defect instead of guessing.
    warn!("decision list exhausted without a terminal outcome");
    Verdict::Failed(Error::ExhaustedDecisions)
}
