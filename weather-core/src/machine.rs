//! The query view-state machine.
//!
//! One machine owns one [`ViewState`]. Events are applied strictly in order by
//! whoever drives it; the only suspension point is the backend call between
//! [`QueryStateMachine::begin_submit`] and [`QueryStateMachine::settle`].

use tracing::debug;

use crate::{
    backend::{Backend, dispatch},
    classifier::Outcome,
    model::{ErrorKind, Query, ViewState},
};

/// Identifies one entry into `Loading`. A reply is only applied while the
/// machine is still in the `Loading` state its ticket was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// A query that has been accepted and is waiting for its single backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub ticket: Ticket,
    pub query: Query,
}

impl PendingQuery {
    /// Issue the outbound call and classify the reply. Never fails.
    pub async fn dispatch<B: Backend + ?Sized>(&self, backend: &B) -> Outcome {
        dispatch(backend, &self.query).await
    }
}

#[derive(Debug, Default)]
pub struct QueryStateMachine {
    state: ViewState,
    /// Ticket of the current `Loading` episode, if any.
    in_flight: Option<Ticket>,
    next_ticket: u64,
    requests_issued: u64,
}

impl QueryStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Number of queries this machine has accepted for sending.
    pub fn requests_issued(&self) -> u64 {
        self.requests_issued
    }

    /// Replace the pending input. Ignored unless idle.
    pub fn edit_input(&mut self, text: impl Into<String>) {
        if let ViewState::Idle { input_text } = &mut self.state {
            *input_text = text.into();
        }
    }

    /// Accept the pending input and enter `Loading`.
    ///
    /// Returns `None`, leaving the state untouched, when not idle or when the
    /// input is blank.
    pub fn begin_submit(&mut self) -> Option<PendingQuery> {
        let ViewState::Idle { input_text } = &self.state else {
            return None;
        };
        let query = Query::parse(input_text)?;

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        self.requests_issued += 1;
        self.state = ViewState::Loading;

        debug!(ticket = ticket.0, "query submitted");
        Some(PendingQuery { ticket, query })
    }

    /// Commit the outcome of a dispatched query.
    ///
    /// Returns `false` and drops the outcome when the ticket is stale.
    pub fn settle(&mut self, ticket: Ticket, outcome: Outcome) -> bool {
        if !self.state.is_loading() || self.in_flight != Some(ticket) {
            debug!(ticket = ticket.0, "discarding stale backend reply");
            return false;
        }

        self.in_flight = None;
        self.state = match outcome {
            Outcome::Structured(snapshot) => ViewState::Result { snapshot },
            Outcome::Rejected(message) => ViewState::Error {
                kind: ErrorKind::Rejected,
                message,
            },
            Outcome::TransportFailure(message) => ViewState::Error {
                kind: ErrorKind::TransportFailure,
                message,
            },
        };

        debug!(ticket = ticket.0, state = ?self.state, "query settled");
        true
    }

    /// Submit the pending input, wait for the backend and commit the result.
    ///
    /// Exactly one backend call is made when the input is accepted; none
    /// otherwise. Returns whether a request was issued.
    pub async fn submit<B: Backend + ?Sized>(&mut self, backend: &B) -> bool {
        let Some(pending) = self.begin_submit() else {
            return false;
        };

        let outcome = pending.dispatch(backend).await;
        self.settle(pending.ticket, outcome);
        true
    }

    /// Go back to a fresh, empty `Idle` from `Result` or `Error`.
    pub fn reset(&mut self) {
        if matches!(self.state, ViewState::Result { .. } | ViewState::Error { .. }) {
            self.state = ViewState::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        aqi::AqiTier,
        classifier::{TRANSPORT_FAILURE_MESSAGE, UNSUPPORTED_QUERY_MESSAGE},
        error::TransportError,
    };
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct FakeBackend {
        reply: Result<String, StatusCode>,
        sent: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn replying(body: serde_json::Value) -> Self {
            Self {
                reply: Ok(body.to_string()),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: StatusCode) -> Self {
            Self {
                reply: Err(status),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn send(&self, query: &Query) -> Result<String, TransportError> {
            self.sent.lock().expect("lock").push(query.as_str().to_string());
            match &self.reply {
                Ok(body) => Ok(body.clone()),
                Err(status) => Err(TransportError::Status {
                    status: *status,
                    body: String::new(),
                }),
            }
        }
    }

    fn pune() -> FakeBackend {
        FakeBackend::replying(json!({
            "weather": {
                "location": "Pune",
                "summary": "Clear skies",
                "temperature": "28°C",
                "rainfall": "0mm",
                "humidity": "40%",
                "aqi": "42",
            }
        }))
    }

    fn idle(text: &str) -> ViewState {
        ViewState::Idle {
            input_text: text.to_string(),
        }
    }

    fn structured(location: &str) -> Outcome {
        Outcome::Structured(crate::model::WeatherSnapshot {
            location: location.into(),
            summary: "Sunny".into(),
            temperature: None,
            rainfall: None,
            humidity: None,
            aqi: None,
        })
    }

    #[test]
    fn starts_idle_with_empty_input() {
        let machine = QueryStateMachine::new();
        assert_eq!(machine.state(), &idle(""));
        assert_eq!(machine.requests_issued(), 0);
    }

    #[test]
    fn edit_input_is_idempotent() {
        let mut machine = QueryStateMachine::new();

        machine.edit_input("rain in Mumbai?");
        let first = machine.state().clone();
        machine.edit_input("rain in Mumbai?");

        assert_eq!(machine.state(), &first);
        assert_eq!(machine.state(), &idle("rain in Mumbai?"));
    }

    #[test]
    fn blank_submit_is_a_silent_no_op() {
        for text in ["", "   ", "\n\t "] {
            let mut machine = QueryStateMachine::new();
            machine.edit_input(text);

            assert!(machine.begin_submit().is_none());
            assert_eq!(machine.state(), &idle(text));
            assert_eq!(machine.requests_issued(), 0);
        }
    }

    #[test]
    fn submit_clears_input_and_enters_loading() {
        let mut machine = QueryStateMachine::new();
        machine.edit_input("  weather in Pune  ");

        let pending = machine.begin_submit().expect("accepted");

        assert_eq!(pending.query.as_str(), "weather in Pune");
        assert_eq!(machine.state(), &ViewState::Loading);
        assert!(machine.state().snapshot().is_none());
        assert!(machine.state().error_message().is_none());
        assert_eq!(machine.requests_issued(), 1);
    }

    #[test]
    fn input_is_ignored_while_loading() {
        let mut machine = QueryStateMachine::new();
        machine.edit_input("weather in Pune");
        let pending = machine.begin_submit().expect("accepted");

        machine.edit_input("something else");
        assert_eq!(machine.state(), &ViewState::Loading);
        assert!(machine.begin_submit().is_none());
        assert_eq!(machine.requests_issued(), 1);

        assert!(machine.settle(pending.ticket, structured("Pune")));
        assert_eq!(machine.state().snapshot().map(|s| s.location.as_str()), Some("Pune"));
    }

    #[test]
    fn reset_only_applies_to_result_and_error() {
        let mut machine = QueryStateMachine::new();
        machine.edit_input("draft");
        machine.reset();
        assert_eq!(machine.state(), &idle("draft"));

        let pending = machine.begin_submit().expect("accepted");
        machine.reset();
        assert_eq!(machine.state(), &ViewState::Loading);

        machine.settle(pending.ticket, Outcome::Rejected("nope".into()));
        machine.reset();
        assert_eq!(machine.state(), &idle(""));

        machine.edit_input("weather in Pune");
        let pending = machine.begin_submit().expect("accepted");
        machine.settle(pending.ticket, structured("Pune"));
        machine.reset();
        assert_eq!(machine.state(), &idle(""));
    }

    #[test]
    fn stale_ticket_cannot_overwrite_newer_state() {
        let mut machine = QueryStateMachine::new();
        machine.edit_input("weather in Pune");
        let first = machine.begin_submit().expect("accepted");
        assert!(machine.settle(first.ticket, structured("Pune")));
        machine.reset();

        machine.edit_input("weather in Delhi");
        let second = machine.begin_submit().expect("accepted");
        assert_ne!(first.ticket, second.ticket);

        assert!(!machine.settle(first.ticket, structured("Pune")));
        assert_eq!(machine.state(), &ViewState::Loading);

        assert!(machine.settle(second.ticket, structured("Delhi")));
        assert!(!machine.settle(second.ticket, Outcome::transport_failure()));
        assert_eq!(machine.state().snapshot().map(|s| s.location.as_str()), Some("Delhi"));
    }

    #[tokio::test]
    async fn structured_reply_becomes_result() {
        let backend = pune();
        let mut machine = QueryStateMachine::new();
        machine.edit_input("How is the weather in Pune?");

        assert!(machine.submit(&backend).await);

        let snapshot = machine.state().snapshot().expect("result state");
        assert_eq!(snapshot.location, "Pune");
        assert_eq!(snapshot.summary, "Clear skies");
        assert_eq!(snapshot.aqi_tier(), Some(AqiTier::Good));
        assert_eq!(backend.sent(), vec!["How is the weather in Pune?".to_string()]);
    }

    #[tokio::test]
    async fn plain_reply_becomes_rejected_error() {
        let backend = FakeBackend::replying(json!({ "response": UNSUPPORTED_QUERY_MESSAGE }));
        let mut machine = QueryStateMachine::new();
        machine.edit_input("tell me a joke");

        machine.submit(&backend).await;

        assert_eq!(
            machine.state(),
            &ViewState::Error {
                kind: ErrorKind::Rejected,
                message: UNSUPPORTED_QUERY_MESSAGE.into(),
            }
        );
    }

    #[tokio::test]
    async fn server_error_becomes_transport_failure() {
        let backend = FakeBackend::failing(StatusCode::INTERNAL_SERVER_ERROR);
        let mut machine = QueryStateMachine::new();
        machine.edit_input("weather in Pune");

        machine.submit(&backend).await;

        assert_eq!(
            machine.state(),
            &ViewState::Error {
                kind: ErrorKind::TransportFailure,
                message: TRANSPORT_FAILURE_MESSAGE.into(),
            }
        );
        assert_eq!(backend.sent().len(), 1);
    }

    #[tokio::test]
    async fn blank_submit_never_calls_backend() {
        let backend = pune();
        let mut machine = QueryStateMachine::new();
        machine.edit_input("    ");

        assert!(!machine.submit(&backend).await);
        assert!(backend.sent().is_empty());
        assert_eq!(machine.state(), &idle("    "));
    }

    #[tokio::test]
    async fn submit_from_result_is_ignored_until_reset() {
        let backend = pune();
        let mut machine = QueryStateMachine::new();
        machine.edit_input("weather in Pune");
        machine.submit(&backend).await;

        assert!(!machine.submit(&backend).await);
        assert_eq!(backend.sent().len(), 1);

        machine.reset();
        machine.edit_input("weather in Pune again");
        assert!(machine.submit(&backend).await);
        assert_eq!(backend.sent().len(), 2);
        assert_eq!(machine.requests_issued(), 2);
    }
}
