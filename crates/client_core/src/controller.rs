//! Interaction state machine behind the prediction form.

use std::{str::FromStr, sync::Arc};

use parking_lot::Mutex;
use shared::{
    domain::{PredictionResult, ThemeKey},
    error::Failure,
    protocol::PredictReply,
};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    classifier::Classifier,
    error::{ClassifyError, UnknownOverlapPolicy},
};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// What `submit` does while an earlier request is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// New submissions are dropped until the in-flight request settles.
    #[default]
    IgnoreWhilePending,
    /// Every submission dispatches; whichever reply settles last is kept.
    LastWriteWins,
}

impl OverlapPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IgnoreWhilePending => "ignore_while_pending",
            Self::LastWriteWins => "last_write_wins",
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = UnknownOverlapPolicy;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ignore_while_pending" | "ignore" => Ok(Self::IgnoreWhilePending),
            "last_write_wins" | "overlap" => Ok(Self::LastWriteWins),
            _ => Err(UnknownOverlapPolicy(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Succeeded(PredictionResult),
    Failed(Failure),
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn theme_key(&self) -> ThemeKey {
        ThemeKey::for_result(self.result())
    }
}

/// Everything a view reads, captured at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub input_text: String,
    pub is_loading: bool,
    pub result: Option<PredictionResult>,
    pub error_message: Option<String>,
    pub theme_key: ThemeKey,
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    StateChanged(ViewState),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Blank input; the state is `Failed` and nothing was sent.
    Rejected,
    /// A request was already in flight under [`OverlapPolicy::IgnoreWhilePending`].
    Ignored,
    /// The state is `Pending`; the handle completes once the reply is applied.
    Dispatched(JoinHandle<()>),
}

#[derive(Default)]
struct ControllerState {
    input_text: String,
    request: RequestState,
    submissions: u64,
}

impl ControllerState {
    fn view(&self) -> ViewState {
        ViewState {
            input_text: self.input_text.clone(),
            is_loading: self.request.is_pending(),
            result: self.request.result().cloned(),
            error_message: self.request.failure().map(|failure| failure.message.clone()),
            theme_key: self.request.theme_key(),
        }
    }
}

pub struct PredictionController {
    classifier: Arc<dyn Classifier>,
    policy: OverlapPolicy,
    state: Mutex<ControllerState>,
    events: broadcast::Sender<ControllerEvent>,
}

impl PredictionController {
    pub fn new(classifier: Arc<dyn Classifier>, policy: OverlapPolicy) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            classifier,
            policy,
            state: Mutex::new(ControllerState::default()),
            events,
        })
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    /// Replaces the input text. A visible result or error stays until the
    /// next submission.
    pub fn set_text(&self, value: impl Into<String>) {
        let value = value.into();
        let mut state = self.state.lock();
        if state.input_text == value {
            return;
        }
        state.input_text = value;
        self.publish(&state);
    }

    /// Validates the current input and, if it is not blank, moves to
    /// `Pending` and sends it on a spawned task. The state transition happens
    /// before this returns; must be called from within a tokio runtime.
    pub fn submit(self: &Arc<Self>) -> SubmitOutcome {
        let (submission, text) = {
            let mut state = self.state.lock();
            if self.policy == OverlapPolicy::IgnoreWhilePending && state.request.is_pending() {
                debug!("submission ignored while a prediction is in flight");
                return SubmitOutcome::Ignored;
            }

            if state.input_text.trim().is_empty() {
                state.request = RequestState::Failed(Failure::empty_input());
                self.publish(&state);
                debug!("submission rejected: blank input");
                return SubmitOutcome::Rejected;
            }

            state.request = RequestState::Pending;
            state.submissions += 1;
            self.publish(&state);
            (state.submissions, state.input_text.clone())
        };

        debug!(
            submission,
            chars = text.chars().count(),
            "dispatching prediction request"
        );
        let mut guard = UnsettledGuard {
            controller: Arc::clone(self),
            submission,
            armed: true,
        };
        let handle = tokio::spawn(async move {
            let outcome = guard.controller.classifier.classify(&text).await;
            guard.controller.settle(submission, outcome);
            guard.armed = false;
        });
        SubmitOutcome::Dispatched(handle)
    }

    /// Submits and waits for the dispatched request, if any, to settle.
    pub async fn submit_and_wait(self: &Arc<Self>) -> ViewState {
        if let SubmitOutcome::Dispatched(handle) = self.submit() {
            if let Err(err) = handle.await {
                debug!(%err, "prediction task did not complete");
            }
        }
        self.view()
    }

    pub fn view(&self) -> ViewState {
        self.state.lock().view()
    }

    pub fn request_state(&self) -> RequestState {
        self.state.lock().request.clone()
    }

    pub fn input_text(&self) -> String {
        self.state.lock().input_text.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().request.is_pending()
    }

    pub fn result(&self) -> Option<PredictionResult> {
        self.state.lock().request.result().cloned()
    }

    pub fn failure(&self) -> Option<Failure> {
        self.state.lock().request.failure().cloned()
    }

    pub fn error_message(&self) -> Option<String> {
        self.failure().map(|failure| failure.message)
    }

    pub fn theme_key(&self) -> ThemeKey {
        self.state.lock().request.theme_key()
    }

    fn settle(&self, submission: u64, outcome: Result<PredictReply, ClassifyError>) {
        let next = match outcome {
            Ok(PredictReply::Prediction(result)) => {
                info!(
                    submission,
                    label = %result.label,
                    confidence = result.confidence,
                    "prediction received"
                );
                RequestState::Succeeded(result)
            }
            Ok(PredictReply::Error(message)) => {
                info!(submission, %message, "classifier reported an error");
                RequestState::Failed(Failure::application(message))
            }
            Err(err) => {
                warn!(submission, error = %err, "prediction request failed");
                RequestState::Failed(err.failure())
            }
        };

        let mut state = self.state.lock();
        state.request = next;
        self.publish(&state);
    }

    fn fail_if_pending(&self) {
        let mut state = self.state.lock();
        if !state.request.is_pending() {
            return;
        }
        state.request = RequestState::Failed(Failure::transport());
        self.publish(&state);
    }

    /// Sent while the state lock is held so subscribers see transitions in
    /// the order they were applied.
    fn publish(&self, state: &ControllerState) {
        let _ = self.events.send(ControllerEvent::StateChanged(state.view()));
    }
}

/// Lives inside the spawned round trip. If the task panics or is aborted
/// before settling, a still-`Pending` controller falls back to the
/// transport failure.
struct UnsettledGuard {
    controller: Arc<PredictionController>,
    submission: u64,
    armed: bool,
}

impl Drop for UnsettledGuard {
    fn drop(&mut self) {
        if self.armed {
            warn!(
                submission = self.submission,
                "prediction task ended without settling"
            );
            self.controller.fail_if_pending();
        }
    }
}
