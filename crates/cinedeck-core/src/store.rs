//! Intent dispatch, switch-to-latest cancellation and the reducer task.
//!
//! Each dispatched intent runs its handler on a spawned task against a
//! snapshot of the state. Outcomes flow through one channel into a single
//! reducer task, so events are applied one at a time in arrival order.
//! Dispatching an intent whose [`IntentKey`] matches an in-flight one
//! aborts the in-flight task; its outcome is never applied.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use cinedeck_api::tmdb::TmdbApi;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, RwLock, broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::handlers;
use crate::intent::{Event, Intent, IntentKey, Outcome};
use crate::state::AppState;

/// Capacity of the event broadcast channel.
const EVENT_CAPACITY: usize = 256;

/// Owns the state and runs handlers for dispatched intents.
///
/// Must be created inside a Tokio runtime.
#[derive(Debug)]
pub struct Store<A> {
    inner: Arc<Inner<A>>,
}

#[derive(Debug)]
struct Inner<A> {
    api: Arc<A>,
    state: Arc<RwLock<AppState>>,
    outcomes: mpsc::UnboundedSender<Outcome>,
    events: broadcast::Sender<Event>,
    in_flight: Mutex<HashMap<IntentKey, JoinHandle<()>>>,
}

impl<A> Store<A>
where
    A: TmdbApi + Sync + 'static,
{
    /// Creates a store with empty state.
    pub fn new(api: A) -> Self {
        Self::with_state(api, AppState::default())
    }

    /// Creates a store seeded with `state` (e.g. a persisted session).
    pub fn with_state(api: A, state: AppState) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let state = Arc::new(RwLock::new(state));

        let inner = Arc::new(Inner {
            api: Arc::new(api),
            state: Arc::clone(&state),
            outcomes: outcome_tx,
            events: events.clone(),
            in_flight: Mutex::new(HashMap::new()),
        });
        tokio::spawn(reduce(Arc::downgrade(&inner), state, events, outcome_rx));

        Self { inner }
    }

    /// Dispatches an intent; its outcome is applied asynchronously.
    pub async fn dispatch(&self, intent: Intent) {
        self.inner.dispatch(intent).await;
    }

    /// Subscribes to applied events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.events.subscribe()
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> AppState {
        self.inner.state.read().await.clone()
    }

    /// Dispatches `intent` and waits for the first applied event matching
    /// `done`.
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout` elapses first or the store shuts down.
    pub async fn dispatch_until<F>(
        &self,
        intent: Intent,
        timeout: Duration,
        mut done: F,
    ) -> Result<Event>
    where
        F: FnMut(&Event) -> bool,
    {
        let mut events = self.subscribe();
        self.dispatch(intent).await;

        let wait = async {
            loop {
                match events.recv().await {
                    Ok(event) if done(&event) => return Ok(event),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped = skipped, "event subscriber lagged");
                    }
                    Err(RecvError::Closed) => bail!("store shut down before the intent settled"),
                }
            }
        };
        tokio::time::timeout(timeout, wait)
            .await
            .with_context(|| format!("no terminal event within {}s", timeout.as_secs()))?
    }

    /// Dispatches `intent` and waits for its terminal event.
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout` elapses first or the store shuts down.
    pub async fn run(&self, intent: Intent, timeout: Duration) -> Result<Event> {
        let pending = intent.clone();
        self.dispatch_until(intent, timeout, |event| pending.is_settled_by(event))
            .await
    }
}

impl<A> Inner<A>
where
    A: TmdbApi + Sync + 'static,
{
    async fn dispatch(&self, intent: Intent) {
        let key = intent.key();
        // Held until the handle is registered so same-key dispatches
        // register in the order they start.
        let mut in_flight = self.in_flight.lock().await;
        let snapshot = {
            let mut state = self.state.write().await;
            state.begin(&intent);
            state.clone()
        };

        let api = Arc::clone(&self.api);
        let outcomes = self.outcomes.clone();
        let handle = tokio::spawn(async move {
            let outcome = handlers::handle(api.as_ref(), &snapshot, intent).await;
            if outcomes.send(outcome).is_err() {
                tracing::debug!("reducer stopped, outcome dropped");
            }
        });

        in_flight.retain(|_, task| !task.is_finished());
        if let Some(previous) = in_flight.insert(key, handle) {
            tracing::debug!(key = ?key, "superseding in-flight intent");
            previous.abort();
        }
        drop(in_flight);
        tracing::debug!(key = ?key, "intent dispatched");
    }
}

/// Applies outcomes one at a time and re-dispatches follow-ups.
async fn reduce<A>(
    inner: Weak<Inner<A>>,
    state: Arc<RwLock<AppState>>,
    events: broadcast::Sender<Event>,
    mut outcomes: mpsc::UnboundedReceiver<Outcome>,
) where
    A: TmdbApi + Sync + 'static,
{
    while let Some(outcome) = outcomes.recv().await {
        match outcome {
            Outcome::Event(event) => {
                state.write().await.apply(&event);
                log_applied(&event);
                // No subscribers is fine.
                let _ = events.send(event);
            }
            Outcome::FollowUp(intent) => {
                let Some(inner) = inner.upgrade() else {
                    break;
                };
                tracing::debug!(key = ?intent.key(), "dispatching follow-up");
                inner.dispatch(intent).await;
            }
        }
    }
    tracing::debug!("reducer stopped");
}

fn log_applied(event: &Event) {
    match event.failure() {
        Some(error) => tracing::warn!(event = event.label(), %error, "failure applied"),
        None => tracing::debug!(event = event.label(), "event applied"),
    }
}
