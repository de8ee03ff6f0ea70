use crate::app::notice::{Notice, Toast};
use crate::error::NetworkError;
use crate::network::{PollResult, TrayBackend};
use crate::tray::{Tally, TrayCollection, merge};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Polling,
    CheckingOut,
}

/// Result of a spawned network action, applied back on the controller.
#[derive(Debug)]
pub enum ActionOutcome {
    Polled {
        generation: u64,
        result: Result<PollResult, NetworkError>,
    },
    CheckedOut {
        generation: u64,
        result: Result<(), NetworkError>,
    },
}

/// Everything the dashboard shows besides the video frame.
#[derive(Debug, Clone)]
pub struct DashboardState {
    tray: TrayCollection,
    activity: Activity,
    notice: Option<Notice>,
    toast: Option<Toast>,
    // Bumped on every clear so results started before it can be recognized.
    generation: u64,
}

impl DashboardState {
    fn new() -> Self {
        Self {
            tray: TrayCollection::new(),
            activity: Activity::Idle,
            notice: None,
            toast: None,
            generation: 0,
        }
    }

    fn clear_tray(&mut self) {
        self.tray.clear();
        self.generation += 1;
    }

    pub fn tray(&self) -> &TrayCollection {
        &self.tray
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }
}

pub struct DashboardController {
    state: DashboardState,
    backend: Arc<dyn TrayBackend>,
    outcome_tx: mpsc::Sender<ActionOutcome>,
    outcome_rx: mpsc::Receiver<ActionOutcome>,
    cancel_token: CancellationToken,
}

impl DashboardController {
    pub fn new(backend: Arc<dyn TrayBackend>) -> Self {
        // At most one action is in flight at a time.
        let (outcome_tx, outcome_rx) = mpsc::channel(4);
        Self {
            state: DashboardState::new(),
            backend,
            outcome_tx,
            outcome_rx,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn tally(&self) -> Tally {
        self.state.tray.tally()
    }

    pub fn is_active(&self) -> bool {
        !self.cancel_token.is_cancelled()
    }

    pub fn can_request_next(&self) -> bool {
        self.is_active() && self.state.activity == Activity::Idle
    }

    pub fn can_checkout(&self) -> bool {
        self.can_request_next() && !self.state.tray.is_empty()
    }

    pub fn can_reset(&self) -> bool {
        self.can_checkout()
    }

    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self
            .state
            .toast
            .as_ref()
            .is_some_and(|toast| toast.is_expired_at(now))
        {
            self.state.toast = None;
        }
    }

    /// Starts a poll. Returns `false` when the request was ignored.
    pub fn request_next(&mut self) -> bool {
        if !self.can_request_next() {
            debug!("Ignoring next request while {:?}", self.state.activity);
            return false;
        }
        self.state.activity = Activity::Polling;

        let backend = self.backend.clone();
        let outcome_tx = self.outcome_tx.clone();
        let cancel_token = self.cancel_token.clone();
        let generation = self.state.generation;
        let span = info_span!("poll", action_id = %Uuid::new_v4());
        tokio::spawn(
            async move {
                tokio::select! {
                    _ = cancel_token.cancelled() => debug!("Poll abandoned on shutdown"),
                    result = backend.poll_next() => {
                        let _ = outcome_tx.send(ActionOutcome::Polled { generation, result }).await;
                    }
                }
            }
            .instrument(span),
        );
        true
    }

    /// Starts a checkout of the current tray. Returns `false` when the
    /// request was ignored.
    pub fn request_checkout(&mut self) -> bool {
        if !self.can_checkout() {
            debug!(
                "Ignoring checkout request ({:?}, {} items)",
                self.state.activity,
                self.state.tray.len()
            );
            return false;
        }
        self.state.activity = Activity::CheckingOut;

        let backend = self.backend.clone();
        let outcome_tx = self.outcome_tx.clone();
        let cancel_token = self.cancel_token.clone();
        let generation = self.state.generation;
        let items = self.state.tray.items().to_vec();
        let span = info_span!("checkout", action_id = %Uuid::new_v4(), items = items.len());
        tokio::spawn(
            async move {
                tokio::select! {
                    _ = cancel_token.cancelled() => debug!("Checkout abandoned on shutdown"),
                    result = backend.submit(items) => {
                        let _ = outcome_tx.send(ActionOutcome::CheckedOut { generation, result }).await;
                    }
                }
            }
            .instrument(span),
        );
        true
    }

    /// Clears the tray. Returns `false` when there was nothing to clear or
    /// an action is in flight.
    pub fn request_reset(&mut self) -> bool {
        if !self.can_reset() {
            debug!("Ignoring reset request");
            return false;
        }
        info!("Tray reset with {} items", self.state.tray.len());
        self.state.clear_tray();
        self.state.notice = Some(Notice::tray_cleared());
        true
    }

    /// Applies every outcome that has already arrived. Never blocks.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.outcome_rx.try_recv() {
                Ok(outcome) => {
                    self.apply(outcome);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    error!("Outcome channel disconnected");
                    break;
                }
            }
        }
        applied
    }

    /// Waits for the in-flight action, if any, and applies its outcome.
    pub async fn settle(&mut self) {
        if self.state.activity == Activity::Idle || !self.is_active() {
            return;
        }
        if let Some(outcome) = self.outcome_rx.recv().await {
            self.apply(outcome);
        }
    }

    pub fn shutdown(&mut self) {
        if self.is_active() {
            info!("Shutting down dashboard controller");
            self.cancel_token.cancel();
        }
    }

    fn apply(&mut self, outcome: ActionOutcome) {
        if !self.is_active() {
            debug!("Dropping outcome after shutdown");
            return;
        }
        self.state.activity = Activity::Idle;
        // Clears only happen from Idle, so this never fires today. It keeps a
        // result from landing on a tray cleared after the action started.
        match outcome {
            ActionOutcome::Polled { generation, result } => {
                if generation != self.state.generation {
                    warn!("Discarding poll result started before the tray was cleared");
                    return;
                }
                self.apply_poll(result);
            }
            ActionOutcome::CheckedOut { generation, result } => {
                if generation != self.state.generation {
                    warn!("Discarding checkout result for a tray that was already cleared");
                    return;
                }
                self.apply_checkout(result);
            }
        }
    }

    fn apply_poll(&mut self, result: Result<PollResult, NetworkError>) {
        match result {
            Err(e) => {
                error!("Next failed: {}", e);
                self.state.notice = Some(Notice::poll_failed(&e));
            }
            Ok(poll) if poll.alert_raised => {
                warn!("Backend raised a tray alert, {} items ignored", poll.items.len());
                self.state.notice = Some(Notice::tray_alert());
            }
            Ok(poll) if poll.items.is_empty() => {
                info!("Poll returned no items");
                self.state.toast = Some(Toast::no_donuts());
            }
            Ok(poll) => {
                debug!("Adding {} items to the tray", poll.items.len());
                let tray = std::mem::take(&mut self.state.tray);
                self.state.tray = merge(tray, poll.items);
            }
        }
    }

    fn apply_checkout(&mut self, result: Result<(), NetworkError>) {
        match result {
            Ok(()) => {
                info!("Checkout of {} items succeeded", self.state.tray.len());
                self.state.clear_tray();
                self.state.notice = Some(Notice::checkout_succeeded());
            }
            Err(e) => {
                error!("Checkout failed: {}", e);
                self.state.notice = Some(Notice::checkout_failed());
            }
        }
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
