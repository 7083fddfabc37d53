use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, info};
use serde::Serialize;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time,
};

use super::{ControlHints, StopwatchState};

/// What subscribers receive on every tick and every state-changing operation.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StopwatchSnapshot {
    pub state: StopwatchState,
    pub elapsed_ms: u64,
    pub hints: ControlHints,
}

impl StopwatchSnapshot {
    fn of(state: &StopwatchState) -> Self {
        Self {
            elapsed_ms: state.elapsed_ms,
            hints: state.control_hints(),
            state: state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct StopwatchController {
    state: Arc<Mutex<StopwatchState>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
    updates: watch::Sender<StopwatchSnapshot>,
}

impl Default for StopwatchController {
    fn default() -> Self {
        Self::new()
    }
}

impl StopwatchController {
    pub fn new() -> Self {
        let initial = StopwatchState::new();
        let (updates, _) = watch::channel(StopwatchSnapshot::of(&initial));

        Self {
            state: Arc::new(Mutex::new(initial)),
            ticker: Arc::new(Mutex::new(None)),
            tick_interval: Duration::from_millis(10),
            updates,
        }
    }

    /// Receiver for display updates. The channel always holds the latest
    /// snapshot, so a late subscriber can render immediately.
    pub fn subscribe(&self) -> watch::Receiver<StopwatchSnapshot> {
        self.updates.subscribe()
    }

    pub async fn snapshot(&self) -> StopwatchSnapshot {
        let mut guard = self.state.lock().await;
        guard.sync_elapsed_from_anchor();
        StopwatchSnapshot::of(&guard)
    }

    pub async fn start(&self) {
        {
            let mut state = self.state.lock().await;
            if state.is_running() {
                debug!("start ignored: already running");
                return;
            }
            state.begin_running(Instant::now());
            info!("stopwatch running from {}ms", state.elapsed_ms_baseline);
        }

        self.spawn_ticker().await;
        self.publish().await;
    }

    pub async fn pause(&self) {
        {
            let mut state = self.state.lock().await;
            if !state.is_running() {
                debug!("pause ignored: not running");
                return;
            }
            state.pause();
            info!("stopwatch paused at {}ms", state.elapsed_ms);
        }

        self.cancel_ticker().await;
        self.publish().await;
    }

    /// Dispatches to `pause` or `start`, whichever applies. Bound to the
    /// primary control and the space-bar shortcut.
    pub async fn toggle(&self) {
        let running = self.state.lock().await.is_running();
        if running {
            self.pause().await;
        } else {
            self.start().await;
        }
    }

    /// Allowed in any state; a running reset behaves like pause then reset.
    pub async fn reset(&self) {
        {
            let mut state = self.state.lock().await;
            state.reset();
        }

        self.cancel_ticker().await;
        info!("stopwatch reset");
        self.publish().await;
    }

    pub async fn record_lap(&self) {
        {
            let mut state = self.state.lock().await;
            if !state.is_running() {
                debug!("lap ignored: not running");
                return;
            }
            state.record_lap();
            info!("lap {} recorded at {}ms", state.laps.len(), state.laps[0]);
        }

        self.publish().await;
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let updates = self.updates.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            loop {
                interval.tick().await;

                let snapshot = {
                    let mut guard = state.lock().await;
                    if !guard.is_running() {
                        break;
                    }
                    guard.sync_elapsed_from_anchor();
                    StopwatchSnapshot::of(&guard)
                };

                updates.send_replace(snapshot);
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn publish(&self) {
        let mut guard = self.state.lock().await;
        guard.sync_elapsed_from_anchor();
        self.updates.send_replace(StopwatchSnapshot::of(&guard));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stopwatch::StopwatchStatus;
    use tokio::time::{sleep, timeout};

    #[tokio::test]
    async fn starting_twice_does_not_restart_the_clock() {
        let controller = StopwatchController::new();
        controller.start().await;
        sleep(Duration::from_millis(50)).await;
        controller.start().await;
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.state.status, StopwatchStatus::Running);
        assert!(snapshot.elapsed_ms >= 40);
        controller.reset().await;
    }

    #[tokio::test]
    async fn pause_freezes_the_display_value() {
        let controller = StopwatchController::new();
        controller.start().await;
        sleep(Duration::from_millis(50)).await;
        controller.pause().await;
        let frozen = controller.snapshot().await.elapsed_ms;
        sleep(Duration::from_millis(50)).await;
        assert_eq!(controller.snapshot().await.elapsed_ms, frozen);
        // pausing again changes nothing
        controller.pause().await;
        assert_eq!(controller.snapshot().await.elapsed_ms, frozen);
    }

    #[tokio::test]
    async fn resume_accumulates_across_pauses() {
        let controller = StopwatchController::new();
        controller.start().await;
        sleep(Duration::from_millis(120)).await;
        controller.pause().await;
        let first = controller.snapshot().await.elapsed_ms;
        controller.start().await;
        sleep(Duration::from_millis(80)).await;
        controller.pause().await;
        let total = controller.snapshot().await.elapsed_ms;
        assert!(total >= first + 60, "total {total} first {first}");
        assert!(total < first + 400, "total {total} first {first}");
    }

    #[tokio::test]
    async fn laps_record_most_recent_first_and_only_while_running() {
        let controller = StopwatchController::new();
        controller.record_lap().await;
        assert!(controller.snapshot().await.state.laps.is_empty());

        controller.start().await;
        sleep(Duration::from_millis(30)).await;
        controller.record_lap().await;
        sleep(Duration::from_millis(30)).await;
        controller.record_lap().await;
        controller.pause().await;
        controller.record_lap().await;

        let laps = controller.snapshot().await.state.laps;
        assert_eq!(laps.len(), 2);
        assert!(laps[0] > laps[1]);
    }

    #[tokio::test]
    async fn reset_returns_to_initial_state_and_stops_the_ticker() {
        let controller = StopwatchController::new();
        controller.start().await;
        sleep(Duration::from_millis(30)).await;
        controller.record_lap().await;
        controller.reset().await;

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.state.status, StopwatchStatus::Stopped);
        assert_eq!(snapshot.elapsed_ms, 0);
        assert!(snapshot.state.laps.is_empty());

        // no leaked ticker keeps advancing the clock
        sleep(Duration::from_millis(50)).await;
        assert_eq!(controller.snapshot().await.elapsed_ms, 0);

        // reset while already stopped is a no-op, not an error
        controller.reset().await;
        assert_eq!(controller.snapshot().await.elapsed_ms, 0);
    }

    #[tokio::test]
    async fn toggle_alternates_between_running_and_stopped() {
        let controller = StopwatchController::new();
        controller.toggle().await;
        assert_eq!(
            controller.snapshot().await.state.status,
            StopwatchStatus::Running
        );
        controller.toggle().await;
        assert_eq!(
            controller.snapshot().await.state.status,
            StopwatchStatus::Stopped
        );
    }

    #[tokio::test]
    async fn subscribers_observe_state_changes_and_ticks() {
        let controller = StopwatchController::new();
        let mut updates = controller.subscribe();

        controller.start().await;
        timeout(Duration::from_millis(200), updates.changed())
            .await
            .expect("no update after start")
            .expect("sender dropped");
        assert_eq!(
            updates.borrow_and_update().state.status,
            StopwatchStatus::Running
        );

        // ticks keep flowing while running
        timeout(Duration::from_millis(200), updates.changed())
            .await
            .expect("no tick while running")
            .expect("sender dropped");

        controller.pause().await;
        sleep(Duration::from_millis(30)).await;
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.state.status, StopwatchStatus::Stopped);
        assert_eq!(snapshot.hints.primary_label.as_str(), "Resume");
    }
}
