use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StopwatchStatus {
    Stopped,
    Running,
}

impl Default for StopwatchStatus {
    fn default() -> Self {
        StopwatchStatus::Stopped
    }
}

/// Label the UI should put on the primary control.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PrimaryLabel {
    Start,
    Resume,
    Pause,
}

impl PrimaryLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryLabel::Start => "Start",
            PrimaryLabel::Resume => "Resume",
            PrimaryLabel::Pause => "Pause",
        }
    }
}

/// Enablement rules for the lap and reset controls, derived from core state
/// so buttons and keyboard shortcuts always agree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ControlHints {
    pub primary_label: PrimaryLabel,
    pub lap_enabled: bool,
    pub reset_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StopwatchState {
    pub status: StopwatchStatus,
    pub elapsed_ms: u64,
    /// Recorded lap snapshots in milliseconds, most recent first.
    pub laps: Vec<u64>,
    /// Time accumulated from earlier running windows; combines with
    /// `running_anchor` to compute the true elapsed duration.
    #[serde(skip)]
    pub elapsed_ms_baseline: u64,
    #[serde(skip)]
    pub running_anchor: Option<Instant>,
}

impl StopwatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.status == StopwatchStatus::Running
    }

    pub fn current_elapsed_ms(&self) -> u64 {
        if let (StopwatchStatus::Running, Some(anchor)) = (self.status, self.running_anchor) {
            self.elapsed_ms_baseline
                .saturating_add(anchor.elapsed().as_millis() as u64)
        } else {
            self.elapsed_ms
        }
    }

    pub fn sync_elapsed_from_anchor(&mut self) {
        if let (StopwatchStatus::Running, Some(anchor)) = (self.status, self.running_anchor) {
            self.elapsed_ms = self
                .elapsed_ms_baseline
                .saturating_add(anchor.elapsed().as_millis() as u64);
        }
    }

    /// Transition Stopped -> Running, anchoring at `now` so previously
    /// accumulated time is preserved across a pause. No-op while running.
    pub fn begin_running(&mut self, now: Instant) {
        if self.is_running() {
            return;
        }
        self.elapsed_ms_baseline = self.elapsed_ms;
        self.running_anchor = Some(now);
        self.status = StopwatchStatus::Running;
    }

    /// Transition Running -> Stopped, freezing `elapsed_ms` at its current
    /// value. No-op while stopped.
    pub fn pause(&mut self) {
        if !self.is_running() {
            return;
        }
        self.sync_elapsed_from_anchor();
        self.status = StopwatchStatus::Stopped;
        self.running_anchor = None;
        self.elapsed_ms_baseline = self.elapsed_ms;
    }

    /// Back to the initial state from anywhere: stopped, zero elapsed, no laps.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Snapshot the current elapsed time at the head of the lap list.
    /// No-op while stopped.
    pub fn record_lap(&mut self) {
        if !self.is_running() {
            return;
        }
        self.sync_elapsed_from_anchor();
        self.laps.insert(0, self.elapsed_ms);
    }

    pub fn control_hints(&self) -> ControlHints {
        match self.status {
            StopwatchStatus::Running => ControlHints {
                primary_label: PrimaryLabel::Pause,
                lap_enabled: true,
                reset_enabled: true,
            },
            StopwatchStatus::Stopped => {
                let has_elapsed = self.elapsed_ms > 0;
                ControlHints {
                    primary_label: if has_elapsed {
                        PrimaryLabel::Resume
                    } else {
                        PrimaryLabel::Start
                    },
                    lap_enabled: has_elapsed,
                    reset_enabled: has_elapsed,
                }
            }
        }
    }
}
