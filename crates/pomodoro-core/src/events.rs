use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every engine command produces an Event describing what changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_ms: u64,
        deadline_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// A phase ran out naturally.
    PhaseCompleted {
        phase: Phase,
        next: Phase,
        completed_work_cycles: u32,
        at: DateTime<Utc>,
    },
    PhaseSkipped {
        from: Phase,
        to: Phase,
        at: DateTime<Utc>,
    },
    /// Direct mode selection; the cadence counter is untouched.
    ModeSwitched {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    ConfigApplied {
        phase: Phase,
        remaining_ms: u64,
        running: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        phase_label: String,
        running: bool,
        remaining_ms: u64,
        total_ms: u64,
        completed_work_cycles: u32,
        at: DateTime<Utc>,
    },
}
