//! Timer engine implementation.
//!
//! The engine is a wall-clock-based state machine over three phases with an
//! orthogonal running flag. It does not use internal threads - the caller is
//! responsible for calling `tick()` periodically (see [`TICK_INTERVAL`]).
//!
//! ## Phase Transitions
//!
//! ```text
//! Work --(natural expiry, Nth cycle)--> LongBreak --> Work
//! Work --(expiry or skip)-------------> ShortBreak --> Work
//! ```
//!
//! A running countdown is a single [`Countdown`] holding an absolute
//! deadline. Remaining time is always `deadline - now`, never an
//! accumulation of tick deltas, so late or jittery ticks cannot drift.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Arc::new(Config::default()), display, chime);
//! engine.start_pause();
//! // In a loop, every TICK_INTERVAL:
//! engine.tick(); // Returns Some(Event) when a phase runs out
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::sinks::{ChimeSink, RenderSink};
use super::Phase;
use crate::events::Event;
use crate::storage::Config;

/// Recommended period between `tick()` calls.
pub const TICK_INTERVAL: Duration = Duration::from_millis(200);

const START_LABEL: &str = "Start";
const PAUSE_LABEL: &str = "Pause";

/// The one armed countdown. Dropping it cancels the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Countdown {
    deadline_ms: u64,
}

/// Plain snapshot of the engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    /// Frozen remaining time; only authoritative while not running.
    pub remaining_ms: u64,
    pub running: bool,
    pub completed_work_cycles: u32,
    /// Present iff running.
    pub deadline_ms: Option<u64>,
}

/// Core timer engine.
///
/// Owns the phase state and its collaborators. All commands are total and
/// return immediately.
pub struct TimerEngine {
    config: Arc<Config>,
    phase: Phase,
    remaining_ms: u64,
    completed_work_cycles: u32,
    countdown: Option<Countdown>,
    clock: Box<dyn Clock>,
    render: Box<dyn RenderSink>,
    chime: Box<dyn ChimeSink>,
}

impl TimerEngine {
    /// Create an engine on the system clock, idle at the start of a Work phase.
    pub fn new(
        config: Arc<Config>,
        render: impl RenderSink + 'static,
        chime: impl ChimeSink + 'static,
    ) -> Self {
        Self::with_clock(config, render, chime, SystemClock)
    }

    pub fn with_clock(
        config: Arc<Config>,
        render: impl RenderSink + 'static,
        chime: impl ChimeSink + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        let remaining_ms = config.duration_ms(Phase::Work);
        let mut engine = Self {
            config,
            phase: Phase::Work,
            remaining_ms,
            completed_work_cycles: 0,
            countdown: None,
            clock: Box::new(clock),
            render: Box::new(render),
            chime: Box::new(chime),
        };
        engine.render_all();
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn completed_work_cycles(&self) -> u32 {
        self.completed_work_cycles
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.countdown.map(|c| c.deadline_ms)
    }

    /// True remaining time: `deadline - now` while running, else the frozen value.
    pub fn remaining_ms(&self) -> u64 {
        match self.countdown {
            Some(countdown) => countdown.deadline_ms.saturating_sub(self.clock.now_ms()),
            None => self.remaining_ms,
        }
    }

    /// Full length of the current phase under the current config.
    pub fn total_ms(&self) -> u64 {
        self.config.duration_ms(self.phase)
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            running: self.is_running(),
            completed_work_cycles: self.completed_work_cycles,
            deadline_ms: self.deadline_ms(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            phase_label: self.phase.label().to_string(),
            running: self.is_running(),
            remaining_ms: self.remaining_ms(),
            total_ms: self.total_ms(),
            completed_work_cycles: self.completed_work_cycles,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Toggle between running and paused.
    pub fn start_pause(&mut self) -> Event {
        match self.countdown.take() {
            Some(countdown) => self.pause(countdown),
            None => self.start(),
        }
    }

    /// Call periodically. Returns `Some(Event::PhaseCompleted)` when the
    /// countdown runs out.
    pub fn tick(&mut self) -> Option<Event> {
        let countdown = self.countdown?;
        let now = self.clock.now_ms();

        if countdown.deadline_ms > now {
            let left = countdown.deadline_ms - now;
            self.remaining_ms = left;
            self.render.display_time(left);
            return None;
        }

        self.countdown = None;
        self.remaining_ms = 0;
        self.render.display_time(0);
        self.play_chime();

        let finished = self.phase;
        let next = self.end_phase(false);
        tracing::debug!(%finished, %next, cycles = self.completed_work_cycles, "phase completed");
        Some(Event::PhaseCompleted {
            phase: finished,
            next,
            completed_work_cycles: self.completed_work_cycles,
            at: Utc::now(),
        })
    }

    /// Stop and rewind the current phase to its full length.
    pub fn reset(&mut self) -> Event {
        self.countdown = None;
        self.remaining_ms = self.total_ms();
        self.render.set_start_pause_label(START_LABEL);
        self.render.display_time(self.remaining_ms);
        Event::TimerReset {
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        }
    }

    /// End the current phase early. A skipped Work phase is not counted.
    pub fn skip(&mut self) -> Event {
        let from = self.phase;
        let to = self.end_phase(true);
        tracing::debug!(%from, %to, "phase skipped");
        Event::PhaseSkipped {
            from,
            to,
            at: Utc::now(),
        }
    }

    /// Jump straight to `phase`, stopped, at its full length.
    pub fn switch_mode(&mut self, phase: Phase) -> Event {
        self.enter_phase(phase);
        Event::ModeSwitched {
            phase,
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        }
    }

    /// Replace the held config.
    ///
    /// If the current phase's length changed, remaining time restarts at the
    /// new length; a running countdown keeps running against a recomputed
    /// deadline.
    pub fn apply_config(&mut self, config: Arc<Config>) -> Event {
        let new_total = config.duration_ms(self.phase);
        let changed = new_total != self.config.duration_ms(self.phase);
        self.config = config;

        if changed {
            self.remaining_ms = new_total;
            if let Some(countdown) = self.countdown.as_mut() {
                countdown.deadline_ms = self.clock.now_ms().saturating_add(new_total);
            }
            self.render.display_time(new_total);
        }

        Event::ConfigApplied {
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            running: self.is_running(),
            at: Utc::now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn start(&mut self) -> Event {
        let deadline_ms = self.clock.now_ms().saturating_add(self.remaining_ms);
        self.countdown = Some(Countdown { deadline_ms });
        self.render.set_start_pause_label(PAUSE_LABEL);
        Event::TimerStarted {
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            deadline_ms,
            at: Utc::now(),
        }
    }

    fn pause(&mut self, countdown: Countdown) -> Event {
        self.remaining_ms = countdown.deadline_ms.saturating_sub(self.clock.now_ms());
        self.render.set_start_pause_label(START_LABEL);
        self.render.display_time(self.remaining_ms);
        Event::TimerPaused {
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        }
    }

    /// Count the cycle, pick the next phase, enter it and auto-start if configured.
    fn end_phase(&mut self, skipped: bool) -> Phase {
        if self.phase == Phase::Work && !skipped {
            self.completed_work_cycles += 1;
            self.render.display_cycle_count(self.completed_work_cycles);
        }

        let next = match self.phase {
            Phase::Work => {
                let cycles = self.completed_work_cycles;
                if cycles > 0 && cycles % self.config.cycles_before_long_break() == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };

        self.enter_phase(next);
        if self.config.auto_start_next() {
            self.start();
        }
        next
    }

    fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.countdown = None;
        self.remaining_ms = self.total_ms();
        self.render.set_mode_active(phase);
        self.render.display_phase_label(phase);
        self.render.display_time(self.remaining_ms);
        self.render.set_start_pause_label(START_LABEL);
    }

    fn play_chime(&mut self) {
        if !self.config.sound_enabled() {
            return;
        }
        if let Err(e) = self.chime.play() {
            tracing::debug!(error = %e, "chime suppressed");
        }
    }

    fn render_all(&mut self) {
        let label = if self.is_running() { PAUSE_LABEL } else { START_LABEL };
        self.render.display_time(self.remaining_ms);
        self.render.display_phase_label(self.phase);
        self.render.set_mode_active(self.phase);
        self.render.display_cycle_count(self.completed_work_cycles);
        self.render.set_start_pause_label(label);
    }
}
