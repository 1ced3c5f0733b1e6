//! Side-effect collaborators driven by the engine.

use super::Phase;
use crate::error::ChimeError;

/// Receives render commands for the timer display.
pub trait RenderSink {
    /// Show the remaining time, already clamped to zero.
    fn display_time(&mut self, ms: u64);
    fn display_phase_label(&mut self, phase: Phase);
    fn display_cycle_count(&mut self, completed: u32);
    /// Highlight the mode selector for `phase`.
    fn set_mode_active(&mut self, phase: Phase);
    fn set_start_pause_label(&mut self, label: &str);
}

/// Plays the phase-completion chime.
pub trait ChimeSink {
    fn play(&mut self) -> Result<(), ChimeError>;
}

impl<T: ChimeSink + ?Sized> ChimeSink for Box<T> {
    fn play(&mut self) -> Result<(), ChimeError> {
        (**self).play()
    }
}

/// Sink that renders and plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl RenderSink for Silent {
    fn display_time(&mut self, _ms: u64) {}
    fn display_phase_label(&mut self, _phase: Phase) {}
    fn display_cycle_count(&mut self, _completed: u32) {}
    fn set_mode_active(&mut self, _phase: Phase) {}
    fn set_start_pause_label(&mut self, _label: &str) {}
}

impl ChimeSink for Silent {
    fn play(&mut self) -> Result<(), ChimeError> {
        Ok(())
    }
}

/// Format milliseconds as `mm:ss`.
///
/// Seconds are floored. Minutes are padded to two digits but never
/// truncated, so 100 minutes renders as `100:00`.
pub fn format_time(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
