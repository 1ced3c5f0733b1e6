//! Terminal render sink.
//!
//! The engine updates a shared status line; the session loop calls
//! [`TerminalDisplay::flush`] after each command or tick, which redraws the
//! line only when its text changed. On a terminal the line is redrawn in
//! place, otherwise each change is written as a new line.

use std::cell::RefCell;
use std::io::{IsTerminal, Write};
use std::rc::Rc;

use pomodoro_core::timer::{format_time, RenderSink};
use pomodoro_core::Phase;

#[derive(Debug)]
struct StatusLine {
    time_ms: u64,
    phase: Phase,
    active_mode: Phase,
    cycles: u32,
    button: String,
    last_drawn: Option<String>,
}

impl StatusLine {
    fn text(&self) -> String {
        let modes: Vec<String> = Phase::ALL
            .iter()
            .map(|&mode| {
                let name = match mode {
                    Phase::Work => "work",
                    Phase::ShortBreak => "short",
                    Phase::LongBreak => "long",
                };
                if mode == self.active_mode {
                    format!("[{name}]")
                } else {
                    name.to_string()
                }
            })
            .collect();

        format!(
            "{:<11}  {}  cycles {}  <{}>  {}",
            self.phase.label(),
            format_time(self.time_ms),
            self.cycles,
            self.button,
            modes.join(" ")
        )
    }
}

/// Cheap to clone; clones draw the same line.
#[derive(Debug, Clone)]
pub struct TerminalDisplay {
    line: Rc<RefCell<StatusLine>>,
    in_place: bool,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            line: Rc::new(RefCell::new(StatusLine {
                time_ms: 0,
                phase: Phase::Work,
                active_mode: Phase::Work,
                cycles: 0,
                button: String::new(),
                last_drawn: None,
            })),
            in_place: std::io::stdout().is_terminal(),
        }
    }

    /// Redraw the status line if it changed since the last draw.
    pub fn flush(&self) {
        let mut line = self.line.borrow_mut();
        let text = line.text();
        if line.last_drawn.as_deref() == Some(text.as_str()) {
            return;
        }

        let mut out = std::io::stdout().lock();
        let _ = if self.in_place {
            write!(out, "\r\x1b[2K{text}")
        } else {
            writeln!(out, "{text}")
        };
        let _ = out.flush();
        line.last_drawn = Some(text);
    }

    /// Print a message above the status line, then redraw it.
    pub fn notice(&self, message: &str) {
        {
            let mut out = std::io::stdout().lock();
            let _ = if self.in_place {
                writeln!(out, "\r\x1b[2K{message}")
            } else {
                writeln!(out, "{message}")
            };
        }
        self.line.borrow_mut().last_drawn = None;
        self.flush();
    }

    /// Leave the status line intact before exiting.
    pub fn finish(&self) {
        if self.in_place {
            println!();
        }
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for TerminalDisplay {
    fn display_time(&mut self, ms: u64) {
        self.line.borrow_mut().time_ms = ms;
    }

    fn display_phase_label(&mut self, phase: Phase) {
        self.line.borrow_mut().phase = phase;
    }

    fn display_cycle_count(&mut self, completed: u32) {
        self.line.borrow_mut().cycles = completed;
    }

    fn set_mode_active(&mut self, phase: Phase) {
        self.line.borrow_mut().active_mode = phase;
    }

    fn set_start_pause_label(&mut self, label: &str) {
        self.line.borrow_mut().button = label.to_string();
    }
}
