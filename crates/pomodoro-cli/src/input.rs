//! Translates session input lines into timer commands.
//!
//! One command per line. A blank line (or a lone space) toggles the timer,
//! mirroring the space-bar shortcut.

use std::str::FromStr;

use pomodoro_core::Phase;

pub const HELP: &str = "\
keys: <space>/<enter> start/pause | r reset | n skip | work, short, long (1/2/3) switch mode
      apply k=v ... (session only) | save k=v ... | status | help | q quit
      settings: work short long cycles autoStart sound";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    StartPause,
    Reset,
    Skip,
    SwitchMode(Phase),
    /// Validate and apply settings without persisting them.
    Apply(Vec<(String, String)>),
    /// Validate, apply and persist settings.
    Save(Vec<(String, String)>),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("expected key=value, got '{0}'")]
    BadSetting(String),
}

impl FromStr for SessionCommand {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(SessionCommand::StartPause);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "s" | "start" | "pause" => SessionCommand::StartPause,
            "r" | "reset" => SessionCommand::Reset,
            "n" | "skip" | "next" => SessionCommand::Skip,
            "1" => SessionCommand::SwitchMode(Phase::Work),
            "2" => SessionCommand::SwitchMode(Phase::ShortBreak),
            "3" => SessionCommand::SwitchMode(Phase::LongBreak),
            "apply" => SessionCommand::Apply(settings(words)?),
            "save" => SessionCommand::Save(settings(words)?),
            "status" => SessionCommand::Status,
            "h" | "help" | "?" => SessionCommand::Help,
            "q" | "quit" | "exit" => SessionCommand::Quit,
            other => match other.parse::<Phase>() {
                Ok(phase) => SessionCommand::SwitchMode(phase),
                Err(_) => return Err(InputError::Unknown(head.to_string())),
            },
        };
        Ok(command)
    }
}

fn settings<'a>(words: impl Iterator<Item = &'a str>) -> Result<Vec<(String, String)>, InputError> {
    words
        .map(|word| {
            word.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| InputError::BadSetting(word.to_string()))
        })
        .collect()
}
