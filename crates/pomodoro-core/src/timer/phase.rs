use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "work")]
    Work,
    #[serde(rename = "short")]
    ShortBreak,
    #[serde(rename = "long")]
    LongBreak,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Work, Phase::ShortBreak, Phase::LongBreak];

    /// Human-readable label shown next to the clock.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown phase '{0}' (expected work, short or long)")]
pub struct ParsePhaseError(String);

impl FromStr for Phase {
    type Err = ParsePhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "focus" => Ok(Phase::Work),
            "short" | "short_break" | "short-break" => Ok(Phase::ShortBreak),
            "long" | "long_break" | "long-break" => Ok(Phase::LongBreak),
            other => Err(ParsePhaseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_mode_names() {
        assert_eq!("work".parse::<Phase>(), Ok(Phase::Work));
        assert_eq!("Short".parse::<Phase>(), Ok(Phase::ShortBreak));
        assert_eq!("long_break".parse::<Phase>(), Ok(Phase::LongBreak));
        assert!("lunch".parse::<Phase>().is_err());
    }

    #[test]
    fn serializes_as_mode_name() {
        assert_eq!(serde_json::to_string(&Phase::ShortBreak).unwrap(), "\"short\"");
        assert_eq!(Phase::LongBreak.to_string(), "Long Break");
    }
}
