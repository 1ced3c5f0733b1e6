//! User settings and their persistence.
//!
//! A [`Config`] is always valid: every duration is clamped into its range
//! when the value is built, whether it comes from the settings form, the CLI
//! or the persisted record. The record is stored as one JSON object under
//! [`CONFIG_KEY`]:
//!
//! ```json
//! {"work":25,"short":5,"long":15,"cycles":4,"autoStart":true,"sound":true}
//! ```
//!
//! Reading is lenient. Missing fields fall back to defaults, unparseable
//! numbers become 0 before clamping, and a record that cannot be read at all
//! is indistinguishable from no customisation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::KeyValueStore;
use crate::error::{ConfigError, CoreError};
use crate::timer::Phase;

/// Key of the persisted settings record.
pub const CONFIG_KEY: &str = "pomodoro_config";

/// Range and default for one numeric setting.
struct Bounds {
    key: &'static str,
    min: u32,
    max: u32,
    default: u32,
}

const WORK: Bounds = Bounds { key: "work", min: 1, max: 120, default: 25 };
const SHORT: Bounds = Bounds { key: "short", min: 1, max: 60, default: 5 };
const LONG: Bounds = Bounds { key: "long", min: 1, max: 90, default: 15 };
const CYCLES: Bounds = Bounds { key: "cycles", min: 1, max: 12, default: 4 };

impl Bounds {
    fn clamp(&self, n: f64) -> u32 {
        n.floor().clamp(f64::from(self.min), f64::from(self.max)) as u32
    }
}

/// Validated timer settings.
///
/// Replaced wholesale on apply/save, never edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Config {
    #[serde(rename = "work")]
    work_minutes: u32,
    #[serde(rename = "short")]
    short_break_minutes: u32,
    #[serde(rename = "long")]
    long_break_minutes: u32,
    #[serde(rename = "cycles")]
    cycles_before_long_break: u32,
    #[serde(rename = "autoStart")]
    auto_start_next: bool,
    #[serde(rename = "sound")]
    sound_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_minutes: WORK.default,
            short_break_minutes: SHORT.default,
            long_break_minutes: LONG.default,
            cycles_before_long_break: CYCLES.default,
            auto_start_next: true,
            sound_enabled: true,
        }
    }
}

impl Config {
    /// Build a config, clamping every duration into its valid range.
    pub fn new(
        work_minutes: i64,
        short_break_minutes: i64,
        long_break_minutes: i64,
        cycles_before_long_break: i64,
        auto_start_next: bool,
        sound_enabled: bool,
    ) -> Self {
        Self {
            work_minutes: WORK.clamp(work_minutes as f64),
            short_break_minutes: SHORT.clamp(short_break_minutes as f64),
            long_break_minutes: LONG.clamp(long_break_minutes as f64),
            cycles_before_long_break: CYCLES.clamp(cycles_before_long_break as f64),
            auto_start_next,
            sound_enabled,
        }
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    pub fn short_break_minutes(&self) -> u32 {
        self.short_break_minutes
    }

    pub fn long_break_minutes(&self) -> u32 {
        self.long_break_minutes
    }

    pub fn cycles_before_long_break(&self) -> u32 {
        self.cycles_before_long_break
    }

    pub fn auto_start_next(&self) -> bool {
        self.auto_start_next
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Configured length of `phase` in minutes.
    pub fn duration_minutes(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_minutes,
            Phase::ShortBreak => self.short_break_minutes,
            Phase::LongBreak => self.long_break_minutes,
        }
    }

    /// Configured length of `phase` in milliseconds.
    pub fn duration_ms(&self, phase: Phase) -> u64 {
        minutes_to_ms(i64::from(self.duration_minutes(phase)))
    }

    /// Get one setting as a string, by record key.
    pub fn get(&self, key: &str) -> Option<String> {
        let key = canonical_key(key)?;
        let json = serde_json::to_value(self).ok()?;
        json.get(key).map(Value::to_string)
    }
}

/// Convert minutes to milliseconds; negative input counts as zero.
pub fn minutes_to_ms(minutes: i64) -> u64 {
    (minutes.max(0) as u64).saturating_mul(60_000)
}

impl From<Value> for Config {
    fn from(value: Value) -> Self {
        let defaults = Config::default();
        let Value::Object(fields) = value else {
            return defaults;
        };

        let number = |bounds: &Bounds, fallback: u32| {
            fields
                .get(bounds.key)
                .map(|v| bounds.clamp(number_from_json(v)))
                .unwrap_or(fallback)
        };
        let flag = |key: &str, fallback: bool| fields.get(key).map(truthy).unwrap_or(fallback);

        Self {
            work_minutes: number(&WORK, defaults.work_minutes),
            short_break_minutes: number(&SHORT, defaults.short_break_minutes),
            long_break_minutes: number(&LONG, defaults.long_break_minutes),
            cycles_before_long_break: number(&CYCLES, defaults.cycles_before_long_break),
            auto_start_next: flag("autoStart", defaults.auto_start_next),
            sound_enabled: flag("sound", defaults.sound_enabled),
        }
    }
}

fn number_from_text(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| !n.is_nan())
        .unwrap_or(0.0)
}

fn number_from_json(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => number_from_text(s),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn canonical_key(key: &str) -> Option<&'static str> {
    match key.trim().to_ascii_lowercase().as_str() {
        "work" => Some("work"),
        "short" => Some("short"),
        "long" => Some("long"),
        "cycles" => Some("cycles"),
        "autostart" | "auto_start" | "auto-start" => Some("autoStart"),
        "sound" => Some("sound"),
        _ => None,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Raw values of the settings form, before validation.
///
/// Numeric fields are free text: anything that is not a number counts as 0
/// and is then clamped, so an empty work field becomes 1 minute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsInput {
    pub work: String,
    pub short: String,
    pub long: String,
    pub cycles: String,
    pub auto_start: bool,
    pub sound: bool,
}

impl From<&Config> for SettingsInput {
    fn from(config: &Config) -> Self {
        Self {
            work: config.work_minutes.to_string(),
            short: config.short_break_minutes.to_string(),
            long: config.long_break_minutes.to_string(),
            cycles: config.cycles_before_long_break.to_string(),
            auto_start: config.auto_start_next,
            sound: config.sound_enabled,
        }
    }
}

impl SettingsInput {
    /// Overwrite one field by record key (`work`, `short`, `long`, `cycles`,
    /// `autoStart`, `sound`).
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownKey`] for any other key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match canonical_key(key) {
            Some("work") => self.work = value.to_string(),
            Some("short") => self.short = value.to_string(),
            Some("long") => self.long = value.to_string(),
            Some("cycles") => self.cycles = value.to_string(),
            Some("autoStart") => self.auto_start = parse_flag(value),
            Some("sound") => self.sound = parse_flag(value),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Coerce and clamp every field into a new [`Config`].
    pub fn validate(&self) -> Config {
        Config {
            work_minutes: WORK.clamp(number_from_text(&self.work)),
            short_break_minutes: SHORT.clamp(number_from_text(&self.short)),
            long_break_minutes: LONG.clamp(number_from_text(&self.long)),
            cycles_before_long_break: CYCLES.clamp(number_from_text(&self.cycles)),
            auto_start_next: self.auto_start,
            sound_enabled: self.sound,
        }
    }
}

/// Loads and saves the settings record through a [`KeyValueStore`].
///
/// Never fails: unreadable records yield defaults and write failures are
/// logged, matching the "no visible errors" contract of the settings form.
pub struct ConfigStore<S> {
    store: S,
}

impl<S: KeyValueStore> ConfigStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the persisted settings merged over defaults.
    pub fn load(&self) -> Config {
        let raw = match self.store.get(CONFIG_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("no stored settings, using defaults");
                return Config::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "settings store unreadable, using defaults");
                return Config::default();
            }
        };

        match serde_json::from_str::<Config>(&raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "stored settings malformed, using defaults");
                Config::default()
            }
        }
    }

    /// Validate `input`, persist the result wholesale and return it.
    pub fn save(&self, input: &SettingsInput) -> Config {
        let config = input.validate();
        if let Err(e) = self.persist(&config) {
            tracing::warn!(error = %e, "failed to persist settings");
        }
        config
    }

    /// Write `config` as the stored record.
    ///
    /// # Errors
    /// Returns an error if encoding or the store write fails.
    pub fn persist(&self, config: &Config) -> Result<(), CoreError> {
        let json = serde_json::to_string(config)?;
        self.store.set(CONFIG_KEY, &json)?;
        tracing::debug!(record = %json, "settings saved");
        Ok(())
    }
}
