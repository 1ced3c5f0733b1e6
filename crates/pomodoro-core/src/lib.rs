//! # Pomodoro Core Library
//!
//! Core logic for a single-user Pomodoro timer: work and break phases
//! alternate, with a long break after a configurable number of completed
//! work cycles.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based phase state machine that requires
//!   the caller to periodically invoke `tick()`. Rendering, the completion
//!   chime and the clock are injected collaborators.
//! - **Storage**: Validated settings persisted as a JSON record in a SQLite
//!   key-value table.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`ConfigStore`]: Lenient settings load/save
//! - [`Config`]: Validated, immutable settings
//! - [`Event`]: Result of every engine command

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ChimeError, ConfigError, CoreError, StoreError};
pub use events::Event;
pub use storage::{Config, ConfigStore, Database, KeyValueStore, MemoryStore, SettingsInput};
pub use timer::{Phase, TimerEngine, TimerState};
