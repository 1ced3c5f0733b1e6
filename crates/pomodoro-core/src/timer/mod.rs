mod clock;
mod engine;
mod phase;
pub mod sinks;
pub mod tone;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{TimerEngine, TimerState, TICK_INTERVAL};
pub use phase::{ParsePhaseError, Phase};
pub use sinks::{format_time, ChimeSink, RenderSink, Silent};
pub use tone::ChimeTone;
