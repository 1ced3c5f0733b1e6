//! Integration tests for the timer engine.
//!
//! Drives whole sessions through the public API on a manual clock, with the
//! engine built from settings loaded through a `ConfigStore`.

use std::sync::Arc;

use pomodoro_core::timer::{ManualClock, Silent};
use pomodoro_core::{Config, ConfigStore, MemoryStore, Phase, SettingsInput, TimerEngine};
use proptest::prelude::*;

const MIN: u64 = 60_000;

fn engine(config: Config) -> (TimerEngine, ManualClock) {
    let clock = ManualClock::new(1_700_000_000_000);
    let engine = TimerEngine::with_clock(Arc::new(config), Silent, Silent, clock.clone());
    (engine, clock)
}

/// Let the running countdown reach zero and deliver one tick.
fn run_out(engine: &mut TimerEngine, clock: &ManualClock) {
    assert!(engine.is_running(), "expected a live countdown");
    clock.advance(engine.remaining_ms());
    assert!(engine.tick().is_some());
}

#[test]
fn auto_started_session_reaches_long_break_after_four_cycles() {
    let (mut engine, clock) = engine(Config::default());
    engine.start_pause();

    let mut seen = Vec::new();
    while engine.phase() != Phase::LongBreak {
        run_out(&mut engine, &clock);
        seen.push(engine.phase());
        assert!(seen.len() < 16, "no long break after {seen:?}");
    }

    assert_eq!(
        seen,
        vec![
            Phase::ShortBreak,
            Phase::Work,
            Phase::ShortBreak,
            Phase::Work,
            Phase::ShortBreak,
            Phase::Work,
            Phase::LongBreak,
        ]
    );
    assert_eq!(engine.completed_work_cycles(), 4);
    assert!(engine.is_running());

    run_out(&mut engine, &clock);
    assert_eq!(engine.phase(), Phase::Work);
    assert_eq!(engine.completed_work_cycles(), 4);
}

#[test]
fn jittery_ticks_do_not_drift() {
    let (mut engine, clock) = engine(Config::new(1, 1, 1, 4, false, false));
    engine.start_pause();

    // 59 seconds of ticks arriving 237ms apart.
    for _ in 0..249 {
        clock.advance(237);
        assert!(engine.tick().is_none());
    }
    assert_eq!(engine.state().remaining_ms, MIN - 249 * 237);

    clock.advance(engine.remaining_ms());
    assert!(engine.tick().is_some());
    assert_eq!(engine.phase(), Phase::ShortBreak);
}

#[test]
fn loaded_settings_drive_phase_lengths() {
    let store = ConfigStore::new(MemoryStore::new());
    let mut form = SettingsInput::from(&store.load());
    form.set("work", "50").unwrap();
    form.set("short", "").unwrap();
    form.set("autoStart", "false").unwrap();
    store.save(&form);

    let (mut engine, _clock) = engine(store.load());
    assert_eq!(engine.remaining_ms(), 50 * MIN);
    engine.skip();
    assert_eq!(engine.phase(), Phase::ShortBreak);
    assert_eq!(engine.remaining_ms(), MIN);
    assert!(!engine.is_running());
}

#[test]
fn default_skip_from_work() {
    let (mut engine, _clock) = engine(Config::new(25, 5, 15, 4, false, true));
    engine.skip();
    assert_eq!(engine.phase(), Phase::ShortBreak);
    assert_eq!(engine.remaining_ms(), 5 * MIN);
    assert_eq!(engine.completed_work_cycles(), 0);
}

proptest! {
    #[test]
    fn durations_are_whole_minutes_in_range(
        work in -50i64..300,
        short in -50i64..300,
        long in -50i64..300,
        cycles in -5i64..40,
    ) {
        let config = Config::new(work, short, long, cycles, true, true);
        let limits = [(Phase::Work, 120u64), (Phase::ShortBreak, 60), (Phase::LongBreak, 90)];
        for (phase, max) in limits {
            let ms = config.duration_ms(phase);
            prop_assert_eq!(ms % MIN, 0);
            prop_assert!(ms >= MIN && ms <= max * MIN);
        }
        prop_assert!((1..=12).contains(&config.cycles_before_long_break()));
    }

    #[test]
    fn nth_natural_completion_is_long_break(n in 1u32..=12) {
        let (mut engine, clock) = engine(Config::new(1, 1, 1, i64::from(n), false, false));
        for completed in 1..=n {
            engine.start_pause();
            run_out(&mut engine, &clock);
            let expected = if completed == n { Phase::LongBreak } else { Phase::ShortBreak };
            prop_assert_eq!(engine.phase(), expected);
            engine.start_pause();
            run_out(&mut engine, &clock);
            prop_assert_eq!(engine.phase(), Phase::Work);
        }
        prop_assert_eq!(engine.completed_work_cycles(), n);
    }

    #[test]
    fn skip_never_counts_a_cycle(skips in 1usize..30, auto_start in any::<bool>()) {
        let (mut engine, _clock) = engine(Config::new(25, 5, 15, 4, auto_start, false));
        for _ in 0..skips {
            engine.skip();
            prop_assert_eq!(engine.completed_work_cycles(), 0);
            prop_assert_ne!(engine.phase(), Phase::LongBreak);
        }
    }

    #[test]
    fn reset_twice_equals_reset_once(elapsed in 0u64..(25 * MIN), start in any::<bool>()) {
        let (mut engine, clock) = engine(Config::default());
        if start {
            engine.start_pause();
        }
        clock.advance(elapsed);
        engine.tick();
        engine.reset();
        let once = engine.state();
        engine.reset();
        prop_assert_eq!(engine.state(), once);
    }

    #[test]
    fn save_then_load_returns_clamped_form(
        work in "[0-9]{0,4}",
        short in "[0-9a-z.]{0,4}",
        long in "-?[0-9]{0,3}",
        cycles in "[0-9]{0,3}",
        auto_start in any::<bool>(),
        sound in any::<bool>(),
    ) {
        let store = ConfigStore::new(MemoryStore::new());
        let form = SettingsInput { work, short, long, cycles, auto_start, sound };
        let saved = store.save(&form);
        prop_assert_eq!(saved, form.validate());
        prop_assert_eq!(store.load(), saved);
    }
}
