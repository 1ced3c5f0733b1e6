use std::sync::Arc;

use clap::Args;
use pomodoro_core::timer::TICK_INTERVAL;
use pomodoro_core::{ConfigError, ConfigStore, Database, SettingsInput, TimerEngine};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::chime::default_chime;
use crate::input::{SessionCommand, HELP};
use crate::terminal::TerminalDisplay;

#[derive(Args)]
pub struct RunArgs {
    /// Work minutes for this session only
    #[arg(long)]
    work: Option<String>,
    /// Short break minutes for this session only
    #[arg(long)]
    short: Option<String>,
    /// Long break minutes for this session only
    #[arg(long)]
    long: Option<String>,
    /// Work cycles before a long break, for this session only
    #[arg(long)]
    cycles: Option<String>,
    /// Wait for a manual start after each phase
    #[arg(long)]
    no_auto_start: bool,
    /// Do not chime when a phase ends
    #[arg(long)]
    no_sound: bool,
    /// Start the first countdown immediately
    #[arg(long)]
    start: bool,
}

impl RunArgs {
    /// Overlay the flags onto the stored settings form.
    fn apply_to(&self, form: &mut SettingsInput) -> Result<(), ConfigError> {
        let overrides = [
            ("work", &self.work),
            ("short", &self.short),
            ("long", &self.long),
            ("cycles", &self.cycles),
        ];
        for (key, value) in overrides {
            if let Some(value) = value {
                form.set(key, value)?;
            }
        }
        if self.no_auto_start {
            form.auto_start = false;
        }
        if self.no_sound {
            form.sound = false;
        }
        Ok(())
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::new(Database::open()?);
    let mut form = SettingsInput::from(&store.load());
    args.apply_to(&mut form)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(session(&store, form, args.start));
    // Stdin is read on a blocking thread that cannot be cancelled.
    runtime.shutdown_background();
    result
}

struct Session<'a> {
    engine: TimerEngine,
    display: TerminalDisplay,
    store: &'a ConfigStore<Database>,
    form: SettingsInput,
}

async fn session(
    store: &ConfigStore<Database>,
    form: SettingsInput,
    start: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let display = TerminalDisplay::new();
    let engine = TimerEngine::new(Arc::new(form.validate()), display.clone(), default_chime());
    let mut session = Session {
        engine,
        display,
        store,
        form,
    };

    session.display.notice(HELP);
    if start {
        session.engine.start_pause();
    }
    session.display.flush();

    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(event) = session.engine.tick() {
                    tracing::info!(?event, "phase completed");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<SessionCommand>() {
                    Ok(SessionCommand::Quit) => break,
                    Ok(command) => session.dispatch(command),
                    Err(e) => session.display.notice(&e.to_string()),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
        session.display.flush();
    }

    session.display.finish();
    Ok(())
}

impl Session<'_> {
    fn dispatch(&mut self, command: SessionCommand) {
        let event = match command {
            SessionCommand::StartPause => self.engine.start_pause(),
            SessionCommand::Reset => self.engine.reset(),
            SessionCommand::Skip => self.engine.skip(),
            SessionCommand::SwitchMode(phase) => self.engine.switch_mode(phase),
            SessionCommand::Apply(pairs) => {
                let Some(form) = self.edit_form(&pairs) else {
                    return;
                };
                self.form = form;
                self.engine.apply_config(Arc::new(self.form.validate()))
            }
            SessionCommand::Save(pairs) => {
                let Some(form) = self.edit_form(&pairs) else {
                    return;
                };
                self.form = form;
                let saved = self.store.save(&self.form);
                let event = self.engine.apply_config(Arc::new(saved));
                self.display.notice("Saved");
                event
            }
            SessionCommand::Status => {
                match serde_json::to_string(&self.engine.snapshot()) {
                    Ok(json) => self.display.notice(&json),
                    Err(e) => tracing::warn!(error = %e, "cannot encode snapshot"),
                }
                return;
            }
            SessionCommand::Help => {
                self.display.notice(HELP);
                return;
            }
            SessionCommand::Quit => return,
        };
        tracing::debug!(?event, "command applied");
    }

    /// Edited copy of the settings form, or `None` after reporting a bad key.
    fn edit_form(&self, pairs: &[(String, String)]) -> Option<SettingsInput> {
        let mut form = self.form.clone();
        for (key, value) in pairs {
            if let Err(e) = form.set(key, value) {
                self.display.notice(&e.to_string());
                return None;
            }
        }
        Some(form)
    }
}
