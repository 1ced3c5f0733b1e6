use clap::Subcommand;
use pomodoro_core::{Config, ConfigStore, Database, SettingsInput};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print all settings as JSON
    Show,
    /// Get a setting
    Get {
        /// Setting name (work, short, long, cycles, autoStart, sound)
        key: String,
    },
    /// Set and save a setting. Out-of-range numbers are clamped.
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
    /// Save the default settings
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::new(Database::open()?);

    match action {
        ConfigAction::Show => {
            let json = serde_json::to_string_pretty(&store.load())?;
            println!("{json}");
        }
        ConfigAction::Get { key } => {
            let config = store.load();
            let value = config
                .get(&key)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut form = SettingsInput::from(&store.load());
            form.set(&key, &value)?;
            let saved = store.save(&form);
            println!("{key} = {}", saved.get(&key).unwrap_or_default());
        }
        ConfigAction::Reset => {
            store.save(&SettingsInput::from(&Config::default()));
            println!("config reset to defaults");
        }
    }
    Ok(())
}
