use serde_json::{json, Value};

use crate::cli::commands::{GlobalOpts, SettingsCommand};
use crate::cli::context::{load_config, open_store};
use crate::db::SettingsStore;
use crate::errors::ReconError;

/// Turn a command-line value into the JSON the settings patch expects.
fn parse_value(key: &str, raw: &str) -> Result<Value, ReconError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("none") || trimmed.is_empty() {
        return match key {
            "auto_scan" => Err(ReconError::Config("auto_scan needs true or false".into())),
            _ => Ok(Value::Null),
        };
    }
    match key {
        "auto_scan" => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(json!(true)),
            "false" | "off" | "no" | "0" => Ok(json!(false)),
            other => Err(ReconError::Config(format!("Invalid boolean: {}", other))),
        },
        _ => Ok(json!(trimmed)),
    }
}

pub async fn handle_settings(command: SettingsCommand, global: GlobalOpts) -> Result<(), ReconError> {
    let config = load_config(&global).await?;
    let store = open_store(&global, &config)?;

    match command {
        SettingsCommand::Show => {
            let settings = store.load_settings()?;
            let key = if settings.api_key().is_empty() { "(not set)" } else { "(set)" };
            println!("api_key:   {}", key);
            println!("auto_scan: {}", settings.auto_scan);
            println!("wordlist:  {}", settings.wordlist.as_deref().unwrap_or("(builtin)"));
        }
        SettingsCommand::Set { key, value } => {
            let mut patch = serde_json::Map::new();
            patch.insert(key.clone(), parse_value(&key, &value)?);
            let updated = store.load_settings()?.merged(&Value::Object(patch))?;
            store.save_settings(&updated)?;
            println!("Updated {}", key);
        }
    }
    Ok(())
}
