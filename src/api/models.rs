use serde::{Deserialize, Serialize};

use crate::db::Settings;

#[derive(Deserialize)]
pub struct EnqueueRequest {
    pub domain: String,
}

#[derive(Deserialize)]
pub struct NavigateRequest {
    pub url: String,
}

#[derive(Deserialize)]
pub struct IgnoreRequest {
    pub domain: String,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// Settings as returned over the API; the key itself is never echoed back.
#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub api_key_set: bool,
    pub api_key_hint: Option<String>,
    pub auto_scan: bool,
    pub wordlist: Option<String>,
}

impl From<&Settings> for SettingsView {
    fn from(settings: &Settings) -> Self {
        let key = settings.api_key();
        Self {
            api_key_set: !key.is_empty(),
            api_key_hint: mask_key(key),
            auto_scan: settings.auto_scan,
            wordlist: settings.wordlist.clone(),
        }
    }
}

/// Last four characters behind asterisks, or nothing for short keys.
pub fn mask_key(key: &str) -> Option<String> {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 8 {
        return if chars.is_empty() { None } else { Some("****".into()) };
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    Some(format!("****{}", tail))
}
