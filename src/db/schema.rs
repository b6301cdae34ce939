pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// Store key holding the JSON array of `HistoryItem`s, newest first.
pub const HISTORY_KEY: &str = "scan_history";
/// Store key holding the JSON array of ignored root domains.
pub const IGNORE_LIST_KEY: &str = "ignore_list";
/// Store key holding the JSON `Settings` object.
pub const SETTINGS_KEY: &str = "settings";
