pub mod connection;
pub mod history;
pub mod ignore;
pub mod schema;
pub mod settings;
pub mod store;

pub use connection::Database;
pub use history::HistoryStore;
pub use ignore::IgnoreStore;
pub use settings::{Settings, SettingsStore};
pub use store::KeyValueStore;
