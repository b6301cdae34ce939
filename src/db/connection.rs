use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use dashmap::DashMap;
use rusqlite::Connection;
use tokio::sync::watch;

use crate::errors::ReconError;
use super::store::KeyValueStore;

pub struct Database {
    pub(crate) conn: Arc<Mutex<Connection>>,
    watchers: Arc<DashMap<String, watch::Sender<Option<String>>>>,
}

impl Database {
    pub fn new(path: &str) -> Result<Self, ReconError> {
        // Ensure parent directory exists
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| ReconError::Database(format!("Failed to open database: {}", e)))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| ReconError::Database(format!("Failed to set pragmas: {}", e)))?;

        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self, ReconError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ReconError::Database(format!("Failed to open in-memory db: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, ReconError> {
        conn.execute_batch(super::schema::CREATE_TABLES)
            .map_err(|e| ReconError::Database(format!("Failed to create tables: {}", e)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            watchers: Arc::new(DashMap::new()),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, ReconError> {
        self.conn
            .lock()
            .map_err(|_| ReconError::Database("Connection lock poisoned".into()))
    }

    fn read(conn: &Connection, key: &str) -> Result<Option<String>, ReconError> {
        let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE key = ?1")
            .map_err(|e| ReconError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![key], |row: &rusqlite::Row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ReconError::Database(format!("Query error: {}", e))),
        }
    }

    fn write(conn: &Connection, key: &str, value: Option<&str>) -> Result<bool, ReconError> {
        let affected = match value {
            Some(v) => conn.execute(
                "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, v, Utc::now().to_rfc3339()],
            ),
            None => conn.execute("DELETE FROM kv_store WHERE key = ?1", rusqlite::params![key]),
        }
        .map_err(|e| ReconError::Database(format!("Write failed: {}", e)))?;
        Ok(affected > 0)
    }

    fn notify(&self, key: &str, value: Option<String>) {
        if let Some(tx) = self.watchers.get(key) {
            tx.send_replace(value);
        }
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, ReconError> {
        let conn = self.lock()?;
        Self::read(&conn, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ReconError> {
        {
            let conn = self.lock()?;
            Self::write(&conn, key, Some(value))?;
        }
        self.notify(key, Some(value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, ReconError> {
        let removed = {
            let conn = self.lock()?;
            Self::write(&conn, key, None)?
        };
        if removed {
            self.notify(key, None);
        }
        Ok(removed)
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<Option<String>, ReconError>,
    ) -> Result<Option<String>, ReconError> {
        let next = {
            let conn = self.lock()?;
            let current = Self::read(&conn, key)?;
            let next = f(current)?;
            Self::write(&conn, key, next.as_deref())?;
            next
        };
        self.notify(key, next.clone());
        Ok(next)
    }

    fn watch(&self, key: &str) -> Result<watch::Receiver<Option<String>>, ReconError> {
        if let Some(tx) = self.watchers.get(key) {
            return Ok(tx.subscribe());
        }
        let current = self.get(key)?;
        let rx = self
            .watchers
            .entry(key.to_string())
            .or_insert_with(|| watch::channel(current).0)
            .subscribe();
        Ok(rx)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            watchers: self.watchers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_set_and_get() {
        let db = Database::in_memory().unwrap();
        db.set("api_key", "secret").unwrap();
        assert_eq!(db.get("api_key").unwrap(), Some("secret".to_string()));
    }

    #[test]
    fn test_db_get_missing() {
        let db = Database::in_memory().unwrap();
        assert!(db.get("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_db_set_upsert() {
        let db = Database::in_memory().unwrap();
        db.set("k", "one").unwrap();
        db.set("k", "two").unwrap();
        assert_eq!(db.get("k").unwrap(), Some("two".to_string()));
    }

    #[test]
    fn test_db_remove() {
        let db = Database::in_memory().unwrap();
        db.set("k", "v").unwrap();
        assert!(db.remove("k").unwrap());
        assert!(!db.remove("k").unwrap());
        assert!(db.get("k").unwrap().is_none());
    }

    #[test]
    fn test_db_update_read_modify_write() {
        let db = Database::in_memory().unwrap();
        db.set("counter", "1").unwrap();
        let next = db.update("counter", &mut |cur| {
            let n: u32 = cur.unwrap_or_default().parse().unwrap_or(0);
            Ok(Some((n + 1).to_string()))
        }).unwrap();
        assert_eq!(next.as_deref(), Some("2"));
        assert_eq!(db.get("counter").unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_db_watch_sees_changes() {
        let db = Database::in_memory().unwrap();
        db.set("settings", "{}").unwrap();
        let mut rx = db.watch("settings").unwrap();
        assert_eq!(rx.borrow().as_deref(), Some("{}"));

        db.set("settings", "{\"auto_scan\":true}").unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_deref(), Some("{\"auto_scan\":true}"));

        db.remove("settings").unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[test]
    fn test_db_clone_shares_watchers() {
        let db = Database::in_memory().unwrap();
        let rx = db.watch("k").unwrap();
        let other = db.clone();
        other.set("k", "v").unwrap();
        assert_eq!(rx.borrow().as_deref(), Some("v"));
    }

    #[test]
    fn test_db_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("recon.db");
        {
            let db = Database::new(path.to_str().unwrap()).unwrap();
            db.set("k", "persisted").unwrap();
        }
        let db = Database::new(path.to_str().unwrap()).unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("persisted"));
    }
}
