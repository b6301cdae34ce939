use std::collections::BTreeSet;

use crate::errors::ReconError;
use crate::utils::get_root_domain;
use super::schema::IGNORE_LIST_KEY;
use super::store::KeyValueStore;

pub(crate) fn decode_ignore_list(raw: Option<&str>) -> Result<BTreeSet<String>, ReconError> {
    match raw {
        Some(s) if !s.trim().is_empty() => Ok(serde_json::from_str(s)?),
        _ => Ok(BTreeSet::new()),
    }
}

fn normalize(domain: &str) -> Result<String, ReconError> {
    get_root_domain(domain)
        .ok_or_else(|| ReconError::InvalidTarget(format!("Cannot derive a root domain from '{}'", domain)))
}

/// Root domains the user never wants scanned, kept under [`IGNORE_LIST_KEY`].
pub trait IgnoreStore {
    fn load_ignore_list(&self) -> Result<BTreeSet<String>, ReconError>;

    /// Returns the normalized root domain that was added.
    fn add_ignored(&self, domain: &str) -> Result<String, ReconError>;

    fn remove_ignored(&self, domain: &str) -> Result<bool, ReconError>;

    fn is_ignored(&self, domain: &str) -> Result<bool, ReconError> {
        match get_root_domain(domain) {
            Some(root) => Ok(self.load_ignore_list()?.contains(&root)),
            None => Ok(false),
        }
    }
}

impl<T: KeyValueStore + ?Sized> IgnoreStore for T {
    fn load_ignore_list(&self) -> Result<BTreeSet<String>, ReconError> {
        decode_ignore_list(self.get(IGNORE_LIST_KEY)?.as_deref())
    }

    fn add_ignored(&self, domain: &str) -> Result<String, ReconError> {
        let root = normalize(domain)?;
        self.update(IGNORE_LIST_KEY, &mut |raw| {
            let mut list = decode_ignore_list(raw.as_deref())?;
            list.insert(root.clone());
            Ok(Some(serde_json::to_string(&list)?))
        })?;
        Ok(root)
    }

    fn remove_ignored(&self, domain: &str) -> Result<bool, ReconError> {
        let root = normalize(domain)?;
        let mut removed = false;
        self.update(IGNORE_LIST_KEY, &mut |raw| {
            let mut list = decode_ignore_list(raw.as_deref())?;
            removed = list.remove(&root);
            Ok(Some(serde_json::to_string(&list)?))
        })?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_ignore_add_normalizes() {
        let db = Database::in_memory().unwrap();
        let root = db.add_ignored("https://Admin.Example.com/login").unwrap();
        assert_eq!(root, "example.com");
        assert!(db.is_ignored("shop.example.com").unwrap());
        assert!(!db.is_ignored("example.org").unwrap());
    }

    #[test]
    fn test_ignore_add_is_idempotent() {
        let db = Database::in_memory().unwrap();
        db.add_ignored("example.com").unwrap();
        db.add_ignored("www.example.com").unwrap();
        assert_eq!(db.load_ignore_list().unwrap().len(), 1);
    }

    #[test]
    fn test_ignore_remove() {
        let db = Database::in_memory().unwrap();
        db.add_ignored("example.com").unwrap();
        assert!(db.remove_ignored("example.com").unwrap());
        assert!(!db.remove_ignored("example.com").unwrap());
    }

    #[test]
    fn test_ignore_invalid_domain_rejected() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(db.add_ignored("  "), Err(ReconError::InvalidTarget(_))));
    }
}
