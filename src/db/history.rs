use crate::errors::ReconError;
use crate::models::HistoryItem;
use super::schema::HISTORY_KEY;
use super::store::KeyValueStore;

fn decode(raw: Option<String>) -> Result<Vec<HistoryItem>, ReconError> {
    match raw {
        Some(s) if !s.trim().is_empty() => Ok(serde_json::from_str(&s)?),
        _ => Ok(Vec::new()),
    }
}

/// Scan history kept under [`HISTORY_KEY`], newest first, one entry per root domain.
pub trait HistoryStore {
    fn load_history(&self) -> Result<Vec<HistoryItem>, ReconError>;

    /// Insert `item` at the front, replacing any entry for the same root
    /// domain and keeping at most `max_items`.
    fn record_history(&self, item: HistoryItem, max_items: usize) -> Result<(), ReconError>;

    fn remove_history(&self, root_domain: &str) -> Result<bool, ReconError>;

    fn history_for(&self, root_domain: &str) -> Result<Option<HistoryItem>, ReconError> {
        Ok(self.load_history()?.into_iter().find(|h| h.root_domain == root_domain))
    }

    fn has_history(&self, root_domain: &str) -> Result<bool, ReconError> {
        Ok(self.history_for(root_domain)?.is_some())
    }
}

impl<T: KeyValueStore + ?Sized> HistoryStore for T {
    fn load_history(&self) -> Result<Vec<HistoryItem>, ReconError> {
        decode(self.get(HISTORY_KEY)?)
    }

    fn record_history(&self, item: HistoryItem, max_items: usize) -> Result<(), ReconError> {
        let mut pending = Some(item);
        self.update(HISTORY_KEY, &mut |raw| {
            let mut items = decode(raw)?;
            if let Some(item) = pending.take() {
                items.retain(|h| h.root_domain != item.root_domain);
                items.insert(0, item);
            }
            items.truncate(max_items.max(1));
            Ok(Some(serde_json::to_string(&items)?))
        })?;
        Ok(())
    }

    fn remove_history(&self, root_domain: &str) -> Result<bool, ReconError> {
        let mut removed = false;
        self.update(HISTORY_KEY, &mut |raw| {
            let mut items = decode(raw)?;
            let before = items.len();
            items.retain(|h| h.root_domain != root_domain);
            removed = items.len() != before;
            Ok(Some(serde_json::to_string(&items)?))
        })?;
        Ok(removed)
    }
}
