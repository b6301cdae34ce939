use tokio::sync::watch;

use crate::errors::ReconError;

/// Opaque key-value persistence: history, ignore list and settings all live
/// behind this interface as JSON strings.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ReconError>;

    fn set(&self, key: &str, value: &str) -> Result<(), ReconError>;

    /// Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool, ReconError>;

    /// Read-modify-write a key. Returning `None` from `f` removes it.
    /// The default is not atomic; implementations should override it.
    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<Option<String>, ReconError>,
    ) -> Result<Option<String>, ReconError> {
        let next = f(self.get(key)?)?;
        match &next {
            Some(v) => self.set(key, v)?,
            None => {
                self.remove(key)?;
            }
        }
        Ok(next)
    }

    /// Observe every later write to `key`. The receiver starts at the current value.
    fn watch(&self, key: &str) -> Result<watch::Receiver<Option<String>>, ReconError>;
}
