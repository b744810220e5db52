use crate::error::Result;

/// Raw key-value persistence.
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// [`super::StateStore`] handles the "what" (the drafts and logs document,
/// rollback on failed writes).
pub trait StorageBackend {
    /// Read the value stored under `key`.
    /// Returns Ok(None) if nothing was ever stored there.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Forget `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Human-readable location of `key` (a file path, or a virtual path).
    fn location(&self, key: &str) -> String;
}
