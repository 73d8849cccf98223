//! Key-value persistence seam.
//!
//! The cart store and flow controller persist through [`KeyValueStore`],
//! mirroring the browser's string-keyed local storage. The storefront backs
//! it with the visitor's session; tests use [`MemoryStorage`].

use std::collections::HashMap;

use thiserror::Error;

/// Storage keys shared by the storefront and its clients.
pub mod keys {
    /// Serialized cart item list (JSON array).
    pub const CART: &str = "cart";

    /// Terms acceptance flag, `"true"` when accepted.
    pub const TOS_ACCEPTED: &str = "tosAccepted";

    /// Legacy spelling of the terms acceptance flag. Read, never written.
    pub const TERMS_ACCEPTED: &str = "termsAccepted";

    /// Serialized intro flow controller.
    pub const FLOW: &str = "flow";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },
}

/// String-keyed, string-valued durable storage.
///
/// Writes are synchronous and best effort: callers log failures and move on.
pub trait KeyValueStore {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory storage backed by a `HashMap`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, e.g. a previously persisted cart.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Whether the visitor has accepted the terms of service.
///
/// Either key spelling counts; a read failure counts as "not accepted".
#[must_use]
pub fn terms_accepted(storage: &impl KeyValueStore) -> bool {
    [keys::TOS_ACCEPTED, keys::TERMS_ACCEPTED]
        .into_iter()
        .any(|key| match storage.get(key) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                tracing::warn!(error = %e, key, "Failed to read terms acceptance");
                false
            }
        })
}

/// Record terms acceptance. Failures are logged, not returned.
pub fn record_terms_accepted(storage: &mut impl KeyValueStore) {
    if let Err(e) = storage.set(keys::TOS_ACCEPTED, "true".to_string()) {
        tracing::warn!(error = %e, "Failed to save terms acceptance");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set("k", "v".to_string()).unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));

        storage.remove("k").unwrap();
        assert!(!storage.contains("k"));
        // Removing twice is fine
        storage.remove("k").unwrap();
    }

    #[test]
    fn test_terms_accepted_either_key() {
        assert!(!terms_accepted(&MemoryStorage::new()));
        assert!(terms_accepted(
            &MemoryStorage::new().with(keys::TOS_ACCEPTED, "true")
        ));
        assert!(terms_accepted(
            &MemoryStorage::new().with(keys::TERMS_ACCEPTED, "true")
        ));
        assert!(!terms_accepted(
            &MemoryStorage::new().with(keys::TOS_ACCEPTED, "yes")
        ));
    }

    #[test]
    fn test_record_terms_accepted() {
        let mut storage = MemoryStorage::new();
        record_terms_accepted(&mut storage);
        assert_eq!(
            storage.get(keys::TOS_ACCEPTED).unwrap().as_deref(),
            Some("true")
        );
        assert!(terms_accepted(&storage));
    }
}
