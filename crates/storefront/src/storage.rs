//! Session-backed [`KeyValueStore`].
//!
//! The core cart store and flow controller persist through a synchronous
//! key-value trait, while `tower-sessions` is async. [`SessionStorage`]
//! bridges the two: handlers load the keys they need up front, run the
//! synchronous logic against the snapshot, then [`commit`](SessionStorage::commit)
//! the keys that changed.

use std::collections::HashMap;

use karma_shop_core::cart::CartStore;
use karma_shop_core::storage::{KeyValueStore, StorageError, keys};
use tower_sessions::Session;

/// Snapshot of selected session keys with tracked changes.
#[derive(Debug, Default)]
pub struct SessionStorage {
    values: HashMap<String, String>,
    /// `Some` for writes, `None` for removals.
    changes: HashMap<String, Option<String>>,
}

impl SessionStorage {
    /// Read `keys` from the session.
    ///
    /// # Errors
    ///
    /// Returns the session error if the backing store fails.
    pub async fn load(
        session: &Session,
        keys: &[&str],
    ) -> Result<Self, tower_sessions::session::Error> {
        let mut values = HashMap::new();
        for key in keys {
            // Values written by older builds may not be strings; treat them as absent.
            match session.get::<String>(key).await {
                Ok(Some(value)) => {
                    values.insert((*key).to_string(), value);
                }
                Ok(None) => {}
                Err(tower_sessions::session::Error::SerdeJson(e)) => {
                    tracing::warn!(key, error = %e, "Ignoring non-string session value");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(Self {
            values,
            changes: HashMap::new(),
        })
    }

    /// Whether any key was written or removed since loading.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Write changed keys back to the session.
    ///
    /// # Errors
    ///
    /// Returns the session error if the backing store fails.
    pub async fn commit(&mut self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        for (key, change) in self.changes.drain() {
            match change {
                Some(value) => session.insert(&key, value).await?,
                None => {
                    session.remove_value(&key).await?;
                }
            }
        }
        Ok(())
    }
}

/// Load the session cart.
///
/// A stored cart that cannot be read is discarded by [`CartStore::load`];
/// the removal is written back right away rather than on the next mutation.
///
/// # Errors
///
/// Returns the session error if the backing store fails.
pub async fn load_cart(
    session: &Session,
) -> Result<CartStore<SessionStorage>, tower_sessions::session::Error> {
    let storage = SessionStorage::load(session, &[keys::CART]).await?;
    let mut storage = CartStore::load(storage).into_storage();
    if storage.is_dirty() {
        storage.commit(session).await?;
    }
    Ok(CartStore::load(storage))
}

impl KeyValueStore for SessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.clone());
        self.changes.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        self.changes.insert(key.to_string(), None);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use karma_shop_core::ItemId;
    use karma_shop_core::catalog::find_game_pass;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_round_trip_through_session() {
        let session = session();
        session.insert(keys::CART, "[]".to_string()).await.unwrap();

        let mut storage = SessionStorage::load(&session, &[keys::CART, keys::TOS_ACCEPTED])
            .await
            .unwrap();
        assert_eq!(storage.get(keys::CART).unwrap().as_deref(), Some("[]"));
        assert!(!storage.is_dirty());

        storage.set(keys::TOS_ACCEPTED, "true".to_string()).unwrap();
        storage.remove(keys::CART).unwrap();
        assert!(storage.is_dirty());
        storage.commit(&session).await.unwrap();

        assert_eq!(
            session.get::<String>(keys::TOS_ACCEPTED).await.unwrap().as_deref(),
            Some("true")
        );
        assert!(session.get::<String>(keys::CART).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_cart_is_cleared_on_load() {
        let session = session();
        session.insert(keys::CART, "{not a cart".to_string()).await.unwrap();

        let store = load_cart(&session).await.unwrap();
        assert!(store.items().is_empty());
        assert!(!store.into_storage().is_dirty());
        assert!(session.get::<String>(keys::CART).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_readable_cart_is_left_alone() {
        let session = session();
        let pass = find_game_pass(ItemId::new(3)).unwrap();
        let mut store = load_cart(&session).await.unwrap();
        store.add_to_cart(pass);
        store.add_to_cart(pass);
        store.into_storage().commit(&session).await.unwrap();

        let store = load_cart(&session).await.unwrap();
        assert_eq!(store.total_items(), 2);
        assert!(session.get::<String>(keys::CART).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_non_string_values_are_ignored() {
        let session = session();
        session.insert(keys::CART, 42).await.unwrap();

        let storage = SessionStorage::load(&session, &[keys::CART]).await.unwrap();
        assert!(storage.get(keys::CART).unwrap().is_none());
    }
}
