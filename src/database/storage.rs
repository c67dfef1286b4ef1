use super::models::StorageEntryModel;
use async_trait::async_trait;
use sqlx::{
    Error as SqlxError,
    sqlite::{SqliteExecutor, SqlitePool},
};

/// String-keyed durable storage, one namespace per player.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, SqlxError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), SqlxError>;
    /// Writes every entry or none of them.
    async fn set_all(&self, entries: &[(&str, String)]) -> Result<(), SqlxError>;
    async fn remove(&self, key: &str) -> Result<(), SqlxError>;
}

/// Finds a stored entry by scope and key
pub async fn find(
    pool: &SqlitePool,
    scope: &str,
    key: &str,
) -> Result<Option<StorageEntryModel>, SqlxError> {
    sqlx::query_as::<_, StorageEntryModel>(
        "SELECT scope, key, value, updated_at FROM local_storage WHERE scope = ? AND key = ?",
    )
    .bind(scope)
    .bind(key)
    .fetch_optional(pool)
    .await
}

/// Inserts or overwrites an entry
pub async fn upsert<'e>(
    executor: impl SqliteExecutor<'e>,
    scope: &str,
    key: &str,
    value: &str,
) -> Result<(), SqlxError> {
    let updated_at = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO local_storage (scope, key, value, updated_at) VALUES (?, ?, ?, ?)
         ON CONFLICT(scope, key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at",
    )
    .bind(scope)
    .bind(key)
    .bind(value)
    .bind(&updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Deletes an entry; deleting a missing key is not an error
pub async fn delete(pool: &SqlitePool, scope: &str, key: &str) -> Result<(), SqlxError> {
    sqlx::query("DELETE FROM local_storage WHERE scope = ? AND key = ?")
        .bind(scope)
        .bind(key)
        .execute(pool)
        .await?;

    Ok(())
}

/// `local_storage` rows belonging to a single scope (a Discord user id).
#[derive(Clone, Debug)]
pub struct SqliteStorage {
    pool: SqlitePool,
    scope: String,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool, scope: impl Into<String>) -> Self {
        Self {
            pool,
            scope: scope.into(),
        }
    }
}

#[async_trait]
impl KeyValueStore for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, SqlxError> {
        Ok(find(&self.pool, &self.scope, key)
            .await?
            .map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SqlxError> {
        upsert(&self.pool, &self.scope, key, value).await
    }

    async fn set_all(&self, entries: &[(&str, String)]) -> Result<(), SqlxError> {
        let mut tx = self.pool.begin().await?;
        for (key, value) in entries {
            upsert(&mut *tx, &self.scope, key, value).await?;
        }
        tx.commit().await
    }

    async fn remove(&self, key: &str) -> Result<(), SqlxError> {
        delete(&self.pool, &self.scope, key).await
    }
}

#[cfg(test)]
pub use memory::MemoryStorage;

#[cfg(test)]
mod memory {
    use super::KeyValueStore;
    use async_trait::async_trait;
    use sqlx::Error as SqlxError;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct MemoryStorage {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl KeyValueStore for MemoryStorage {
        async fn get(&self, key: &str) -> Result<Option<String>, SqlxError> {
            Ok(self.entries.lock().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), SqlxError> {
            self.entries
                .lock()
                .await
                .insert(key.to_owned(), value.to_owned());
            Ok(())
        }

        async fn set_all(&self, entries: &[(&str, String)]) -> Result<(), SqlxError> {
            let mut stored = self.entries.lock().await;
            for (key, value) in entries {
                stored.insert((*key).to_owned(), value.clone());
            }
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), SqlxError> {
            self.entries.lock().await.remove(key);
            Ok(())
        }
    }

    #[async_trait]
    impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
        async fn get(&self, key: &str) -> Result<Option<String>, SqlxError> {
            (**self).get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), SqlxError> {
            (**self).set(key, value).await
        }

        async fn set_all(&self, entries: &[(&str, String)]) -> Result<(), SqlxError> {
            (**self).set_all(entries).await
        }

        async fn remove(&self, key: &str) -> Result<(), SqlxError> {
            (**self).remove(key).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations apply");
        pool
    }

    #[tokio::test]
    async fn set_get_and_overwrite() {
        let storage = SqliteStorage::new(memory_pool().await, "1");

        assert_eq!(storage.get("bestTime").await.unwrap(), None);
        storage.set("bestTime", "42").await.unwrap();
        storage.set("bestTime", "30").await.unwrap();
        assert_eq!(
            storage.get("bestTime").await.unwrap().as_deref(),
            Some("30")
        );
    }

    #[tokio::test]
    async fn remove_is_quiet_for_missing_keys() {
        let storage = SqliteStorage::new(memory_pool().await, "1");

        storage.remove("scores").await.unwrap();
        storage.set("scores", "[]").await.unwrap();
        storage.remove("scores").await.unwrap();
        assert_eq!(storage.get("scores").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_all_writes_every_entry() {
        let storage = SqliteStorage::new(memory_pool().await, "1");

        storage.set("bestTime", "50").await.unwrap();
        storage
            .set_all(&[("bestTime", "40".to_string()), ("scores", "[]".to_string())])
            .await
            .unwrap();
        assert_eq!(storage.get("bestTime").await.unwrap().as_deref(), Some("40"));
        assert_eq!(storage.get("scores").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn scopes_do_not_see_each_other() {
        let pool = memory_pool().await;
        let alice = SqliteStorage::new(pool.clone(), "100");
        let bob = SqliteStorage::new(pool, "200");

        alice.set("bestTime", "12").await.unwrap();
        assert_eq!(bob.get("bestTime").await.unwrap(), None);

        bob.set("bestTime", "7").await.unwrap();
        alice.remove("bestTime").await.unwrap();
        assert_eq!(bob.get("bestTime").await.unwrap().as_deref(), Some("7"));
    }
}
