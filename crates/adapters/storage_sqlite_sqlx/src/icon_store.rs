//! `SQLite` implementation of [`IconStore`].

use std::future::Future;

use sqlx::SqlitePool;

use pageshell_app::ports::IconStore;
use pageshell_domain::error::ShellError;

use crate::error::StorageError;

const SELECT_PATH: &str = "SELECT path FROM icons WHERE name = ?";
const UPSERT_ICON: &str =
    "INSERT INTO icons (name, path) VALUES (?, ?) ON CONFLICT(name) DO UPDATE SET path = excluded.path";
const DELETE_ALL: &str = "DELETE FROM icons";
const SELECT_VERSION: &str = "SELECT value FROM icon_meta WHERE key = 'version'";
const UPSERT_VERSION: &str = "INSERT INTO icon_meta (key, value) VALUES ('version', ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value";

/// `SQLite`-backed icon store.
#[derive(Clone)]
pub struct SqliteIconStore {
    pool: SqlitePool,
}

impl SqliteIconStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl IconStore for SqliteIconStore {
    fn get_many(
        &self,
        names: Vec<String>,
    ) -> impl Future<Output = Result<Vec<Option<String>>, ShellError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            let mut found = Vec::with_capacity(names.len());
            for name in &names {
                let path: Option<String> = sqlx::query_scalar(SELECT_PATH)
                    .bind(name)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(StorageError::from)?;
                found.push(path);
            }
            tx.commit().await.map_err(StorageError::from)?;

            Ok(found)
        }
    }

    fn put_many(
        &self,
        entries: Vec<(String, String)>,
    ) -> impl Future<Output = Result<(), ShellError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            for (name, path) in &entries {
                sqlx::query(UPSERT_ICON)
                    .bind(name)
                    .bind(path)
                    .execute(&mut *tx)
                    .await
                    .map_err(StorageError::from)?;
            }
            tx.commit().await.map_err(StorageError::from)?;
            tracing::debug!(count = entries.len(), "persisted icons");

            Ok(())
        }
    }

    fn clear(&self) -> impl Future<Output = Result<(), ShellError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_ALL)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn version(&self) -> impl Future<Output = Result<Option<String>, ShellError>> + Send {
        let pool = self.pool.clone();
        async move {
            let version: Option<String> = sqlx::query_scalar(SELECT_VERSION)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(version)
        }
    }

    fn set_version(&self, version: &str) -> impl Future<Output = Result<(), ShellError>> + Send {
        let pool = self.pool.clone();
        let version = version.to_string();
        async move {
            sqlx::query(UPSERT_VERSION)
                .bind(version)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
