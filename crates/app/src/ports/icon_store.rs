//! Icon store port — persistent key-value storage for resolved glyphs.

use std::future::Future;

use pageshell_domain::error::ShellError;

/// Persistent icon name → path data store, scoped to one catalog version.
///
/// `get_many` and `put_many` each run as a single transaction.
pub trait IconStore {
    /// Read every name in one transaction, returning results in input order.
    fn get_many(
        &self,
        names: Vec<String>,
    ) -> impl Future<Output = Result<Vec<Option<String>>, ShellError>> + Send;

    /// Write every entry in one transaction, replacing existing values.
    fn put_many(
        &self,
        entries: Vec<(String, String)>,
    ) -> impl Future<Output = Result<(), ShellError>> + Send;

    /// Remove every stored icon.
    fn clear(&self) -> impl Future<Output = Result<(), ShellError>> + Send;

    /// Catalog version the stored entries belong to, if any was recorded.
    fn version(&self) -> impl Future<Output = Result<Option<String>, ShellError>> + Send;

    /// Record the catalog version of the stored entries.
    fn set_version(&self, version: &str) -> impl Future<Output = Result<(), ShellError>> + Send;
}

impl<T: IconStore + Send + Sync> IconStore for std::sync::Arc<T> {
    fn get_many(
        &self,
        names: Vec<String>,
    ) -> impl Future<Output = Result<Vec<Option<String>>, ShellError>> + Send {
        (**self).get_many(names)
    }

    fn put_many(
        &self,
        entries: Vec<(String, String)>,
    ) -> impl Future<Output = Result<(), ShellError>> + Send {
        (**self).put_many(entries)
    }

    fn clear(&self) -> impl Future<Output = Result<(), ShellError>> + Send {
        (**self).clear()
    }

    fn version(&self) -> impl Future<Output = Result<Option<String>, ShellError>> + Send {
        (**self).version()
    }

    fn set_version(&self, version: &str) -> impl Future<Output = Result<(), ShellError>> + Send {
        (**self).set_version(version)
    }
}
