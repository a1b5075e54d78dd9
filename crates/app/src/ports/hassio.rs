//! Ports used by the supervisor panel route tables.

use std::collections::BTreeMap;

use futures::future::LocalBoxFuture;
use pageshell_domain::error::LoadError;

/// Loads the code behind a lazily registered page element.
pub trait ModuleLoader {
    /// Load the module defining `tag`. Resolves once the element can be created.
    fn load(&self, tag: &str) -> LocalBoxFuture<'static, Result<(), LoadError>>;
}

/// Supervisor data fetched once before the panel renders.
pub trait HassioApi {
    /// Fetch supervisor, host, OS and core info keyed by prop name
    /// (`supervisor_info`, `hassio_info`, `host_info`, `hass_info`, `hass_os_info`).
    fn fetch_info(
        &self,
    ) -> LocalBoxFuture<'static, Result<BTreeMap<String, serde_json::Value>, LoadError>>;
}
