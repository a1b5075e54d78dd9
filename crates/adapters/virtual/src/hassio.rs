//! Simulated supervisor: lazily loaded page modules and supervisor info.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture};

use pageshell_app::ports::{HassioApi, ModuleLoader};
use pageshell_domain::error::LoadError;

/// [`ModuleLoader`] with per-tag latency and failures.
#[derive(Default)]
pub struct VirtualModuleLoader {
    latency: HashMap<String, Duration>,
    failing: RefCell<HashSet<String>>,
    loads: RefCell<Vec<String>>,
}

impl VirtualModuleLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve loads of `tag` after `latency`.
    #[must_use]
    pub fn with_latency(mut self, tag: &str, latency: Duration) -> Self {
        self.latency.insert(tag.to_string(), latency);
        self
    }

    /// Make loads of `tag` fail until [`VirtualModuleLoader::recover`].
    pub fn fail(&self, tag: &str) {
        self.failing.borrow_mut().insert(tag.to_string());
    }

    pub fn recover(&self, tag: &str) {
        self.failing.borrow_mut().remove(tag);
    }

    /// Every tag loaded so far, in order.
    #[must_use]
    pub fn loads(&self) -> Vec<String> {
        self.loads.borrow().clone()
    }
}

impl ModuleLoader for VirtualModuleLoader {
    fn load(&self, tag: &str) -> LocalBoxFuture<'static, Result<(), LoadError>> {
        self.loads.borrow_mut().push(tag.to_string());
        let latency = self.latency.get(tag).copied().unwrap_or_default();
        let result = if self.failing.borrow().contains(tag) {
            Err(LoadError::new(format!("failed to load module for {tag}")))
        } else {
            Ok(())
        };
        async move {
            tokio::time::sleep(latency).await;
            result
        }
        .boxed_local()
    }
}

/// [`HassioApi`] answering with fixed supervisor info.
pub struct StaticHassioApi {
    info: BTreeMap<String, serde_json::Value>,
    latency: Duration,
    failure: Option<String>,
}

impl Default for StaticHassioApi {
    fn default() -> Self {
        let info = [
            ("supervisor_info", serde_json::json!({"version": "2021.01.7", "channel": "stable"})),
            ("hassio_info", serde_json::json!({"arch": "amd64", "machine": "qemux86-64"})),
            ("host_info", serde_json::json!({"hostname": "homeassistant"})),
            ("hass_info", serde_json::json!({"version": "2021.1.5"})),
            ("hass_os_info", serde_json::json!({"version": "5.10"})),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
        Self {
            info,
            latency: Duration::ZERO,
            failure: None,
        }
    }
}

impl StaticHassioApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail every fetch with `message`.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

impl HassioApi for StaticHassioApi {
    fn fetch_info(
        &self,
    ) -> LocalBoxFuture<'static, Result<BTreeMap<String, serde_json::Value>, LoadError>> {
        let result = match &self.failure {
            Some(message) => Err(LoadError::new(message.clone())),
            None => Ok(self.info.clone()),
        };
        let latency = self.latency;
        async move {
            tokio::time::sleep(latency).await;
            result
        }
        .boxed_local()
    }
}
