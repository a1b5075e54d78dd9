//! Location-driven shell — turns `location-changed` events into routes for the
//! top-level router.

use std::rc::Rc;

use tokio::sync::broadcast;

use pageshell_domain::event::ShellEvent;
use pageshell_domain::route::Route;

use crate::router::PageRouter;

/// Feeds the part of the location under `mount` to a router.
pub struct Shell {
    mount: String,
    router: PageRouter,
}

impl Shell {
    /// `mount` is the URL prefix owned by `router`, e.g. `/hassio`.
    #[must_use]
    pub fn new(mount: impl Into<String>, router: PageRouter) -> Self {
        let mount = mount.into();
        Self {
            mount: mount.trim_end_matches('/').to_string(),
            router,
        }
    }

    /// Route for a location, `None` when it lies outside the mount point.
    /// The query string is not part of the route.
    #[must_use]
    pub fn route_for(&self, location: &str) -> Option<Route> {
        let path = location.split_once('?').map_or(location, |(path, _)| path);
        let rest = path.strip_prefix(self.mount.as_str())?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        Some(Route::new(self.mount.as_str(), rest))
    }

    /// Apply one location to the router.
    pub fn navigate(&self, location: &str) {
        let route = self.route_for(location);
        if route.is_none() {
            tracing::debug!(%location, mount = %self.mount, "location outside of mount point");
        }
        self.router.set_route(route.map(Rc::new));
    }

    /// Follow location changes until the bus closes.
    pub async fn run(self, mut events: broadcast::Receiver<ShellEvent>) {
        loop {
            match events.recv().await {
                Ok(ShellEvent::LocationChanged { path, .. }) => self.navigate(&path),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "shell lagged behind location changes");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!("event bus closed, stopping shell");
                    break;
                }
            }
        }
    }
}
