//! Supervisor panel: the top-level `hassio` router and the tabbed panel
//! router mounted as its dashboard.

use std::cell::OnceCell;
use std::rc::Rc;

use pageshell_domain::error::ShellError;
use pageshell_domain::route_table::RouteTable;

use crate::ports::{
    ChangedProps, HassioApi, ModuleLoader, Navigator, PageElement, PageHost, PageProps,
};
use crate::router::{PageRoute, PageRouter, RouterOptions, WeakPageRouter};

pub const PANEL_TAG: &str = "hassio-panel";
pub const ADDON_VIEW_TAG: &str = "hassio-addon-view";
pub const INGRESS_VIEW_TAG: &str = "hassio-ingress-view";

pub const DASHBOARD_TAG: &str = "hassio-dashboard";
pub const SNAPSHOTS_TAG: &str = "hassio-snapshots";
pub const ADDON_STORE_TAG: &str = "hassio-addon-store";
pub const SYSTEM_TAG: &str = "hassio-system";

/// Top-level supervisor router.
///
/// Fetches supervisor data before anything renders, keeps the tabbed panel
/// alive across visits and lazily loads the add-on and ingress views.
pub struct HassioMain {
    router: PageRouter,
}

impl HassioMain {
    /// Route table of the supervisor panel.
    ///
    /// The tab pages all alias `dashboard` so the cached panel stays mounted
    /// while switching tabs; it gets the full route and routes on it again.
    pub fn routes(modules: &Rc<dyn ModuleLoader>) -> RouteTable<PageRoute> {
        let lazy = |tag: &'static str| {
            let modules = Rc::clone(modules);
            PageRoute::new(tag).with_loader(move || modules.load(tag))
        };
        RouteTable::new()
            .with_page("dashboard", PageRoute::new(PANEL_TAG).cached().with_full_route())
            .with_redirect("snapshots", "dashboard")
            .with_redirect("store", "dashboard")
            .with_redirect("system", "dashboard")
            .with_page("addon", lazy(ADDON_VIEW_TAG))
            .with_page("ingress", lazy(INGRESS_VIEW_TAG))
    }

    /// Build the router. Call [`HassioMain::start`] from inside a `LocalSet`
    /// to kick off the initial data fetch.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Validation`] if the route table is malformed.
    pub fn new(
        host: Rc<dyn PageHost>,
        navigator: Rc<dyn Navigator>,
        api: Rc<dyn HassioApi>,
        modules: Rc<dyn ModuleLoader>,
    ) -> Result<Self, ShellError> {
        // The initial load writes into the router it configures.
        let slot: Rc<OnceCell<WeakPageRouter>> = Rc::default();
        let options = RouterOptions::new(Self::routes(&modules))
            .default_page("dashboard")
            .show_loading()
            .initial_load({
                let slot = Rc::clone(&slot);
                move || {
                    let slot = Rc::clone(&slot);
                    let fetch = api.fetch_info();
                    async move {
                        let info = fetch.await?;
                        tracing::debug!(props = info.len(), "fetched supervisor data");
                        if let Some(router) = slot.get().and_then(WeakPageRouter::upgrade) {
                            for (key, value) in info {
                                router.set_data(&key, value);
                            }
                        }
                        Ok(())
                    }
                }
            });

        let router = PageRouter::new(options, host, navigator)?;
        let _ = slot.set(router.downgrade());
        Ok(Self { router })
    }

    pub fn start(&self) {
        self.router.start();
    }

    #[must_use]
    pub fn router(&self) -> &PageRouter {
        &self.router
    }
}

/// Tabbed supervisor panel, itself a page of [`HassioMain`].
///
/// Receives the full supervisor route and mounts the tab named by its first
/// segment, forwarding supervisor, host and OS info to it.
pub struct HassioPanelRouter {
    router: PageRouter,
}

impl HassioPanelRouter {
    pub fn routes() -> RouteTable<PageRoute> {
        RouteTable::new()
            .with_page("dashboard", PageRoute::new(DASHBOARD_TAG))
            .with_page("snapshots", PageRoute::new(SNAPSHOTS_TAG))
            .with_page("store", PageRoute::new(ADDON_STORE_TAG))
            .with_page("system", PageRoute::new(SYSTEM_TAG))
    }

    /// # Errors
    ///
    /// Returns [`ShellError::Validation`] if the route table is malformed.
    pub fn new(host: Rc<dyn PageHost>, navigator: Rc<dyn Navigator>) -> Result<Self, ShellError> {
        let router = PageRouter::new(RouterOptions::new(Self::routes()), host, navigator)?;
        Ok(Self { router })
    }

    #[must_use]
    pub fn router(&self) -> &PageRouter {
        &self.router
    }
}

impl PageElement for HassioPanelRouter {
    fn tag(&self) -> &str {
        PANEL_TAG
    }

    fn update_page_el(&self, props: &PageProps, changed: &ChangedProps) {
        for (key, value) in &props.data {
            if changed.contains(key) {
                self.router.set_data(key, value.clone());
            }
        }
        self.router.set_narrow(props.narrow);
        self.router.set_route(props.route.clone());
    }
}
