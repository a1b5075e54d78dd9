//! Router configuration: route table entries and router-wide options.

use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture};

use pageshell_domain::error::{LoadError, ValidationError};
use pageshell_domain::route_table::RouteTable;

/// How long a load may take before a loading screen stands in for the page.
pub const LOADING_SCREEN_THRESHOLD: Duration = Duration::from_millis(400);

/// Future returned by a [`Loader`].
pub type LoadFuture = LocalBoxFuture<'static, Result<(), LoadError>>;

/// Asynchronous load step (lazy module import, initial data fetch, …).
pub type Loader = Rc<dyn Fn() -> LoadFuture>;

/// Hook run after page resolution; returning a page name overrides it.
pub type BeforeRender = Rc<dyn Fn(&str) -> Option<String>>;

fn loader<L, Fut>(load: L) -> Loader
where
    L: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<(), LoadError>> + 'static,
{
    Rc::new(move || load().boxed_local())
}

/// A mountable page of a route table.
#[derive(Clone)]
pub struct PageRoute {
    /// Tag of the element to create.
    pub tag: String,
    /// Keep the element around for later visits.
    pub cache: bool,
    /// Hand the page this router's own route instead of its tail, for pages
    /// that route on the same segment again.
    pub full_route: bool,
    pub load: Option<Loader>,
}

impl PageRoute {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            cache: false,
            full_route: false,
            load: None,
        }
    }

    #[must_use]
    pub fn cached(mut self) -> Self {
        self.cache = true;
        self
    }

    #[must_use]
    pub fn with_full_route(mut self) -> Self {
        self.full_route = true;
        self
    }

    #[must_use]
    pub fn with_loader<L, Fut>(mut self, load: L) -> Self
    where
        L: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<(), LoadError>> + 'static,
    {
        self.load = Some(loader(load));
        self
    }
}

impl fmt::Debug for PageRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRoute")
            .field("tag", &self.tag)
            .field("cache", &self.cache)
            .field("full_route", &self.full_route)
            .field("load", &self.load.is_some())
            .finish()
    }
}

/// Configuration of one [`PageRouter`](super::PageRouter).
#[derive(Clone)]
pub struct RouterOptions {
    /// Page used (and written to the URL) when the route path is empty.
    pub default_page: Option<String>,
    /// Runs once before anything renders.
    pub initial_load: Option<Loader>,
    /// Trigger every page loader once at start.
    pub preload_all: bool,
    /// Show a loading screen for loads slower than `loading_threshold`.
    pub show_loading: bool,
    /// Cache every page element regardless of [`PageRoute::cache`].
    pub cache_all: bool,
    pub before_render: Option<BeforeRender>,
    pub loading_threshold: Duration,
    pub routes: RouteTable<PageRoute>,
}

impl RouterOptions {
    #[must_use]
    pub fn new(routes: RouteTable<PageRoute>) -> Self {
        Self {
            default_page: None,
            initial_load: None,
            preload_all: false,
            show_loading: false,
            cache_all: false,
            before_render: None,
            loading_threshold: LOADING_SCREEN_THRESHOLD,
            routes,
        }
    }

    #[must_use]
    pub fn default_page(mut self, page: impl Into<String>) -> Self {
        self.default_page = Some(page.into());
        self
    }

    #[must_use]
    pub fn initial_load<L, Fut>(mut self, load: L) -> Self
    where
        L: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<(), LoadError>> + 'static,
    {
        self.initial_load = Some(loader(load));
        self
    }

    #[must_use]
    pub fn preload_all(mut self) -> Self {
        self.preload_all = true;
        self
    }

    #[must_use]
    pub fn show_loading(mut self) -> Self {
        self.show_loading = true;
        self
    }

    #[must_use]
    pub fn cache_all(mut self) -> Self {
        self.cache_all = true;
        self
    }

    #[must_use]
    pub fn before_render<H>(mut self, hook: H) -> Self
    where
        H: Fn(&str) -> Option<String> + 'static,
    {
        self.before_render = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn loading_threshold(mut self, threshold: Duration) -> Self {
        self.loading_threshold = threshold;
        self
    }

    /// Check the route table for empty tags and broken redirect chains.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some((name, _)) = self.routes.pages().find(|(_, page)| page.tag.is_empty()) {
            return Err(ValidationError::EmptyTag {
                page: name.to_string(),
            });
        }
        self.routes.validate()
    }
}

impl fmt::Debug for RouterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterOptions")
            .field("default_page", &self.default_page)
            .field("initial_load", &self.initial_load.is_some())
            .field("preload_all", &self.preload_all)
            .field("show_loading", &self.show_loading)
            .field("cache_all", &self.cache_all)
            .field("before_render", &self.before_render.is_some())
            .field("loading_threshold", &self.loading_threshold)
            .field("routes", &self.routes)
            .finish()
    }
}
