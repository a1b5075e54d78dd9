//! Page router — keeps exactly the page named by the current route mounted.
//!
//! Every route change resolves a page name (default page, redirect aliases,
//! `before_render` override), then either forwards props to the page already
//! mounted or starts a new mount. Mounts may wait on an asynchronous load; a
//! loading screen stands in when the load is slower than the threshold, and
//! an error screen replaces the page when it fails.
//!
//! Loads are never cancelled. Each mount takes a ticket (page name plus a
//! mount epoch) and every continuation checks it is still current before
//! touching the host, so a navigation that lands while an older load is in
//! flight turns that load's continuations into no-ops.
//!
//! The router is single-threaded: it spawns its continuations with
//! [`tokio::task::spawn_local`] and must be driven from inside a
//! [`tokio::task::LocalSet`].

pub mod options;

pub use options::{
    BeforeRender, LOADING_SCREEN_THRESHOLD, LoadFuture, Loader, PageRoute, RouterOptions,
};

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::rc::{Rc, Weak};

use futures::future::{self, FutureExt, Shared};

use pageshell_domain::error::{LoadError, ShellError};
use pageshell_domain::route::{Route, TailMemo};
use pageshell_domain::route_table::{Resolved, RouteEntry};

use crate::ports::page_host::{NARROW_PROP, ROUTE_PROP};
use crate::ports::{ChangedProps, ElementRef, Navigator, PageHost, PageProps};

/// Page name used when the router has no route at all.
pub const NOT_FOUND_PAGE: &str = "not_found";

type SharedLoad = Shared<LoadFuture>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InitialLoad {
    Pending,
    Done,
    Failed,
}

struct RouterState {
    route: Option<Rc<Route>>,
    tail: TailMemo,
    narrow: bool,
    data: BTreeMap<String, serde_json::Value>,
    /// Mounted (or mounting) page, empty when none.
    current_page: String,
    epoch: u64,
    /// Outstanding load of a page shown behind a loading screen.
    current_load: Option<SharedLoad>,
    /// Most recent load of any kind, awaited by `page_rendered`.
    last_load: Option<SharedLoad>,
    awaiting_mount: bool,
    full_route: bool,
    cache: HashMap<String, ElementRef>,
    initial_load: InitialLoad,
    started: bool,
}

struct Inner {
    options: RouterOptions,
    host: Rc<dyn PageHost>,
    navigator: Rc<dyn Navigator>,
    state: RefCell<RouterState>,
}

/// Route-driven page mounting state machine.
///
/// Cloning yields another handle to the same router.
#[derive(Clone)]
pub struct PageRouter {
    inner: Rc<Inner>,
}

/// Non-owning handle to a [`PageRouter`].
#[derive(Clone)]
pub struct WeakPageRouter {
    inner: Weak<Inner>,
}

impl WeakPageRouter {
    #[must_use]
    pub fn upgrade(&self) -> Option<PageRouter> {
        self.inner.upgrade().map(|inner| PageRouter { inner })
    }
}

fn changed(prop: &str) -> ChangedProps {
    ChangedProps::from([prop.to_string()])
}

impl PageRouter {
    /// Create a router mounting pages into `host`.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Validation`] if the route table has empty tags or
    /// redirect aliases that never reach a page.
    pub fn new(
        options: RouterOptions,
        host: Rc<dyn PageHost>,
        navigator: Rc<dyn Navigator>,
    ) -> Result<Self, ShellError> {
        options.validate()?;
        let initial_load = if options.initial_load.is_some() {
            InitialLoad::Pending
        } else {
            InitialLoad::Done
        };
        Ok(Self {
            inner: Rc::new(Inner {
                options,
                host,
                navigator,
                state: RefCell::new(RouterState {
                    route: None,
                    tail: TailMemo::new(),
                    narrow: false,
                    data: BTreeMap::new(),
                    current_page: String::new(),
                    epoch: 0,
                    current_load: None,
                    last_load: None,
                    awaiting_mount: false,
                    full_route: false,
                    cache: HashMap::new(),
                    initial_load,
                    started: false,
                }),
            }),
        })
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakPageRouter {
        WeakPageRouter {
            inner: Rc::downgrade(&self.inner),
        }
    }

    #[must_use]
    pub fn options(&self) -> &RouterOptions {
        &self.inner.options
    }

    /// Page currently mounted or being mounted, empty when none.
    #[must_use]
    pub fn current_page(&self) -> String {
        self.inner.state.borrow().current_page.clone()
    }

    #[must_use]
    pub fn route(&self) -> Option<Rc<Route>> {
        self.inner.state.borrow().route.clone()
    }

    /// Run first-render work: preload every page if configured and start the
    /// initial load. Calling it again does nothing.
    pub fn start(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.started {
                return;
            }
            state.started = true;
        }

        let options = &self.inner.options;
        if options.preload_all {
            for (name, page) in options.routes.pages() {
                let Some(load) = &page.load else {
                    continue;
                };
                let name = name.to_string();
                let load = load();
                tokio::task::spawn_local(async move {
                    if let Err(err) = load.await {
                        tracing::warn!(page = %name, error = %err, "preloading page failed");
                    }
                });
            }
        }

        if let Some(initial_load) = &options.initial_load {
            let threshold = options.loading_threshold;
            let weak = self.downgrade();
            tokio::task::spawn_local(async move {
                tokio::time::sleep(threshold).await;
                let Some(router) = weak.upgrade() else {
                    return;
                };
                let pending = router.inner.state.borrow().initial_load == InitialLoad::Pending;
                if pending {
                    router
                        .inner
                        .host
                        .append_child(router.inner.host.create_loading_screen());
                }
            });

            let load = initial_load();
            let weak = self.downgrade();
            tokio::task::spawn_local(async move {
                let result = load.await;
                if let Some(router) = weak.upgrade() {
                    router.finish_initial_load(result);
                }
            });
        }
    }

    /// Hand the router a new route; `None` unmounts whatever is shown.
    ///
    /// Routes are compared by identity, so passing the same `Rc` again is a
    /// no-op while an equal but distinct route triggers resolution.
    pub fn set_route(&self, route: Option<Rc<Route>>) {
        let unchanged = {
            let mut state = self.inner.state.borrow_mut();
            let unchanged = match (&state.route, &route) {
                (Some(current), Some(next)) => Rc::ptr_eq(current, next),
                (None, None) => true,
                _ => false,
            };
            state.route = route;
            unchanged
        };
        if !unchanged {
            self.update(&changed(ROUTE_PROP));
        }
    }

    pub fn set_narrow(&self, narrow: bool) {
        let unchanged = {
            let mut state = self.inner.state.borrow_mut();
            std::mem::replace(&mut state.narrow, narrow) == narrow
        };
        if !unchanged {
            self.update(&changed(NARROW_PROP));
        }
    }

    /// Set an application prop (`hass`, `supervisor_info`, …) forwarded to pages.
    pub fn set_data(&self, key: &str, value: serde_json::Value) {
        let unchanged = {
            let mut state = self.inner.state.borrow_mut();
            state.data.insert(key.to_string(), value.clone()) == Some(value)
        };
        if !unchanged {
            self.update(&changed(key));
        }
    }

    /// Remount the current page from scratch.
    ///
    /// Clears the route, lets one render pass happen, then restores it unless
    /// something else set a route in the meantime.
    pub async fn rebuild(&self) {
        let Some(previous) = self.route() else {
            return;
        };
        self.set_route(None);
        tokio::task::yield_now().await;
        if self.route().is_none() {
            self.set_route(Some(previous));
        }
    }

    /// Resolves once the latest navigation has settled (page, error screen or
    /// nothing mounted).
    pub fn page_rendered(&self) -> impl Future<Output = ()> + 'static {
        let load = self.inner.state.borrow().last_load.clone();
        async move {
            tokio::task::yield_now().await;
            if let Some(load) = load {
                let _ = load.await;
            }
            // Let the continuations woken by the load run before returning.
            tokio::task::yield_now().await;
        }
    }

    fn finish_initial_load(&self, result: Result<(), LoadError>) {
        match result {
            Ok(()) => {
                self.inner.state.borrow_mut().initial_load = InitialLoad::Done;
                self.update(&changed(ROUTE_PROP));
            }
            Err(err) => {
                tracing::warn!(error = %err, "initial load failed");
                self.inner.state.borrow_mut().initial_load = InitialLoad::Failed;
                let message = format!("Error while loading: {err}");
                self.replace_child(self.inner.host.create_error_screen(&message));
            }
        }
    }

    fn update(&self, changed: &ChangedProps) {
        let inner = &self.inner;
        let options = &inner.options;

        if inner.state.borrow().initial_load != InitialLoad::Done {
            return;
        }

        if !changed.contains(ROUTE_PROP) {
            // An old page is still shown while the new one loads.
            let loading = inner.state.borrow().current_load.is_some();
            if !loading && let Some(child) = inner.host.last_child() {
                child.update_page_el(&self.child_props(), changed);
            }
            return;
        }

        let route = self.route();
        if let (Some(route), Some(default_page)) = (&route, &options.default_page)
            && route.path.is_empty()
        {
            inner.navigator.navigate(&route.join(default_page), true);
        }

        let requested = match &route {
            Some(route) if route.path.is_empty() => {
                options.default_page.clone().unwrap_or_default()
            }
            Some(route) => route.page_segment().to_string(),
            None => NOT_FOUND_PAGE.to_string(),
        };
        let mut resolved = options.routes.resolve(&requested);

        if let Some(hook) = &options.before_render
            && let Some(target) = hook(&resolved.name)
        {
            resolved = options.routes.resolve(&target);
            if let Some(route) = &route {
                let url = format!("{}{}", route.join(&target), inner.navigator.search());
                inner.navigator.navigate(&url, true);
            }
        }

        let Resolved {
            name: new_page,
            page,
        } = resolved;
        if page.is_none() && matches!(options.routes.get(&new_page), Some(RouteEntry::Redirect(_)))
        {
            tracing::warn!(page = %new_page, "redirect aliases never reach a page");
        }

        if inner.state.borrow().current_page == new_page {
            // A page still loading picks the props up when it is created.
            let loading = inner.state.borrow().current_load.is_some();
            if !loading && let Some(child) = inner.host.last_child() {
                child.update_page_el(&self.child_props(), changed);
            }
            return;
        }

        let Some(page) = page.cloned() else {
            tracing::debug!(page = %new_page, "no route for page, unmounting");
            {
                let mut state = inner.state.borrow_mut();
                state.current_page.clear();
                state.epoch += 1;
                state.current_load = None;
                state.awaiting_mount = false;
            }
            if let Some(child) = inner.host.last_child() {
                inner.host.remove_child(&child);
            }
            return;
        };

        self.mount(new_page, page);
    }

    fn mount(&self, name: String, page: PageRoute) {
        let inner = &self.inner;
        tracing::debug!(page = %name, tag = %page.tag, "mounting page");

        let load: SharedLoad = match &page.load {
            Some(load) => load(),
            None => future::ready(Ok(())).boxed_local(),
        }
        .shared();

        let epoch = {
            let mut state = inner.state.borrow_mut();
            state.current_page.clone_from(&name);
            state.epoch += 1;
            state.last_load = Some(load.clone());
            state.current_load = None;
            state.awaiting_mount = false;
            state.full_route = page.full_route;
            state.epoch
        };
        let ticket = Ticket {
            router: self.downgrade(),
            page: Rc::from(name),
            epoch,
        };

        tokio::task::spawn_local({
            let ticket = ticket.clone();
            let load = load.clone();
            async move {
                if let Err(err) = load.await {
                    ticket.fail(&err);
                }
            }
        });

        if !inner.options.show_loading {
            self.create_panel(&ticket.page, &page);
            return;
        }

        {
            let mut state = inner.state.borrow_mut();
            state.current_load = Some(load.clone());
            state.awaiting_mount = true;
        }

        let threshold = inner.options.loading_threshold;
        tokio::task::spawn_local({
            let ticket = ticket.clone();
            async move {
                tokio::time::sleep(threshold).await;
                ticket.show_loading_screen();
            }
        });

        tokio::task::spawn_local(async move {
            let loaded = load.await.is_ok();
            ticket.finish(loaded, &page);
        });
    }

    fn create_panel(&self, name: &str, page: &PageRoute) {
        let inner = &self.inner;
        if let Some(child) = inner.host.last_child() {
            inner.host.remove_child(&child);
        }

        let cached = inner.state.borrow().cache.get(name).cloned();
        let element = cached.unwrap_or_else(|| inner.host.create_element(&page.tag));
        let props = self.child_props();
        element.update_page_el(&props, &props.all_keys());
        inner.host.append_child(Rc::clone(&element));

        if inner.options.cache_all || page.cache {
            inner
                .state
                .borrow_mut()
                .cache
                .insert(name.to_string(), element);
        }
    }

    fn replace_child(&self, element: ElementRef) {
        if let Some(child) = self.inner.host.last_child() {
            self.inner.host.remove_child(&child);
        }
        self.inner.host.append_child(element);
    }

    fn child_props(&self) -> PageProps {
        let mut guard = self.inner.state.borrow_mut();
        let state = &mut *guard;
        let route = if state.full_route {
            state.route.clone()
        } else {
            state.route.as_ref().map(|route| state.tail.compute(route))
        };
        PageProps {
            route,
            narrow: state.narrow,
            data: state.data.clone(),
        }
    }
}

/// Identity of one mount, checked by its continuations.
#[derive(Clone)]
struct Ticket {
    router: WeakPageRouter,
    page: Rc<str>,
    epoch: u64,
}

impl Ticket {
    /// The router, if this mount is still the one it should show.
    fn current(&self) -> Option<PageRouter> {
        let router = self.router.upgrade()?;
        let current = {
            let state = router.inner.state.borrow();
            state.epoch == self.epoch && *state.current_page == *self.page
        };
        current.then_some(router)
    }

    fn show_loading_screen(&self) {
        let Some(router) = self.current() else {
            return;
        };
        let awaiting = router.inner.state.borrow().awaiting_mount;
        if awaiting {
            tracing::debug!(page = %self.page, "page is slow to load, showing loading screen");
            router.replace_child(router.inner.host.create_loading_screen());
        }
    }

    fn finish(&self, loaded: bool, page: &PageRoute) {
        let Some(router) = self.current() else {
            tracing::debug!(page = %self.page, "load finished for superseded navigation");
            return;
        };
        {
            let mut state = router.inner.state.borrow_mut();
            state.current_load = None;
            if !loaded {
                return;
            }
            state.awaiting_mount = false;
        }
        router.create_panel(&self.page, page);
    }

    fn fail(&self, err: &LoadError) {
        let Some(router) = self.current() else {
            tracing::debug!(page = %self.page, error = %err, "ignoring load failure of superseded navigation");
            return;
        };
        tracing::warn!(page = %self.page, error = %err, "page failed to load");
        {
            let mut state = router.inner.state.borrow_mut();
            state.current_load = None;
            state.awaiting_mount = false;
        }
        let message = format!("Error while loading page {}.", self.page);
        router.replace_child(router.inner.host.create_error_screen(&message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    use pageshell_domain::route_table::RouteTable;
    use tokio::task::LocalSet;
    use tokio::time::sleep;

    use crate::ports::page_host::{ERROR_SCREEN_TAG, LOADING_SCREEN_TAG};
    use crate::ports::PageElement;

    // ── Headless host ──────────────────────────────────────────────

    struct TestElement {
        tag: String,
        message: Option<String>,
        updates: Cell<usize>,
        last_props: RefCell<Option<PageProps>>,
        last_changed: RefCell<ChangedProps>,
    }

    impl PageElement for TestElement {
        fn tag(&self) -> &str {
            &self.tag
        }

        fn update_page_el(&self, props: &PageProps, changed: &ChangedProps) {
            self.updates.set(self.updates.get() + 1);
            *self.last_props.borrow_mut() = Some(props.clone());
            *self.last_changed.borrow_mut() = changed.clone();
        }
    }

    #[derive(Default)]
    struct TestHost {
        children: RefCell<Vec<ElementRef>>,
        appended: RefCell<Vec<String>>,
        created: RefCell<Vec<Rc<TestElement>>>,
    }

    impl TestHost {
        fn make(&self, tag: &str, message: Option<String>) -> ElementRef {
            let element = Rc::new(TestElement {
                tag: tag.to_string(),
                message,
                updates: Cell::new(0),
                last_props: RefCell::new(None),
                last_changed: RefCell::new(ChangedProps::new()),
            });
            self.created.borrow_mut().push(Rc::clone(&element));
            element
        }

        fn mounted_tags(&self) -> Vec<String> {
            self.children
                .borrow()
                .iter()
                .map(|child| child.tag().to_string())
                .collect()
        }

        fn mounted(&self) -> Rc<TestElement> {
            let children = self.children.borrow();
            let child = children.last().expect("a mounted element");
            self.created
                .borrow()
                .iter()
                .find(|element| std::ptr::addr_eq(Rc::as_ptr(element), Rc::as_ptr(child)))
                .cloned()
                .expect("mounted element was created by this host")
        }

        fn created_with_tag(&self, tag: &str) -> usize {
            self.created
                .borrow()
                .iter()
                .filter(|element| element.tag == tag)
                .count()
        }
    }

    impl PageHost for TestHost {
        fn create_element(&self, tag: &str) -> ElementRef {
            self.make(tag, None)
        }

        fn create_error_screen(&self, message: &str) -> ElementRef {
            self.make(ERROR_SCREEN_TAG, Some(message.to_string()))
        }

        fn last_child(&self) -> Option<ElementRef> {
            self.children.borrow().last().cloned()
        }

        fn append_child(&self, element: ElementRef) {
            assert!(
                self.children.borrow().is_empty(),
                "mounting {} on top of {:?}",
                element.tag(),
                self.mounted_tags()
            );
            self.appended.borrow_mut().push(element.tag().to_string());
            self.children.borrow_mut().push(element);
        }

        fn remove_child(&self, element: &ElementRef) {
            self.children
                .borrow_mut()
                .retain(|child| !Rc::ptr_eq(child, element));
        }
    }

    #[derive(Default)]
    struct TestNavigator {
        visits: RefCell<Vec<(String, bool)>>,
    }

    impl Navigator for TestNavigator {
        fn navigate(&self, path: &str, replace: bool) {
            self.visits.borrow_mut().push((path.to_string(), replace));
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn make_router(options: RouterOptions) -> (PageRouter, Rc<TestHost>, Rc<TestNavigator>) {
        let host = Rc::new(TestHost::default());
        let navigator = Rc::new(TestNavigator::default());
        let router = PageRouter::new(options, host.clone(), navigator.clone()).unwrap();
        (router, host, navigator)
    }

    fn route(prefix: &str, path: &str) -> Option<Rc<Route>> {
        Some(Rc::new(Route::new(prefix, path)))
    }

    fn delayed(millis: u64) -> PageRoute {
        PageRoute::new(format!("page-{millis}")).with_loader(move || async move {
            sleep(Duration::from_millis(millis)).await;
            Ok(())
        })
    }

    fn failing(millis: u64) -> PageRoute {
        PageRoute::new("broken-page").with_loader(move || async move {
            sleep(Duration::from_millis(millis)).await;
            Err(LoadError::new("module not found"))
        })
    }

    fn hassio_routes() -> RouteTable<PageRoute> {
        RouteTable::new()
            .with_page("dashboard", PageRoute::new("hassio-dashboard"))
            .with_page("store", PageRoute::new("hassio-addon-store"))
            .with_redirect("snapshots", "dashboard")
    }

    // ── Resolution ─────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn should_mount_page_named_by_first_segment() {
        LocalSet::new()
            .run_until(async {
                let (router, host, _) = make_router(RouterOptions::new(hassio_routes()));

                router.set_route(route("/hassio", "/store/core_ssh"));
                router.page_rendered().await;

                assert_eq!(host.mounted_tags(), vec!["hassio-addon-store"]);
                assert_eq!(router.current_page(), "store");
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_mount_aliased_page() {
        LocalSet::new()
            .run_until(async {
                let (router, host, _) = make_router(RouterOptions::new(hassio_routes()));

                router.set_route(route("/hassio", "/snapshots"));
                router.page_rendered().await;

                assert_eq!(host.mounted_tags(), vec!["hassio-dashboard"]);
                assert_eq!(router.current_page(), "dashboard");
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_resolve_redirect_aliases_transitively() {
        LocalSet::new()
            .run_until(async {
                let routes = RouteTable::new()
                    .with_redirect("a", "b")
                    .with_redirect("b", "c")
                    .with_page("c", PageRoute::new("x"));
                let (router, host, _) = make_router(RouterOptions::new(routes));

                router.set_route(route("", "/a"));
                router.page_rendered().await;

                assert_eq!(host.mounted_tags(), vec!["x"]);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_unmount_when_page_is_unknown() {
        LocalSet::new()
            .run_until(async {
                let (router, host, _) = make_router(RouterOptions::new(hassio_routes()));

                router.set_route(route("/hassio", "/dashboard"));
                router.page_rendered().await;
                router.set_route(route("/hassio", "/nowhere"));
                router.page_rendered().await;

                assert!(host.mounted_tags().is_empty());
                assert_eq!(router.current_page(), "");
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_rewrite_url_to_default_page_when_path_is_empty() {
        LocalSet::new()
            .run_until(async {
                let options = RouterOptions::new(hassio_routes()).default_page("dashboard");
                let (router, host, navigator) = make_router(options);

                router.set_route(route("/hassio", ""));
                router.page_rendered().await;

                assert_eq!(
                    *navigator.visits.borrow(),
                    vec![("/hassio/dashboard".to_string(), true)]
                );
                assert_eq!(host.mounted_tags(), vec!["hassio-dashboard"]);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_apply_before_render_override() {
        LocalSet::new()
            .run_until(async {
                let options = RouterOptions::new(hassio_routes()).before_render(|page| {
                    (page == "dashboard").then(|| "store".to_string())
                });
                let (router, host, navigator) = make_router(options);

                router.set_route(route("/hassio", "/snapshots"));
                router.page_rendered().await;

                assert_eq!(host.mounted_tags(), vec!["hassio-addon-store"]);
                assert_eq!(
                    *navigator.visits.borrow(),
                    vec![("/hassio/store".to_string(), true)]
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_hand_tail_route_to_page() {
        LocalSet::new()
            .run_until(async {
                let (router, host, _) = make_router(RouterOptions::new(hassio_routes()));

                router.set_route(route("/hassio", "/store/core_ssh/info"));
                router.page_rendered().await;

                let props = host.mounted().last_props.borrow().clone().unwrap();
                assert_eq!(
                    props.route.as_deref(),
                    Some(&Route::new("/hassio/store", "/core_ssh/info"))
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_hand_full_route_when_configured() {
        LocalSet::new()
            .run_until(async {
                let routes = RouteTable::new()
                    .with_page("dashboard", PageRoute::new("hassio-panel").with_full_route());
                let (router, host, _) = make_router(RouterOptions::new(routes));

                router.set_route(route("/hassio", "/dashboard"));
                router.page_rendered().await;

                let props = host.mounted().last_props.borrow().clone().unwrap();
                assert_eq!(
                    props.route.as_deref(),
                    Some(&Route::new("/hassio", "/dashboard"))
                );
            })
            .await;
    }

    // ── Same page & props ──────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn should_not_remount_same_page() {
        LocalSet::new()
            .run_until(async {
                let (router, host, _) = make_router(RouterOptions::new(hassio_routes()));

                router.set_route(route("/hassio", "/dashboard"));
                router.page_rendered().await;
                let first = host.mounted();

                router.set_route(route("/hassio", "/snapshots"));
                router.page_rendered().await;
                let second = host.mounted();

                assert!(Rc::ptr_eq(&first, &second));
                assert_eq!(host.created_with_tag("hassio-dashboard"), 1);
                assert_eq!(second.updates.get(), 2);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_forward_prop_changes_to_mounted_page() {
        LocalSet::new()
            .run_until(async {
                let (router, host, _) = make_router(RouterOptions::new(hassio_routes()));
                router.set_route(route("/hassio", "/dashboard"));
                router.page_rendered().await;

                router.set_data("supervisor_info", serde_json::json!({"version": "2021.01"}));
                router.set_narrow(true);

                let element = host.mounted();
                let props = element.last_props.borrow().clone().unwrap();
                assert!(props.narrow);
                assert_eq!(
                    props.data.get("supervisor_info"),
                    Some(&serde_json::json!({"version": "2021.01"}))
                );
                assert_eq!(*element.last_changed.borrow(), changed(NARROW_PROP));
                assert_eq!(element.updates.get(), 3);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_skip_unchanged_props() {
        LocalSet::new()
            .run_until(async {
                let (router, host, _) = make_router(RouterOptions::new(hassio_routes()));
                router.set_route(route("/hassio", "/dashboard"));
                router.page_rendered().await;

                router.set_data("hass", serde_json::json!(1));
                router.set_data("hass", serde_json::json!(1));
                router.set_narrow(false);

                assert_eq!(host.mounted().updates.get(), 2);
            })
            .await;
    }

    // ── Loading & errors ───────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn should_show_loading_screen_when_load_is_slow() {
        LocalSet::new()
            .run_until(async {
                let routes = RouteTable::new().with_page("slow", delayed(1000));
                let (router, host, _) = make_router(RouterOptions::new(routes).show_loading());

                router.set_route(route("", "/slow"));
                sleep(Duration::from_millis(450)).await;
                assert_eq!(host.mounted_tags(), vec![LOADING_SCREEN_TAG]);

                router.page_rendered().await;
                assert_eq!(host.mounted_tags(), vec!["page-1000"]);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_never_show_loading_screen_when_load_is_fast() {
        LocalSet::new()
            .run_until(async {
                let routes = RouteTable::new().with_page("fast", delayed(100));
                let (router, host, _) = make_router(RouterOptions::new(routes).show_loading());

                router.set_route(route("", "/fast"));
                sleep(Duration::from_millis(450)).await;

                assert_eq!(host.mounted_tags(), vec!["page-100"]);
                assert!(!host.appended.borrow().iter().any(|tag| tag == LOADING_SCREEN_TAG));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_mount_error_screen_when_load_fails() {
        LocalSet::new()
            .run_until(async {
                let routes = RouteTable::new().with_page("addon", failing(10));
                let (router, host, _) = make_router(RouterOptions::new(routes).show_loading());

                router.set_route(route("/hassio", "/addon"));
                router.page_rendered().await;

                assert_eq!(host.mounted_tags(), vec![ERROR_SCREEN_TAG]);
                assert_eq!(
                    host.mounted().message.as_deref(),
                    Some("Error while loading page addon.")
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_replace_loading_screen_with_error_screen() {
        LocalSet::new()
            .run_until(async {
                let routes = RouteTable::new().with_page("addon", failing(800));
                let (router, host, _) = make_router(RouterOptions::new(routes).show_loading());

                router.set_route(route("/hassio", "/addon"));
                sleep(Duration::from_millis(500)).await;
                assert_eq!(host.mounted_tags(), vec![LOADING_SCREEN_TAG]);

                router.page_rendered().await;
                assert_eq!(host.mounted_tags(), vec![ERROR_SCREEN_TAG]);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_mount_error_screen_without_loading_screen_mode() {
        LocalSet::new()
            .run_until(async {
                let routes = RouteTable::new().with_page("addon", failing(10));
                let (router, host, _) = make_router(RouterOptions::new(routes));

                router.set_route(route("/hassio", "/addon"));
                assert_eq!(host.mounted_tags(), vec!["broken-page"]);

                router.page_rendered().await;
                assert_eq!(host.mounted_tags(), vec![ERROR_SCREEN_TAG]);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_ignore_failure_of_superseded_load() {
        LocalSet::new()
            .run_until(async {
                let routes = RouteTable::new()
                    .with_page("addon", failing(100))
                    .with_page("store", PageRoute::new("hassio-addon-store"));
                let (router, host, _) = make_router(RouterOptions::new(routes).show_loading());

                router.set_route(route("/hassio", "/addon"));
                router.set_route(route("/hassio", "/store"));
                sleep(Duration::from_millis(200)).await;

                assert_eq!(host.mounted_tags(), vec!["hassio-addon-store"]);
                assert!(!host.appended.borrow().iter().any(|tag| tag == ERROR_SCREEN_TAG));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_single_page_under_overlapping_navigations() {
        LocalSet::new()
            .run_until(async {
                let routes = RouteTable::new()
                    .with_page("a", delayed(700))
                    .with_page("b", delayed(100))
                    .with_page("c", delayed(500));
                let (router, host, _) = make_router(RouterOptions::new(routes).show_loading());

                router.set_route(route("", "/a"));
                sleep(Duration::from_millis(50)).await;
                router.set_route(route("", "/b"));
                router.set_route(route("", "/c"));
                sleep(Duration::from_millis(2000)).await;

                assert_eq!(host.mounted_tags(), vec!["page-500"]);
                assert_eq!(host.created_with_tag("page-700"), 0);
                assert_eq!(host.created_with_tag("page-100"), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_mount_latest_visit_when_navigating_back_during_load() {
        LocalSet::new()
            .run_until(async {
                let routes = RouteTable::new()
                    .with_page("a", delayed(300))
                    .with_page("b", delayed(300));
                let (router, host, _) = make_router(RouterOptions::new(routes).show_loading());

                router.set_route(route("", "/a"));
                sleep(Duration::from_millis(100)).await;
                router.set_route(route("", "/b"));
                sleep(Duration::from_millis(100)).await;
                router.set_route(route("", "/a"));
                sleep(Duration::from_millis(1000)).await;

                assert_eq!(host.mounted_tags(), vec!["page-300"]);
                assert_eq!(router.current_page(), "a");
                assert_eq!(host.created_with_tag("page-300"), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_retry_failed_load_on_next_visit() {
        LocalSet::new()
            .run_until(async {
                let attempts = Rc::new(Cell::new(0));
                let counter = Rc::clone(&attempts);
                let flaky = PageRoute::new("hassio-addon-view").with_loader(move || {
                    counter.set(counter.get() + 1);
                    let attempt = counter.get();
                    async move {
                        if attempt == 1 {
                            Err(LoadError::new("network error"))
                        } else {
                            Ok(())
                        }
                    }
                });
                let routes = hassio_routes().with_page("addon", flaky);
                let (router, host, _) = make_router(RouterOptions::new(routes).show_loading());

                router.set_route(route("/hassio", "/addon"));
                router.page_rendered().await;
                assert_eq!(host.mounted_tags(), vec![ERROR_SCREEN_TAG]);

                router.set_route(route("/hassio", "/dashboard"));
                router.page_rendered().await;
                router.set_route(route("/hassio", "/addon"));
                router.page_rendered().await;

                assert_eq!(host.mounted_tags(), vec!["hassio-addon-view"]);
                assert_eq!(attempts.get(), 2);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_hand_loading_page_route_to_previous_page() {
        LocalSet::new()
            .run_until(async {
                let routes = RouteTable::new()
                    .with_page("a", delayed(300))
                    .with_page("b", PageRoute::new("page-b"));
                let (router, host, _) = make_router(RouterOptions::new(routes).show_loading());
                router.set_route(route("", "/b"));
                router.page_rendered().await;
                let previous = host.mounted();

                router.set_route(route("", "/a/first"));
                router.set_route(route("", "/a/second"));
                assert_eq!(previous.updates.get(), 1);

                router.page_rendered().await;
                let props = host.mounted().last_props.borrow().clone().unwrap();
                assert_eq!(host.mounted_tags(), vec!["page-300"]);
                assert_eq!(props.route.as_deref(), Some(&Route::new("/a", "/second")));
            })
            .await;
    }

    // ── Caching ────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn should_reuse_cached_page_element() {
        LocalSet::new()
            .run_until(async {
                let routes = RouteTable::new()
                    .with_page("dashboard", PageRoute::new("hassio-panel").cached())
                    .with_page("addon", PageRoute::new("hassio-addon-view"));
                let (router, host, _) = make_router(RouterOptions::new(routes));

                router.set_route(route("/hassio", "/dashboard"));
                router.page_rendered().await;
                let first = host.mounted();
                router.set_route(route("/hassio", "/addon"));
                router.page_rendered().await;
                router.set_route(route("/hassio", "/dashboard"));
                router.page_rendered().await;

                assert!(Rc::ptr_eq(&first, &host.mounted()));
                assert_eq!(host.created_with_tag("hassio-panel"), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_create_fresh_element_without_cache() {
        LocalSet::new()
            .run_until(async {
                let (router, host, _) = make_router(RouterOptions::new(hassio_routes()));

                router.set_route(route("/hassio", "/dashboard"));
                router.page_rendered().await;
                router.set_route(route("/hassio", "/store"));
                router.page_rendered().await;
                router.set_route(route("/hassio", "/dashboard"));
                router.page_rendered().await;

                assert_eq!(host.created_with_tag("hassio-dashboard"), 2);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_cache_every_page_with_cache_all() {
        LocalSet::new()
            .run_until(async {
                let (router, host, _) =
                    make_router(RouterOptions::new(hassio_routes()).cache_all());

                for path in ["/dashboard", "/store", "/dashboard", "/store"] {
                    router.set_route(route("/hassio", path));
                    router.page_rendered().await;
                }

                assert_eq!(host.created_with_tag("hassio-dashboard"), 1);
                assert_eq!(host.created_with_tag("hassio-addon-store"), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_remount_fresh_element_on_rebuild() {
        LocalSet::new()
            .run_until(async {
                let (router, host, _) = make_router(RouterOptions::new(hassio_routes()));
                router.set_route(route("/hassio", "/dashboard"));
                router.page_rendered().await;
                let before = host.mounted();

                router.rebuild().await;
                router.page_rendered().await;

                assert!(!Rc::ptr_eq(&before, &host.mounted()));
                assert_eq!(router.current_page(), "dashboard");
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_external_route_set_during_rebuild() {
        LocalSet::new()
            .run_until(async {
                let (router, host, _) = make_router(RouterOptions::new(hassio_routes()));
                router.set_route(route("/hassio", "/dashboard"));
                router.page_rendered().await;

                let rebuild = router.rebuild();
                futures::pin_mut!(rebuild);
                assert!(futures::poll!(rebuild.as_mut()).is_pending());
                assert!(host.mounted_tags().is_empty());

                router.set_route(route("/hassio", "/store"));
                rebuild.await;
                router.page_rendered().await;

                assert_eq!(host.mounted_tags(), vec!["hassio-addon-store"]);
                assert_eq!(router.current_page(), "store");
                assert_eq!(host.created_with_tag("hassio-dashboard"), 1);
            })
            .await;
    }

    // ── Start-up ───────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn should_hold_rendering_until_initial_load_completes() {
        LocalSet::new()
            .run_until(async {
                let options = RouterOptions::new(hassio_routes()).initial_load(|| async {
                    sleep(Duration::from_millis(1000)).await;
                    Ok(())
                });
                let (router, host, _) = make_router(options);
                router.start();

                router.set_route(route("/hassio", "/dashboard"));
                assert!(host.mounted_tags().is_empty());

                sleep(Duration::from_millis(450)).await;
                assert_eq!(host.mounted_tags(), vec![LOADING_SCREEN_TAG]);

                sleep(Duration::from_millis(600)).await;
                assert_eq!(host.mounted_tags(), vec!["hassio-dashboard"]);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_show_error_screen_when_initial_load_fails() {
        LocalSet::new()
            .run_until(async {
                let options = RouterOptions::new(hassio_routes())
                    .initial_load(|| async { Err(LoadError::new("supervisor unreachable")) });
                let (router, host, _) = make_router(options);
                router.start();
                router.set_route(route("/hassio", "/dashboard"));

                sleep(Duration::from_millis(1000)).await;

                assert_eq!(host.mounted_tags(), vec![ERROR_SCREEN_TAG]);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_preload_every_page_once() {
        LocalSet::new()
            .run_until(async {
                let loads = Rc::new(Cell::new(0));
                let page = |tag: &str| {
                    let loads = Rc::clone(&loads);
                    PageRoute::new(tag).with_loader(move || {
                        loads.set(loads.get() + 1);
                        async { Ok(()) }
                    })
                };
                let routes = RouteTable::new()
                    .with_page("addon", page("hassio-addon-view"))
                    .with_page("ingress", page("hassio-ingress-view"))
                    .with_redirect("store", "addon");
                let (router, _, _) = make_router(RouterOptions::new(routes).preload_all());

                router.start();
                router.start();
                sleep(Duration::from_millis(10)).await;

                assert_eq!(loads.get(), 2);
            })
            .await;
    }

    #[test]
    fn should_reject_invalid_route_table() {
        let routes = RouteTable::new().with_redirect("a", "missing");
        let result = PageRouter::new(
            RouterOptions::new(routes),
            Rc::new(TestHost::default()),
            Rc::new(TestNavigator::default()),
        );
        assert!(matches!(result, Err(ShellError::Validation(_))));
    }
}
