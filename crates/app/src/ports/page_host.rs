//! Page host port — the mount point a router swaps page elements in and out of.
//!
//! Page elements are shared handles ([`ElementRef`]); identity is pointer
//! identity (`Rc::ptr_eq`), the same way a DOM node is the same node wherever
//! it is referenced from.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use pageshell_domain::route::Route;

/// Tag of the element mounted while a page is slow to load.
pub const LOADING_SCREEN_TAG: &str = "hass-loading-screen";

/// Tag of the element mounted when a page failed to load.
pub const ERROR_SCREEN_TAG: &str = "hass-error-screen";

/// Prop name carrying the route handed to a page.
pub const ROUTE_PROP: &str = "route";

/// Prop name carrying the narrow-layout flag.
pub const NARROW_PROP: &str = "narrow";

/// Names of the props that changed since the previous update.
pub type ChangedProps = BTreeSet<String>;

/// Shared handle to a mounted (or mountable) page element.
pub type ElementRef = Rc<dyn PageElement>;

/// State a router forwards to the page it mounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageProps {
    /// Route left for the page once the router consumed its own segment.
    pub route: Option<Rc<Route>>,
    pub narrow: bool,
    /// Application data (`hass`, `supervisor_info`, …) keyed by prop name.
    pub data: BTreeMap<String, serde_json::Value>,
}

impl PageProps {
    /// Every prop name, used for the full update a freshly mounted page gets.
    #[must_use]
    pub fn all_keys(&self) -> ChangedProps {
        let mut keys: ChangedProps = [ROUTE_PROP, NARROW_PROP]
            .into_iter()
            .map(String::from)
            .collect();
        keys.extend(self.data.keys().cloned());
        keys
    }
}

/// A mountable page component.
pub trait PageElement {
    /// Element tag this page was created from.
    fn tag(&self) -> &str;

    /// Receive the router's current props. Called before every mount and on
    /// every relevant prop change while mounted.
    fn update_page_el(&self, props: &PageProps, changed: &ChangedProps);
}

/// The container a router mounts pages into.
pub trait PageHost {
    /// Instantiate a new element for `tag`.
    fn create_element(&self, tag: &str) -> ElementRef;

    /// Generic element shown while a page is loading.
    fn create_loading_screen(&self) -> ElementRef {
        self.create_element(LOADING_SCREEN_TAG)
    }

    /// Element shown in place of a page that failed to load.
    fn create_error_screen(&self, message: &str) -> ElementRef;

    /// Currently mounted element, if any.
    fn last_child(&self) -> Option<ElementRef>;

    fn append_child(&self, element: ElementRef);

    fn remove_child(&self, element: &ElementRef);
}
