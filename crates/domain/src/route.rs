//! Hierarchical routes handed from parent routers to child routers.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// The part of the URL a router owns.
///
/// `prefix` has already been consumed by parent routers; `path` is what is
/// left to interpret and is either empty or starts with `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub prefix: String,
    pub path: String,
}

impl Route {
    #[must_use]
    pub fn new(prefix: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            path: path.into(),
        }
    }

    /// Byte offset of the `/` ending the first segment, if any.
    fn divider(&self) -> Option<usize> {
        self.path.get(1..)?.find('/').map(|pos| pos + 1)
    }

    /// First path segment without its leading `/` (`/a/b` gives `a`).
    #[must_use]
    pub fn page_segment(&self) -> &str {
        let Some(rest) = self.path.get(1..) else {
            return "";
        };
        match self.divider() {
            Some(pos) => &self.path[1..pos],
            None => rest,
        }
    }

    /// Route left for a child router once the first segment is consumed.
    ///
    /// `{prefix: "/hassio", path: "/addon/core_ssh/info"}` gives
    /// `{prefix: "/hassio/addon", path: "/core_ssh/info"}`.
    #[must_use]
    pub fn tail(&self) -> Route {
        match self.divider() {
            Some(pos) => Route {
                prefix: format!("{}{}", self.prefix, &self.path[..pos]),
                path: self.path[pos..].to_string(),
            },
            None => Route {
                prefix: format!("{}{}", self.prefix, self.path),
                path: String::new(),
            },
        }
    }

    /// URL of `page` mounted directly under this route's prefix.
    #[must_use]
    pub fn join(&self, page: &str) -> String {
        format!("{}/{}", self.prefix, page)
    }
}

/// Single-entry memo for [`Route::tail`], keyed by pointer identity.
///
/// Handing the same `Rc<Route>` in twice returns the same `Rc` tail, so
/// children comparing routes by identity see no change across renders.
#[derive(Debug, Default)]
pub struct TailMemo {
    last: Option<(Rc<Route>, Rc<Route>)>,
}

impl TailMemo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute(&mut self, route: &Rc<Route>) -> Rc<Route> {
        if let Some((input, output)) = &self.last
            && Rc::ptr_eq(input, route)
        {
            return Rc::clone(output);
        }
        let tail = Rc::new(route.tail());
        self.last = Some((Rc::clone(route), Rc::clone(&tail)));
        tail
    }
}
