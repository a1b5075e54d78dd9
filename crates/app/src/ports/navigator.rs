//! Navigator port — URL rewrites requested by routers.

/// Changes the browser location.
pub trait Navigator {
    /// Navigate to `path`, replacing the current history entry when `replace`.
    fn navigate(&self, path: &str, replace: bool);

    /// Current query string including the leading `?`, or empty.
    fn search(&self) -> String {
        String::new()
    }
}
