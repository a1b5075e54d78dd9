//! Events exchanged between the navigator and the shell.

use serde::{Deserialize, Serialize};

/// Something the shell reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellEvent {
    /// The browser location changed (`location-changed`).
    LocationChanged {
        path: String,
        /// `true` when the history entry was replaced instead of pushed.
        replace: bool,
    },
}
