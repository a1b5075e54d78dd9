//! In-memory browser history.

use std::cell::RefCell;

use pageshell_app::event_bus::InProcessEventBus;
use pageshell_app::ports::Navigator;
use pageshell_domain::event::ShellEvent;

/// History stack that publishes every location change on an event bus.
pub struct MemoryHistory {
    entries: RefCell<Vec<String>>,
    bus: InProcessEventBus,
}

impl MemoryHistory {
    /// History starting at `initial`. Nothing is published for it.
    #[must_use]
    pub fn new(initial: impl Into<String>, bus: InProcessEventBus) -> Self {
        Self {
            entries: RefCell::new(vec![initial.into()]),
            bus,
        }
    }

    /// Current location, query string included.
    #[must_use]
    pub fn location(&self) -> String {
        self.entries.borrow().last().cloned().unwrap_or_default()
    }

    /// Every entry of the stack, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Pop the current entry and publish the previous one.
    pub fn back(&self) {
        let previous = {
            let mut entries = self.entries.borrow_mut();
            if entries.len() < 2 {
                return;
            }
            entries.pop();
            entries.last().cloned().unwrap_or_default()
        };
        self.bus.emit(ShellEvent::LocationChanged {
            path: previous,
            replace: false,
        });
    }
}

impl Navigator for MemoryHistory {
    fn navigate(&self, path: &str, replace: bool) {
        {
            let mut entries = self.entries.borrow_mut();
            if replace {
                entries.pop();
            }
            entries.push(path.to_string());
        }
        tracing::debug!(path, replace, "location changed");
        self.bus.emit(ShellEvent::LocationChanged {
            path: path.to_string(),
            replace,
        });
    }

    fn search(&self) -> String {
        let location = self.location();
        location
            .find('?')
            .map(|pos| location[pos..].to_string())
            .unwrap_or_default()
    }
}
