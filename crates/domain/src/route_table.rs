//! Declarative route tables: page entries plus redirect aliases.

use std::collections::BTreeMap;

use crate::error::ValidationError;

/// One row of a route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteEntry<P> {
    /// Alias for another page of the same table.
    Redirect(String),
    /// A mountable page.
    Page(P),
}

/// Outcome of following redirect aliases from a requested page name.
#[derive(Debug, PartialEq, Eq)]
pub struct Resolved<'a, P> {
    /// Page name the chain stopped at.
    pub name: String,
    /// Page entry found there, `None` when the chain ends on an unknown name
    /// or never terminates.
    pub page: Option<&'a P>,
}

/// Page name → entry mapping owned by one router.
#[derive(Debug, Clone)]
pub struct RouteTable<P> {
    entries: BTreeMap<String, RouteEntry<P>>,
}

impl<P> Default for RouteTable<P> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<P> RouteTable<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page(mut self, name: impl Into<String>, page: P) -> Self {
        self.entries.insert(name.into(), RouteEntry::Page(page));
        self
    }

    #[must_use]
    pub fn with_redirect(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.entries
            .insert(name.into(), RouteEntry::Redirect(target.into()));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RouteEntry<P>> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over page entries, skipping redirect aliases.
    pub fn pages(&self) -> impl Iterator<Item = (&str, &P)> {
        self.entries.iter().filter_map(|(name, entry)| match entry {
            RouteEntry::Page(page) => Some((name.as_str(), page)),
            RouteEntry::Redirect(_) => None,
        })
    }

    /// Follow redirect aliases transitively starting at `name`.
    ///
    /// Chains longer than the table itself must loop; they resolve to no page.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Resolved<'_, P> {
        let mut current = name.to_string();
        for _ in 0..=self.entries.len() {
            match self.entries.get(&current) {
                Some(RouteEntry::Redirect(target)) => current.clone_from(target),
                Some(RouteEntry::Page(page)) => {
                    return Resolved {
                        name: current,
                        page: Some(page),
                    };
                }
                None => break,
            }
        }
        Resolved {
            name: current,
            page: None,
        }
    }

    /// Check that every redirect alias eventually reaches a page.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownRedirect`] for an alias pointing at
    /// a missing page, or [`ValidationError::RedirectCycle`] for an alias
    /// that loops back on itself.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, entry) in &self.entries {
            let RouteEntry::Redirect(target) = entry else {
                continue;
            };
            if !self.entries.contains_key(target) {
                return Err(ValidationError::UnknownRedirect {
                    from: name.clone(),
                    to: target.clone(),
                });
            }
            if self.resolve(name).page.is_none() {
                return Err(ValidationError::RedirectCycle { page: name.clone() });
            }
        }
        Ok(())
    }
}
