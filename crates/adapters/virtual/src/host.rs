//! Headless page host.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use pageshell_app::ports::page_host::ERROR_SCREEN_TAG;
use pageshell_app::ports::{ChangedProps, ElementRef, PageElement, PageHost, PageProps};

/// Builds the element registered for a tag.
pub type ElementFactory = Rc<dyn Fn() -> ElementRef>;

/// A page element that records what it was handed.
pub struct VirtualElement {
    tag: String,
    message: Option<String>,
    props: RefCell<PageProps>,
    changed: RefCell<ChangedProps>,
    updates: Cell<usize>,
}

impl VirtualElement {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            message: None,
            props: RefCell::new(PageProps::default()),
            changed: RefCell::new(ChangedProps::new()),
            updates: Cell::new(0),
        }
    }

    /// Error screen carrying `message`.
    #[must_use]
    pub fn error_screen(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(ERROR_SCREEN_TAG)
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Props received by the latest update.
    #[must_use]
    pub fn props(&self) -> PageProps {
        self.props.borrow().clone()
    }

    /// Prop names flagged by the latest update.
    #[must_use]
    pub fn changed(&self) -> ChangedProps {
        self.changed.borrow().clone()
    }

    #[must_use]
    pub fn updates(&self) -> usize {
        self.updates.get()
    }
}

impl PageElement for VirtualElement {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn update_page_el(&self, props: &PageProps, changed: &ChangedProps) {
        *self.props.borrow_mut() = props.clone();
        *self.changed.borrow_mut() = changed.clone();
        self.updates.set(self.updates.get() + 1);
    }
}

/// Single-slot mount point.
///
/// Tags without a registered factory produce a [`VirtualElement`]; every one
/// created that way stays reachable through [`VirtualHost::element`].
#[derive(Default)]
pub struct VirtualHost {
    factories: RefCell<HashMap<String, ElementFactory>>,
    children: RefCell<Vec<ElementRef>>,
    created: RefCell<Vec<Rc<VirtualElement>>>,
    mounts: RefCell<Vec<String>>,
}

impl VirtualHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `factory` to build elements for `tag`.
    pub fn register<F>(&self, tag: impl Into<String>, factory: F)
    where
        F: Fn() -> ElementRef + 'static,
    {
        self.factories
            .borrow_mut()
            .insert(tag.into(), Rc::new(factory));
    }

    /// Tags currently mounted, oldest first.
    #[must_use]
    pub fn mounted_tags(&self) -> Vec<String> {
        self.children
            .borrow()
            .iter()
            .map(|child| child.tag().to_string())
            .collect()
    }

    /// Every tag ever appended, in order.
    #[must_use]
    pub fn mount_log(&self) -> Vec<String> {
        self.mounts.borrow().clone()
    }

    /// Number of elements created for `tag`.
    #[must_use]
    pub fn created_count(&self, tag: &str) -> usize {
        self.created
            .borrow()
            .iter()
            .filter(|element| element.tag == tag)
            .count()
    }

    /// Most recently created virtual element for `tag`.
    #[must_use]
    pub fn element(&self, tag: &str) -> Option<Rc<VirtualElement>> {
        self.created
            .borrow()
            .iter()
            .rev()
            .find(|element| element.tag == tag)
            .cloned()
    }

    fn track(&self, element: VirtualElement) -> ElementRef {
        let element = Rc::new(element);
        self.created.borrow_mut().push(Rc::clone(&element));
        element
    }
}

impl PageHost for VirtualHost {
    fn create_element(&self, tag: &str) -> ElementRef {
        let factory = self.factories.borrow().get(tag).cloned();
        match factory {
            Some(factory) => factory(),
            None => self.track(VirtualElement::new(tag)),
        }
    }

    fn create_error_screen(&self, message: &str) -> ElementRef {
        self.track(VirtualElement::error_screen(message))
    }

    fn last_child(&self) -> Option<ElementRef> {
        self.children.borrow().last().cloned()
    }

    fn append_child(&self, element: ElementRef) {
        let mut children = self.children.borrow_mut();
        if !children.is_empty() {
            tracing::warn!(
                tag = element.tag(),
                mounted = children.len(),
                "appending on top of a mounted element"
            );
        }
        self.mounts.borrow_mut().push(element.tag().to_string());
        children.push(element);
    }

    fn remove_child(&self, element: &ElementRef) {
        self.children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, element));
    }
}
