//! Route tables configuring [`PageRouter`](crate::router::PageRouter)s for
//! concrete panels.

pub mod hassio;

pub use hassio::{HassioMain, HassioPanelRouter};
