//! # pageshell-adapter-virtual
//!
//! Virtual/demo implementations of every `pageshell-app` port, for tests and
//! headless demonstration.
//!
//! ## Provided adapters
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`VirtualHost`] | `PageHost` | Single-slot mount point with a tag → factory registry |
//! | [`MemoryHistory`] | `Navigator` | History stack publishing `location-changed` on the event bus |
//! | [`InMemoryIconStore`] | `IconStore` | Versioned map counting its transactions |
//! | [`StaticChunkFetcher`] | `ChunkFetcher` | Fixed catalog chunks with optional latency and failures |
//! | [`VirtualModuleLoader`] | `ModuleLoader` | Per-tag latency and failures |
//! | [`StaticHassioApi`] | `HassioApi` | Fixed supervisor info |
//!
//! ## Dependency rule
//!
//! Depends on `pageshell-app` (port traits) and `pageshell-domain` only.

mod hassio;
mod history;
mod host;
mod icons;

pub use hassio::{StaticHassioApi, VirtualModuleLoader};
pub use history::MemoryHistory;
pub use host::{ElementFactory, VirtualElement, VirtualHost};
pub use icons::{InMemoryIconStore, StaticChunkFetcher};
