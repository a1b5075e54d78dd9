//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod chunk_fetcher;
pub mod hassio;
pub mod icon_store;
pub mod navigator;
pub mod page_host;

pub use chunk_fetcher::ChunkFetcher;
pub use hassio::{HassioApi, ModuleLoader};
pub use icon_store::IconStore;
pub use navigator::Navigator;
pub use page_host::{ChangedProps, ElementRef, PageElement, PageHost, PageProps};
