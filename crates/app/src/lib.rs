//! # pageshell-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `PageHost` / `PageElement` — the mount point and the pages mounted in it
//!   - `Navigator` — URL rewrites (`navigate(path, replace)`)
//!   - `IconStore` — persistent key-value store for resolved glyphs
//!   - `ChunkFetcher` — remote glyph catalog chunks
//!   - `ModuleLoader` / `HassioApi` — lazy page modules and supervisor data
//! - Provide the **use-cases**:
//!   - `PageRouter` — page resolution and async-load state machine
//!   - `IconCache` — chunked, coalescing, persisted icon resolution
//!   - `panels` — route tables configuring the router for the supervisor panel
//!   - `Shell` — feeds location changes into the top-level router
//! - Provide **in-process infrastructure** (event bus carrying `location-changed`)
//!   that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `pageshell-domain` only (plus `tokio` for timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod panels;
pub mod ports;
pub mod router;
pub mod services;
pub mod shell;
