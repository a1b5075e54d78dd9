//! # pageshell-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **glyph catalog** chunk files (`/static/mdi/<file>.json`) from
//!   a local directory, the layout the remote chunk fetcher expects
//! - Serve **icon resolution** (`/api/icons/{icon}`) backed by the icon cache
//! - Map application results into HTTP responses (JSON)
//!
//! ## Dependency rule
//! Depends on `pageshell-app` (for port traits and services) and `pageshell-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
