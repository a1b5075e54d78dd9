//! # pageshell-domain
//!
//! Pure domain model for the pageshell single-page-application shell.
//!
//! ## Responsibilities
//! - Foundational types: error conventions
//! - Define **Routes** (`prefix` already consumed by parent routers, `path` left to interpret)
//! - Define **Route tables** (page entries and redirect aliases) and their resolution rules
//! - Define **Events** (location changes published to the shell)
//! - Define **Icon names** and the **chunk partition table** of the glyph catalog
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod event;
pub mod icon;
pub mod route;
pub mod route_table;
