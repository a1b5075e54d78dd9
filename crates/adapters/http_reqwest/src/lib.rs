//! # pageshell-adapter-http-reqwest
//!
//! HTTP client adapter built on [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement the `ChunkFetcher` port: `GET <base>/static/mdi/<file>.json`
//! - Map transport, status and decoding failures into `FetchError`
//!
//! ## Dependency rule
//! Depends on `pageshell-app` (for port traits) and `pageshell-domain` (for domain types).

pub mod chunk_fetcher;
pub mod error;

pub use chunk_fetcher::HttpChunkFetcher;
pub use error::ClientError;
