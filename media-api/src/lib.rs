//! CDN media API service
//!
//! A thin HTTP façade over the media bucket: issues time-limited upload and
//! download links, accepts direct uploads, and lists and deletes stored
//! objects. Derivative generation happens out of band in the resize worker.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Route handlers
pub mod routes;

/// HTTP server setup
pub mod server;

/// Application state
pub mod state;

/// Shared types: configuration and errors
pub mod types;
