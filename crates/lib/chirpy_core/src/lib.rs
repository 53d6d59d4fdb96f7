//! # chirpy_core
//!
//! Core domain logic for Chirpy: credential hashing, access and refresh
//! tokens, request credential extraction, and the storage seam the HTTP
//! layer is built on.

pub mod auth;
pub mod chirps;
pub mod migrate;
pub mod models;
pub mod store;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
