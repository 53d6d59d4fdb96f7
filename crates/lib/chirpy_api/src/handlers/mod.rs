//! Request handlers.

pub mod admin;
pub mod auth;
pub mod chirps;
pub mod users;
pub mod webhooks;
