//! Session bootstrap for the ACS and OpenIAM admin front ends.
//!
//! Authentication is delegated to an external OpenAuth server through an
//! authorization-code redirect. This crate holds the client side of it:
//! the route guard, the token store, the code exchange and the HTTP
//! interceptors reacting to the session states the backend signals.

pub mod api;
pub mod config;
mod error;
pub mod navigation;
pub mod openauth;
pub mod toolkit;

pub use error::Error;
