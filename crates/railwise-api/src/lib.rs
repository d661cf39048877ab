//! Railwise-api: HTTP API layer for Railwise
//!
//! Exposes rail comparison, quoting, settlement legs and rate reloads over
//! a small JSON API.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::AppState;
