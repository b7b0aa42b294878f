//! Task board HTTP API.
//!
//! Exposes config, state, error handling, the mutation service and routes so
//! the binary and integration tests build the exact same application.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod service;
pub mod state;
