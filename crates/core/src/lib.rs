//! Shared domain vocabulary for the task board.
//!
//! Everything in this crate is pure: entity shapes, the request/response
//! contract used by both the server and the client, the task-status
//! transition table, and the audit action vocabulary. No I/O lives here.

pub mod activity;
pub mod auth;
pub mod contract;
pub mod error;
pub mod models;
pub mod status;
pub mod types;
pub mod workflow;
