//! Request extractors that establish who is calling.

pub mod auth;
