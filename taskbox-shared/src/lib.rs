//! # Taskbox Shared Library
//!
//! This crate contains the data models, storage layer, and authentication
//! primitives shared by the Taskbox API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and the ownership-scoped task store
//! - `auth`: Password hashing, JWT tokens, and the pluggable authenticator
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Taskbox shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
