//! # Taskboard Shared Library
//!
//! This crate contains the domain types, persistence and business logic used by
//! the Taskboard API server and client.
//!
//! ## Module Organization
//!
//! - `models`: Users and tasks, plus their database queries
//! - `auth`: Password hashing, access tokens and request authentication
//! - `db`: Connection pooling and schema bootstrap
//! - `store`: Storage traits with PostgreSQL and in-memory backends
//! - `services`: Auth Service and Task Service

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
