/// Database models for Taskboard
///
/// This module contains the domain records and their SQL queries.
///
/// # Models
///
/// - `user`: User accounts (credential store)
/// - `task`: Personal tasks, their status and priority enumerations
///
/// Handlers and services do not call these queries directly; they go through
/// the [`crate::store`] traits so the backend can be swapped.

pub mod task;
pub mod user;
