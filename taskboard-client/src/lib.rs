//! # Taskboard Client Core
//!
//! Front-end logic of Taskboard without a UI toolkit: the login session, the
//! HTTP client, the list page's filter/sort and the kanban board reducer.
//!
//! ## Modules
//!
//! - `session`: Explicit session object holding the access token
//! - `api`: `TaskboardClient`, a reqwest wrapper over the HTTP API
//! - `list_view`: Status/priority filters, due-date/priority sorting and list page state
//! - `board`: Kanban columns with optimistic moves, reconcile and rollback

pub mod api;
pub mod board;
pub mod list_view;
pub mod session;

pub use api::{ClientError, TaskboardClient};
pub use session::Session;
