/// Middleware modules for the API server
///
/// Authentication lives in `taskboard_shared::auth::middleware`; the router
/// wires it in `app.rs`.
///
/// - `security`: Security response headers

pub mod security;
