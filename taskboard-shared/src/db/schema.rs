/// Schema bootstrap
///
/// Creates the enum types, tables and index Taskboard needs if they are not
/// already present. Every statement is idempotent, so this runs on each
/// server start. There is no versioned migration history.

use sqlx::{postgres::PgPool, Executor};
use tracing::info;

/// Statements executed in order by [`ensure_schema`]
pub const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE EXTENSION IF NOT EXISTS pgcrypto",
    r#"
    DO $$ BEGIN
        CREATE TYPE task_status AS ENUM ('To Do', 'In Progress', 'Completed');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    DO $$ BEGIN
        CREATE TYPE task_priority AS ENUM ('Low', 'Medium', 'High');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        owner_id UUID NOT NULL,
        title TEXT NOT NULL CHECK (length(title) > 0),
        description TEXT NOT NULL DEFAULT '',
        status task_status NOT NULL DEFAULT 'To Do',
        priority task_priority NOT NULL DEFAULT 'Medium',
        due_date DATE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_owner_id ON tasks (owner_id, created_at)",
];

/// Creates any missing schema objects
///
/// # Errors
///
/// Returns the first failing statement's error.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Ensuring database schema");

    // Plain &str runs over the simple query protocol, which DO blocks need.
    for statement in SCHEMA_STATEMENTS {
        pool.execute(*statement).await?;
    }

    info!("Database schema ready");
    Ok(())
}
