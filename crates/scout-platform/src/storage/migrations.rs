//! SQLite schema migrations.
//!
//! Version 1 creates the conversation log (`sessions`, `messages`) and the
//! catalog (`organizations`, `tools`, `organization_tools`).

use rusqlite::Connection;

use scout_types::{Result, ScoutError};

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| ScoutError::DataAccess(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| ScoutError::DataAccess(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        log::info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sessions (
            id          TEXT PRIMARY KEY NOT NULL,
            title       TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_created_at
            ON sessions (created_at ASC);

        CREATE TABLE IF NOT EXISTS messages (
            session_id  TEXT NOT NULL REFERENCES sessions (id),
            sequence    INTEGER NOT NULL,
            role        TEXT NOT NULL,
            content     TEXT NOT NULL,
            timestamp   TEXT NOT NULL,
            PRIMARY KEY (session_id, sequence)
        );

        CREATE TABLE IF NOT EXISTS organizations (
            id          INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            description TEXT,
            size        TEXT,
            street      TEXT,
            city        TEXT,
            state       TEXT,
            country     TEXT,
            postal_code TEXT,
            url         TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_organizations_name
            ON organizations (name);

        CREATE TABLE IF NOT EXISTS tools (
            id          INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            type        TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_tools_name
            ON tools (name);

        CREATE TABLE IF NOT EXISTS organization_tools (
            organization_id INTEGER NOT NULL REFERENCES organizations (id),
            tool_id         INTEGER NOT NULL REFERENCES tools (id),
            PRIMARY KEY (organization_id, tool_id)
        );

        CREATE INDEX IF NOT EXISTS idx_organization_tools_tool
            ON organization_tools (tool_id);

        INSERT INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| ScoutError::DataAccess(format!("Migration v1 failed: {}", e)))?;

    Ok(())
}
