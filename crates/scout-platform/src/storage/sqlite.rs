//! SQLite store: conversation log and catalog in one database file.
//!
//! A single rusqlite `Connection` behind a `Mutex`. Timestamps are stored
//! as fixed-width RFC 3339 strings so text order equals time order.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, Row, params};

use scout_core::ports::{CatalogPort, ConversationStore};
use scout_types::{
    Result, ScoutError,
    entity::{EntityId, Organization, Tool},
    message::{Message, Role},
    session::Session,
};

use super::migrations;

const ORGANIZATION_COLUMNS: &str = "o.id, o.name, o.description, o.size, \
     o.street, o.city, o.state, o.country, o.postal_code, o.url";
const TOOL_COLUMNS: &str = "t.id, t.name, t.type";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and apply pending migrations.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ScoutError::DataAccess(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| ScoutError::DataAccess(format!("Failed to open database: {}", e)))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(|e| ScoutError::DataAccess(format!("Failed to set pragmas: {}", e)))?;

        log::info!("Database opened at {}", path.display());
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ScoutError::DataAccess(format!("Failed to open in-memory db: {}", e)))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| ScoutError::DataAccess(format!("Failed to set pragmas: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        register_functions(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with the connection locked.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ScoutError::DataAccess(format!("Database lock poisoned: {}", e)))?;
        f(&conn).map_err(|e| ScoutError::DataAccess(e.to_string()))
    }

    // ─── Catalog loading ─────────────────────────────────────

    /// Insert or replace a catalog organization.
    pub fn insert_organization(&self, org: &Organization) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO organizations
                 (id, name, description, size, street, city, state, country, postal_code, url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    org.id,
                    org.name,
                    org.description,
                    org.size,
                    org.street,
                    org.city,
                    org.state,
                    org.country,
                    org.postal_code,
                    org.url,
                ],
            )?;
            Ok(())
        })
    }

    /// Insert or replace a catalog tool.
    pub fn insert_tool(&self, tool: &Tool) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO tools (id, name, type) VALUES (?1, ?2, ?3)",
                params![tool.id, tool.name, tool.tool_type],
            )?;
            Ok(())
        })
    }

    /// Record that an organization uses a tool.
    pub fn link_tool(&self, organization_id: EntityId, tool_id: EntityId) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO organization_tools (organization_id, tool_id)
                 VALUES (?1, ?2)",
                params![organization_id, tool_id],
            )?;
            Ok(())
        })
    }

    fn query_organizations(
        &self,
        sql: &str,
        args: impl rusqlite::Params,
    ) -> Result<Vec<Organization>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map(args, row_to_organization)?;
            rows.collect()
        })
    }

    fn query_tools(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<Tool>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map(args, row_to_tool)?;
            rows.collect()
        })
    }
}

impl ConversationStore for SqliteStore {
    fn list_sessions(&self) -> Result<Vec<Session>> {
        let rows: Vec<(String, String, String)> = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, created_at FROM sessions ORDER BY created_at ASC, rowid ASC",
            )?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
            rows.collect()
        })?;

        rows.into_iter()
            .map(|(id, title, created_at)| {
                Ok(Session {
                    id,
                    title,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }

    fn create_session(&self, session: &Session) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (id, title, created_at) VALUES (?1, ?2, ?3)",
                params![session.id, session.title, format_timestamp(&session.created_at)],
            )?;
            Ok(())
        })
    }

    fn update_session_title(&self, id: &str, title: &str) -> Result<()> {
        let updated = self.with_conn(|conn| {
            conn.execute(
                "UPDATE sessions SET title = ?2 WHERE id = ?1",
                params![id, title],
            )
        })?;
        if updated == 0 {
            return Err(ScoutError::DataAccess(format!("Unknown session {}", id)));
        }
        Ok(())
    }

    fn load_transcript(&self, session_id: &str) -> Result<Vec<Message>> {
        let rows: Vec<(i64, String, String, String)> = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT sequence, role, content, timestamp FROM messages
                 WHERE session_id = ?1
                 ORDER BY sequence ASC",
            )?;
            let rows = stmt.query_map(params![session_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?;
            rows.collect()
        })?;

        rows.into_iter()
            .map(|(sequence, role, content, timestamp)| {
                let role = Role::parse(&role).ok_or_else(|| {
                    let msg = format!("Unknown role {:?} at sequence {}", role, sequence);
                    ScoutError::DataAccess(msg)
                })?;
                Ok(Message {
                    session_id: session_id.to_string(),
                    sequence,
                    role,
                    content,
                    timestamp: parse_timestamp(&timestamp)?,
                })
            })
            .collect()
    }

    fn append_message(&self, message: &Message) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (session_id, sequence, role, content, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    message.session_id,
                    message.sequence,
                    message.role.as_str(),
                    message.content,
                    format_timestamp(&message.timestamp),
                ],
            )?;
            Ok(())
        })
    }

    fn backend_name(&self) -> &str {
        "sqlite"
    }
}

impl CatalogPort for SqliteStore {
    fn random_organizations(&self, n: usize) -> Result<Vec<Organization>> {
        self.query_organizations(
            &format!(
                "SELECT {} FROM organizations o ORDER BY RANDOM() LIMIT ?1",
                ORGANIZATION_COLUMNS
            ),
            params![n as i64],
        )
    }

    fn random_tools(&self, n: usize) -> Result<Vec<Tool>> {
        self.query_tools(
            &format!("SELECT {} FROM tools t ORDER BY RANDOM() LIMIT ?1", TOOL_COLUMNS),
            params![n as i64],
        )
    }

    fn search_organizations(&self, term: &str, limit: usize) -> Result<Vec<Organization>> {
        self.query_organizations(
            &format!(
                "SELECT {} FROM organizations o
                 WHERE instr(unicode_lower(o.name), unicode_lower(?1)) > 0
                 ORDER BY o.name ASC LIMIT ?2",
                ORGANIZATION_COLUMNS
            ),
            params![term, limit as i64],
        )
    }

    fn search_tools(&self, term: &str, limit: usize) -> Result<Vec<Tool>> {
        self.query_tools(
            &format!(
                "SELECT {} FROM tools t
                 WHERE instr(unicode_lower(t.name), unicode_lower(?1)) > 0
                 ORDER BY t.name ASC LIMIT ?2",
                TOOL_COLUMNS
            ),
            params![term, limit as i64],
        )
    }

    fn tools_for_organization(&self, organization_id: EntityId) -> Result<Vec<Tool>> {
        self.query_tools(
            &format!(
                "SELECT {} FROM tools t
                 JOIN organization_tools ot ON ot.tool_id = t.id
                 WHERE ot.organization_id = ?1
                 ORDER BY t.name ASC",
                TOOL_COLUMNS
            ),
            params![organization_id],
        )
    }

    fn organizations_for_tool(&self, tool_id: EntityId, limit: usize) -> Result<Vec<Organization>> {
        self.query_organizations(
            &format!(
                "SELECT {} FROM organizations o
                 JOIN organization_tools ot ON ot.organization_id = o.id
                 WHERE ot.tool_id = ?1
                 ORDER BY o.name ASC LIMIT ?2",
                ORGANIZATION_COLUMNS
            ),
            params![tool_id, limit as i64],
        )
    }
}

// ─── Row mapping ─────────────────────────────────────────────

/// `unicode_lower(text)`: full Unicode lowercasing. SQLite's built-in
/// `lower()` only folds ASCII.
fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "unicode_lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
    .map_err(|e| ScoutError::DataAccess(format!("Failed to register SQL functions: {}", e)))
}

fn row_to_organization(row: &Row<'_>) -> rusqlite::Result<Organization> {
    Ok(Organization {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        size: row.get(3)?,
        street: row.get(4)?,
        city: row.get(5)?,
        state: row.get(6)?,
        country: row.get(7)?,
        postal_code: row.get(8)?,
        url: row.get(9)?,
    })
}

fn row_to_tool(row: &Row<'_>) -> rusqlite::Result<Tool> {
    Ok(Tool {
        id: row.get(0)?,
        name: row.get(1)?,
        tool_type: row.get(2)?,
    })
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| ScoutError::DataAccess(format!("Bad timestamp {:?}: {}", raw, e)))
}
