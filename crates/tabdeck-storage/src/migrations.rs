//! Schema migrations

use rusqlite::{Connection, OptionalExtension};

use crate::Result;

/// Schema steps in order; step `i` brings the schema to version `i + 1`
const MIGRATIONS: &[(&str, &str)] = &[(
    "settings table",
    r#"
    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
)];

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")?;

    let current = schema_version(conn)?;
    let target = MIGRATIONS.len() as i32;
    if current >= target {
        return Ok(());
    }

    for (version, (name, sql)) in (1..).zip(MIGRATIONS.iter()) {
        if version > current {
            tracing::info!(version, "Running migration: {}", name);
            conn.execute_batch(sql)?;
        }
    }

    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [target])?;
    Ok(())
}

fn schema_version(conn: &Connection) -> Result<i32> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(version.unwrap_or(0))
}
