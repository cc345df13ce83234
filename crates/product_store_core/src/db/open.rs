//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections from a parsed database URL.
//! - Configure connection pragmas and ensure the product table exists.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections can serve `SELECT * FROM PRODUCT_CODE` immediately.

use super::schema::ensure_schema;
use super::DbResult;
use crate::config::DatabaseUrl;
use log::{error, info};
use rusqlite::Connection;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the database named by `url` and prepares it for product-code access.
///
/// # Side effects
/// - Creates the database file when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(url: &DatabaseUrl) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = url.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let opened = match url {
        DatabaseUrl::Memory => Connection::open_in_memory(),
        DatabaseUrl::File(path) => Connection::open(path),
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens a private in-memory database with the product table in place.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_db(&DatabaseUrl::Memory)
}

fn bootstrap_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    ensure_schema(conn)?;
    Ok(())
}
