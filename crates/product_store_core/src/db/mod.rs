//! SQLite connection bootstrap and table setup.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the product store.
//! - Make sure the `PRODUCT_CODE` table exists before callers touch it.
//!
//! # Invariants
//! - Table setup is idempotent and never alters an existing table.
//! - Connections are handed to the caller, who owns and closes them.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{ensure_schema, seed_sample_data};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
