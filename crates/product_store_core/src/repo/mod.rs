//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for product-code records.
//! - Isolate SQLite query details behind a driver-neutral row reader.
//! - Carry a single error type for every data access failure.
//!
//! # Invariants
//! - Driver errors surface unmodified inside `DataAccessError::Sqlite`.
//! - Statements and row cursors never outlive the call that prepared them.

pub mod product_code_repo;

use rusqlite::Row;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use product_code_repo::{ProductCodeRepository, SaveOutcome, SqliteProductCodeRepository};

pub type DataAccessResult<T> = Result<T, DataAccessError>;

/// Failure raised while reading or writing product-code rows.
#[derive(Debug)]
pub enum DataAccessError {
    /// Connection, syntax, execution or constraint failure reported by SQLite.
    Sqlite(rusqlite::Error),
    /// A stored row cannot be mapped into a record.
    InvalidData(String),
    /// An update keyed by `code` matched no row.
    NotFound(String),
}

impl Display for DataAccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted product code: {message}"),
            Self::NotFound(code) => write!(f, "product code not found: {code}"),
        }
    }
}

impl Error for DataAccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::InvalidData(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DataAccessError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Read access to named text columns of one result row.
///
/// Record mapping reads rows through this instead of a driver row type.
pub trait ColumnReader {
    fn read_text(&self, column: &str) -> DataAccessResult<String>;
}

impl ColumnReader for Row<'_> {
    fn read_text(&self, column: &str) -> DataAccessResult<String> {
        Ok(self.get::<_, String>(column)?)
    }
}
