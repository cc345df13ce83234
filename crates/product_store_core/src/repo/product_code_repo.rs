//! Product code repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Select, insert and update rows of `PRODUCT_CODE` with literal SQL.
//! - Decide between insert and update when saving a record.
//!
//! # Invariants
//! - Saving relies on the `CODE` key constraint to detect an existing row;
//!   there is no read-then-write window before the insert.
//! - Any other constraint failure on insert reaches the caller unchanged.
//! - Only `DISCOUNT_CODE` and `DESCRIPTION` are ever updated; `CODE` is the key.
//! - The connection is borrowed, never opened or closed here.

use crate::model::product_code::ProductCode;
use crate::repo::{DataAccessError, DataAccessResult};
use log::debug;
use rusqlite::{ffi, params, Connection};

const SELECT_ALL_SQL: &str = "SELECT * FROM PRODUCT_CODE";
const SELECT_BY_CODE_SQL: &str = "SELECT * FROM PRODUCT_CODE WHERE CODE = ?";
const INSERT_SQL: &str = "INSERT INTO PRODUCT_CODE VALUES (?, ?, ?)";
const UPDATE_SQL: &str = "UPDATE PRODUCT_CODE SET DISCOUNT_CODE = ?, DESCRIPTION = ? WHERE CODE = ?";
const IDENTITY_COLUMN: &str = "PRODUCT_CODE.CODE";

/// Which statement a save ended up executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Updated,
}

/// Repository interface for product-code persistence.
pub trait ProductCodeRepository {
    /// Returns every stored record in the order the query yields them.
    fn fetch_all(&self) -> DataAccessResult<Vec<ProductCode>>;

    /// Looks up a single record by its code.
    fn find(&self, code: &str) -> DataAccessResult<Option<ProductCode>>;

    /// Inserts the record, or updates its mutable fields when the code exists.
    fn save(&self, record: &ProductCode) -> DataAccessResult<SaveOutcome>;

    /// Reports whether a record with the same identity is stored.
    ///
    /// Scans the full table, so cost grows with the row count.
    fn contains(&self, record: &ProductCode) -> DataAccessResult<bool> {
        Ok(self.fetch_all()?.contains(record))
    }
}

/// SQLite-backed product-code repository.
pub struct SqliteProductCodeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductCodeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn insert(&self, record: &ProductCode) -> rusqlite::Result<()> {
        self.conn.execute(
            INSERT_SQL,
            params![
                record.code(),
                record.discount_code().to_string(),
                record.description(),
            ],
        )?;
        Ok(())
    }

    fn update(&self, record: &ProductCode) -> rusqlite::Result<usize> {
        self.conn.execute(
            UPDATE_SQL,
            params![
                record.discount_code().to_string(),
                record.description(),
                record.code(),
            ],
        )
    }
}

impl ProductCodeRepository for SqliteProductCodeRepository<'_> {
    fn fetch_all(&self) -> DataAccessResult<Vec<ProductCode>> {
        let mut stmt = self.conn.prepare(SELECT_ALL_SQL)?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(ProductCode::from_row(row)?);
        }

        Ok(records)
    }

    fn find(&self, code: &str) -> DataAccessResult<Option<ProductCode>> {
        let mut stmt = self.conn.prepare(SELECT_BY_CODE_SQL)?;
        let mut rows = stmt.query([code])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(ProductCode::from_row(row)?));
        }

        Ok(None)
    }

    fn save(&self, record: &ProductCode) -> DataAccessResult<SaveOutcome> {
        match self.insert(record) {
            Ok(()) => {
                debug!("event=product_code_save module=repo status=ok outcome=inserted");
                return Ok(SaveOutcome::Inserted);
            }
            Err(err) if is_identity_conflict(&err) => {}
            Err(err) => return Err(err.into()),
        }

        // The row existed when the insert ran; it can only be gone now if a
        // concurrent writer deleted it in between.
        if self.update(record)? == 0 {
            return Err(DataAccessError::NotFound(record.code().to_string()));
        }

        debug!("event=product_code_save module=repo status=ok outcome=updated");
        Ok(SaveOutcome::Updated)
    }
}

impl ProductCode {
    /// Fetches every product code stored behind `conn`.
    pub fn all(conn: &Connection) -> DataAccessResult<Vec<ProductCode>> {
        SqliteProductCodeRepository::new(conn).fetch_all()
    }

    /// Persists this record through `conn`, inserting or updating as needed.
    pub fn save(&self, conn: &Connection) -> DataAccessResult<SaveOutcome> {
        SqliteProductCodeRepository::new(conn).save(self)
    }
}

fn is_identity_conflict(err: &rusqlite::Error) -> bool {
    let rusqlite::Error::SqliteFailure(failure, Some(message)) = err else {
        return false;
    };
    let key_violation = matches!(
        failure.extended_code,
        ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE
    );
    // SQLite names the violated columns after the colon; only `CODE` alone
    // means the row already exists.
    key_violation
        && message
            .rsplit_once(": ")
            .is_some_and(|(_, columns)| columns.eq_ignore_ascii_case(IDENTITY_COLUMN))
}

#[cfg(test)]
mod tests {
    use super::{is_identity_conflict, SqliteProductCodeRepository};
    use crate::db::open_db_in_memory;
    use crate::model::product_code::ProductCode;
    use rusqlite::Connection;

    #[test]
    fn insert_twice_reports_identity_conflict() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteProductCodeRepository::new(&conn);
        let record = ProductCode::new("SW", 'M', "Software");

        repo.insert(&record).unwrap();
        let err = repo.insert(&record).unwrap_err();
        assert!(is_identity_conflict(&err));
    }

    #[test]
    fn check_constraint_is_not_identity_conflict() {
        let conn = open_db_in_memory().unwrap();
        let err = conn
            .execute(
                "INSERT INTO PRODUCT_CODE VALUES (?, ?, ?)",
                ["SW", "MM", "Software"],
            )
            .unwrap_err();
        assert!(!is_identity_conflict(&err));
    }

    #[test]
    fn unique_code_column_counts_as_identity_conflict() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE PRODUCT_CODE (CODE TEXT NOT NULL UNIQUE, DISCOUNT_CODE TEXT, DESCRIPTION TEXT);
             INSERT INTO PRODUCT_CODE VALUES ('SW', 'M', 'Software');",
        )
        .unwrap();

        let err = SqliteProductCodeRepository::new(&conn)
            .insert(&ProductCode::new("SW", 'L', "Software"))
            .unwrap_err();
        assert!(is_identity_conflict(&err));
    }

    #[test]
    fn unique_description_is_not_identity_conflict() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE PRODUCT_CODE (CODE TEXT PRIMARY KEY, DISCOUNT_CODE TEXT, DESCRIPTION TEXT UNIQUE);
             INSERT INTO PRODUCT_CODE VALUES ('SW', 'M', 'Software');",
        )
        .unwrap();

        let err = SqliteProductCodeRepository::new(&conn)
            .insert(&ProductCode::new("HW", 'H', "Software"))
            .unwrap_err();
        assert!(!is_identity_conflict(&err));
    }

    #[test]
    fn update_without_matching_row_affects_nothing() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteProductCodeRepository::new(&conn);

        let changed = repo.update(&ProductCode::new("XX", 'N', "Nothing")).unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn update_binds_mutable_fields_by_code() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteProductCodeRepository::new(&conn);
        repo.insert(&ProductCode::new("HW", 'H', "Hardware")).unwrap();

        let changed = repo.update(&ProductCode::new("HW", 'L', "Hard goods")).unwrap();
        assert_eq!(changed, 1);

        let (discount, description): (String, String) = conn
            .query_row(
                "SELECT DISCOUNT_CODE, DESCRIPTION FROM PRODUCT_CODE WHERE CODE = 'HW'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(discount, "L");
        assert_eq!(description, "Hard goods");
    }
}
