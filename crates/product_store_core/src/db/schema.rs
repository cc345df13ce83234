//! `PRODUCT_CODE` table definition and sample rows.
//!
//! # Invariants
//! - `CODE` is the primary key; duplicate inserts fail with a constraint error.
//! - `DISCOUNT_CODE` always holds exactly one character, NUL included.

use super::DbResult;
use rusqlite::Connection;

const CREATE_PRODUCT_CODE_SQL: &str = "CREATE TABLE IF NOT EXISTS PRODUCT_CODE (
    CODE TEXT NOT NULL PRIMARY KEY,
    DISCOUNT_CODE TEXT NOT NULL CHECK (
        DISCOUNT_CODE <> '' AND DISCOUNT_CODE = char(unicode(DISCOUNT_CODE))
    ),
    DESCRIPTION TEXT NOT NULL
);";

const SAMPLE_ROWS: &[(&str, &str, &str)] = &[
    ("SW", "M", "Software"),
    ("HW", "H", "Hardware"),
    ("FW", "L", "Firmware"),
    ("BK", "L", "Books"),
    ("CB", "N", "Cables"),
    ("MS", "N", "Misc"),
];

/// Creates the `PRODUCT_CODE` table when it is missing.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_PRODUCT_CODE_SQL)?;
    Ok(())
}

/// Inserts the sample product codes, skipping codes that already exist.
///
/// Returns how many rows were actually added.
pub fn seed_sample_data(conn: &Connection) -> DbResult<usize> {
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO PRODUCT_CODE VALUES (?1, ?2, ?3)")?;
    let mut inserted = 0;
    for (code, discount_code, description) in SAMPLE_ROWS {
        inserted += stmt.execute([code, discount_code, description])?;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::{ensure_schema, seed_sample_data, SAMPLE_ROWS};
    use rusqlite::Connection;

    fn row_count(conn: &Connection) -> usize {
        conn.query_row("SELECT COUNT(*) FROM PRODUCT_CODE", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn ensure_schema_is_idempotent_and_keeps_rows() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn.execute("INSERT INTO PRODUCT_CODE VALUES ('1', '2', 'Example')", [])
            .unwrap();

        ensure_schema(&conn).unwrap();
        assert_eq!(row_count(&conn), 1);
    }

    #[test]
    fn discount_code_check_accepts_exactly_one_character() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        let insert = |code: &str, discount: &str| {
            conn.execute(
                "INSERT INTO PRODUCT_CODE VALUES (?1, ?2, 'x')",
                [code, discount],
            )
        };

        insert("A", "M").unwrap();
        insert("B", "\0").unwrap();
        insert("C", "\u{e9}").unwrap();
        assert!(insert("D", "").is_err());
        assert!(insert("E", "MM").is_err());
        assert!(insert("F", "M\0N").is_err());
        assert_eq!(row_count(&conn), 3);
    }

    #[test]
    fn seed_sample_data_skips_existing_codes() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();

        assert_eq!(seed_sample_data(&conn).unwrap(), SAMPLE_ROWS.len());
        assert_eq!(seed_sample_data(&conn).unwrap(), 0);
        assert_eq!(row_count(&conn), SAMPLE_ROWS.len());
    }
}
