//! Product code domain model.
//!
//! # Responsibility
//! - Define the in-memory record for one `PRODUCT_CODE` row.
//! - Map a result row into a record without depending on a driver type.
//!
//! # Invariants
//! - Identity is `code` alone: equality and hashing ignore mutable fields.
//! - `code` never changes after construction.
//! - `discount_code` is exactly one character.

use crate::repo::{ColumnReader, DataAccessError, DataAccessResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Column holding the primary key.
pub const CODE_COLUMN: &str = "CODE";
/// Column holding the single-character discount code.
pub const DISCOUNT_CODE_COLUMN: &str = "DISCOUNT_CODE";
/// Column holding the free-text description.
pub const DESCRIPTION_COLUMN: &str = "DESCRIPTION";

/// One row of the product-code table.
///
/// Instances are independent snapshots; mutating one never affects another
/// or the stored row until it is saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCode {
    code: String,
    discount_code: char,
    description: String,
}

impl ProductCode {
    /// Creates a record from field values.
    pub fn new(code: impl Into<String>, discount_code: char, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            discount_code,
            description: description.into(),
        }
    }

    /// Rebuilds a record from a row that carries every product-code column.
    ///
    /// Only the first character of `DISCOUNT_CODE` is kept.
    ///
    /// # Errors
    /// - Propagates column read failures from the reader.
    /// - Returns `InvalidData` when `DISCOUNT_CODE` is empty.
    pub fn from_row<R: ColumnReader + ?Sized>(row: &R) -> DataAccessResult<Self> {
        let code = row.read_text(CODE_COLUMN)?;
        let discount_text = row.read_text(DISCOUNT_CODE_COLUMN)?;
        let discount_code = discount_text.chars().next().ok_or_else(|| {
            DataAccessError::InvalidData(format!(
                "empty discount code for product `{code}` in PRODUCT_CODE.DISCOUNT_CODE"
            ))
        })?;

        Ok(Self {
            code,
            discount_code,
            description: row.read_text(DESCRIPTION_COLUMN)?,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn discount_code(&self) -> char {
        self.discount_code
    }

    pub fn set_discount_code(&mut self, discount_code: char) {
        self.discount_code = discount_code;
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }
}

impl PartialEq for ProductCode {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for ProductCode {}

impl Hash for ProductCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl Display for ProductCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CODE: {} DISCOUNT_CODE: {} DESCRIPTION: {}",
            self.code, self.discount_code, self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ProductCode;
    use crate::repo::{ColumnReader, DataAccessError, DataAccessResult};
    use std::collections::HashMap;

    struct MapRow(HashMap<&'static str, &'static str>);

    impl ColumnReader for MapRow {
        fn read_text(&self, column: &str) -> DataAccessResult<String> {
            self.0
                .get(column)
                .map(|value| (*value).to_string())
                .ok_or_else(|| DataAccessError::InvalidData(format!("missing column {column}")))
        }
    }

    fn row(code: &'static str, discount: &'static str, description: &'static str) -> MapRow {
        MapRow(HashMap::from([
            ("CODE", code),
            ("DISCOUNT_CODE", discount),
            ("DESCRIPTION", description),
        ]))
    }

    #[test]
    fn from_row_reads_all_columns() {
        let record = ProductCode::from_row(&row("SW", "M", "Software")).unwrap();
        assert_eq!(record.code(), "SW");
        assert_eq!(record.discount_code(), 'M');
        assert_eq!(record.description(), "Software");
    }

    #[test]
    fn from_row_keeps_first_discount_character() {
        let record = ProductCode::from_row(&row("HW", "HX", "Hardware")).unwrap();
        assert_eq!(record.discount_code(), 'H');
    }

    #[test]
    fn from_row_rejects_empty_discount_code() {
        let err = ProductCode::from_row(&row("HW", "", "Hardware")).unwrap_err();
        assert!(matches!(err, DataAccessError::InvalidData(message) if message.contains("HW")));
    }

    #[test]
    fn from_row_propagates_missing_column() {
        let incomplete = MapRow(HashMap::from([("CODE", "X")]));
        assert!(ProductCode::from_row(&incomplete).is_err());
    }

    #[test]
    fn display_matches_listing_format() {
        let record = ProductCode::new("1", '2', "Example");
        assert_eq!(
            record.to_string(),
            "CODE: 1 DISCOUNT_CODE: 2 DESCRIPTION: Example"
        );
    }
}
