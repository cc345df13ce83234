//! Core data access for the product store.
//! Maps `PRODUCT_CODE` rows to records and persists record changes back.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{ConfigError, ConnectionConfig, DatabaseUrl};
pub use db::{open_db, open_db_in_memory, seed_sample_data, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::product_code::ProductCode;
pub use repo::{
    ColumnReader, DataAccessError, DataAccessResult, ProductCodeRepository, SaveOutcome,
    SqliteProductCodeRepository,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
