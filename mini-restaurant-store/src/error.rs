use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("Failed to apply schema: {0}")]
    Migration(String),
    #[error("Database error: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("Invalid stored value: {0}")]
    InvalidValue(String),
}
