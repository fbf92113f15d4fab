/// Error types for the query service.
///
/// `StoreError` covers anything the backing store can fail with.
/// `ServiceError` is what a route handler returns; every variant maps to
/// an HTTP status so nothing reaches the request loop as a panic.

use chrono::NaiveDate;
use thiserror::Error;

/// Failure talking to the dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to connect to the database: {0}")]
    Connect(#[source] postgres::Error),

    #[error("Database query failed: {0}")]
    Query(#[from] postgres::Error),

    #[error("Stored date '{0}' is not an ISO-8601 date")]
    InvalidStoredDate(String),

    #[error("A {days}-day window ending {anchor} starts before the earliest supported date")]
    WindowOutOfRange { anchor: NaiveDate, days: u32 },
}

/// Failure of a single query-service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    DataAccess(#[from] StoreError),

    #[error("No measurements found {0}")]
    EmptyResult(String),

    #[error("{0}")]
    MalformedInput(String),
}

impl ServiceError {
    /// HTTP status code reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::DataAccess(_) => 500,
            ServiceError::EmptyResult(_) => 404,
            ServiceError::MalformedInput(_) => 400,
        }
    }

    /// Message sent to the caller. Data-access details stay in the log.
    pub fn client_message(&self) -> String {
        match self {
            ServiceError::DataAccess(_) => "Failed to read the dataset".to_string(),
            _ => self.to_string(),
        }
    }

    /// Short machine-readable kind used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::DataAccess(_) => "data_access_error",
            ServiceError::EmptyResult(_) => "empty_result",
            ServiceError::MalformedInput(_) => "malformed_input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let empty = ServiceError::EmptyResult("from 2099-01-01".to_string());
        let malformed = ServiceError::MalformedInput("bad date".to_string());
        let store = ServiceError::from(StoreError::InvalidStoredDate("x".to_string()));

        assert_eq!(empty.status_code(), 404);
        assert_eq!(malformed.status_code(), 400);
        assert_eq!(store.status_code(), 500);
    }

    #[test]
    fn test_data_access_client_message_hides_details() {
        let err = ServiceError::from(StoreError::InvalidStoredDate("garbage".to_string()));
        assert_eq!(err.client_message(), "Failed to read the dataset");
        assert!(err.to_string().contains("garbage"));

        let malformed = ServiceError::MalformedInput("bad date".to_string());
        assert_eq!(malformed.client_message(), "bad date");
    }

    #[test]
    fn test_empty_result_message_includes_range() {
        let err = ServiceError::EmptyResult("from 2099-01-01".to_string());
        assert_eq!(err.to_string(), "No measurements found from 2099-01-01");
        assert_eq!(err.kind(), "empty_result");
    }
}
