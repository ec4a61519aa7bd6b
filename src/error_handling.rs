use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

use crate::feed::FeedError;
use crate::store::RangeSetError;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// The persisted ranges table violates the sorted/non-overlapping
    /// invariant and cannot be loaded into a lookup index.
    #[error("Corrupt dataset: {0}")]
    CorruptDataset(#[from] RangeSetError),

    /// A persisted numeric column does not fit the expected 32-bit range.
    #[error("Corrupt dataset: {column} value {value} is out of range")]
    OutOfRangeColumn { column: &'static str, value: i64 },
}

/// Error types for an ingestion run.
///
/// Every variant is ingestion-fatal: the run aborts and the previously
/// published dataset generation stays authoritative. No partial replace
/// of any table is ever visible.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The vendor feed violated the expected row shape.
    #[error("Malformed feed: {0}")]
    MalformedFeed(#[from] FeedError),

    /// The feed parsed, but its ranges are not a valid non-overlapping set.
    #[error("Invalid range set in feed: {0}")]
    InvalidRanges(#[from] RangeSetError),

    /// Downloading the vendor archive failed.
    #[error("Archive fetch failed: {0}")]
    ArchiveFetch(#[source] ReqwestError),

    /// The archive could not be decompressed or a member file is missing.
    #[error("Archive extract failed: {0}")]
    ArchiveExtract(String),

    /// The storage backend rejected a truncate or insert.
    #[error("Backend failure: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Error types for a single resolution query.
///
/// "No matching record" is not an error; lookups return `Ok(None)` for
/// that case.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The query string is not a valid IPv4 address.
    #[error("Invalid IPv4 address: {0}")]
    InvalidIp(String),

    /// Network or service failure during a remote-mode lookup. Not
    /// retried internally; the caller decides.
    #[error("Remote transport failure: {0}")]
    RemoteTransport(#[from] ReqwestError),

    /// The remote service answered with a document we could not parse.
    #[error("Remote response parse failure: {0}")]
    RemoteResponse(String),
}
