/// Failure taxonomy and the classification of data-layer errors
mod messages;
mod view;

pub use messages::{to_user_message, DefaultErrorMessages, ErrorMessageProvider};
pub use view::{ErrorDetail, ErrorResponse, ViewError};

use std::future::Future;
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Underlying error kept by [`Failure::Unexpected`]
pub type Cause = Arc<dyn std::error::Error + Send + Sync>;

/// Classified error kinds that cross from the data layer into the controllers.
///
/// Every error raised by a collaborator is converted into exactly one of these
/// before a controller sees it.
#[derive(Debug, Clone, Error)]
pub enum Failure {
    #[error("network unavailable")]
    NetworkUnavailable,
    #[error("request timed out")]
    Timeout,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("server error (HTTP {0})")]
    ServerError(u16),
    #[error("client error (HTTP {0})")]
    ClientError(u16),
    #[error("database error")]
    DatabaseError,
    #[error("unexpected failure{}", describe_cause(.0))]
    Unexpected(Option<Cause>),
}

impl Failure {
    pub fn unexpected<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Failure::Unexpected(Some(Arc::new(cause)))
    }

    /// Map an HTTP status code onto the taxonomy
    pub fn from_status(code: u16) -> Self {
        match code {
            401 => Failure::Unauthorized,
            403 => Failure::Forbidden,
            404 => Failure::NotFound,
            400..=499 => Failure::ClientError(code),
            500..=599 => Failure::ServerError(code),
            _ => Failure::unexpected(DataError::Status(code)),
        }
    }
}

impl PartialEq for Failure {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Failure::ServerError(a), Failure::ServerError(b))
            | (Failure::ClientError(a), Failure::ClientError(b)) => a == b,
            (Failure::Unexpected(a), Failure::Unexpected(b)) => {
                a.as_ref().map(ToString::to_string) == b.as_ref().map(ToString::to_string)
            }
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

fn describe_cause(cause: &Option<Cause>) -> String {
    cause.as_ref().map(|c| format!(": {c}")).unwrap_or_default()
}

/// Raw errors produced by data sources and the local cache
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0} not found")]
    NotFound(String),
}

impl From<DataError> for Failure {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Io(e) => match e.kind() {
                io::ErrorKind::TimedOut => Failure::Timeout,
                io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::NotConnected
                | io::ErrorKind::AddrNotAvailable => Failure::NetworkUnavailable,
                _ => Failure::unexpected(e),
            },
            DataError::Http(e) => {
                if e.is_timeout() {
                    Failure::Timeout
                } else if e.is_connect() {
                    Failure::NetworkUnavailable
                } else if let Some(status) = e.status() {
                    Failure::from_status(status.as_u16())
                } else {
                    Failure::unexpected(e)
                }
            }
            DataError::Status(code) => Failure::from_status(code),
            DataError::Database(_) => Failure::DatabaseError,
            DataError::NotFound(_) => Failure::NotFound,
            err @ DataError::Parse(_) => Failure::unexpected(err),
        }
    }
}

/// Result type returned by every collaborator call
pub type ApiResult<T> = Result<T, Failure>;

/// Await a data-layer operation and classify its error, if any
pub async fn run_catching<T, F>(operation: &str, block: F) -> ApiResult<T>
where
    F: Future<Output = Result<T, DataError>>,
{
    match block.await {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(operation, error = %err, "data operation failed");
            Err(Failure::from(err))
        }
    }
}
