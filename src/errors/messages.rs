use super::Failure;

pub const NETWORK_UNAVAILABLE: &str = "No internet connection.";
pub const TIMEOUT: &str = "Request timed out. Please try again.";
pub const UNAUTHORIZED: &str = "You are not authorized. Please sign in again.";
pub const FORBIDDEN: &str = "You don't have permission to access this data.";
pub const NOT_FOUND: &str = "The requested data could not be found.";
pub const SERVER_ERROR: &str = "Server error. Please try again later.";
pub const CLIENT_ERROR: &str = "The request could not be processed.";
pub const DATABASE_ERROR: &str = "A local storage error occurred.";
pub const UNEXPECTED: &str = "An unexpected error occurred.";

/// Translate a failure into the text shown to the user
pub fn to_user_message(failure: &Failure) -> String {
    match failure {
        Failure::NetworkUnavailable => NETWORK_UNAVAILABLE.to_string(),
        Failure::Timeout => TIMEOUT.to_string(),
        Failure::Unauthorized => UNAUTHORIZED.to_string(),
        Failure::Forbidden => FORBIDDEN.to_string(),
        Failure::NotFound => NOT_FOUND.to_string(),
        Failure::ServerError(_) => SERVER_ERROR.to_string(),
        Failure::ClientError(_) => CLIENT_ERROR.to_string(),
        Failure::DatabaseError => DATABASE_ERROR.to_string(),
        Failure::Unexpected(cause) => cause
            .as_ref()
            .map(|c| c.to_string())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UNEXPECTED.to_string()),
    }
}

/// Source of user-facing error text, injected into controllers
pub trait ErrorMessageProvider: Send + Sync {
    fn from_failure(&self, failure: &Failure) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultErrorMessages;

impl ErrorMessageProvider for DefaultErrorMessages {
    fn from_failure(&self, failure: &Failure) -> String {
        to_user_message(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DataError;

    fn every_kind() -> Vec<Failure> {
        vec![
            Failure::NetworkUnavailable,
            Failure::Timeout,
            Failure::Unauthorized,
            Failure::Forbidden,
            Failure::NotFound,
            Failure::ServerError(502),
            Failure::ClientError(418),
            Failure::DatabaseError,
            Failure::Unexpected(None),
            Failure::unexpected(DataError::Status(302)),
        ]
    }

    #[test]
    fn test_every_kind_has_a_deterministic_message() {
        for failure in every_kind() {
            let first = to_user_message(&failure);
            assert!(!first.is_empty(), "empty message for {failure:?}");
            assert_eq!(first, to_user_message(&failure.clone()));
        }
    }

    #[test]
    fn test_known_messages() {
        assert_eq!(to_user_message(&Failure::Timeout), "Request timed out. Please try again.");
        assert_eq!(to_user_message(&Failure::NetworkUnavailable), "No internet connection.");
    }

    #[test]
    fn test_unexpected_prefers_cause_message() {
        let with_cause = Failure::unexpected(DataError::NotFound("orbit file".to_string()));
        assert_eq!(to_user_message(&with_cause), "orbit file not found");
        assert_eq!(to_user_message(&Failure::Unexpected(None)), UNEXPECTED);
    }

    #[test]
    fn test_default_provider_delegates() {
        let provider = DefaultErrorMessages;
        assert_eq!(provider.from_failure(&Failure::DatabaseError), DATABASE_ERROR);
    }
}
