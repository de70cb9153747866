use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failure taxonomy shared by every service.
///
/// `NotFound`, `Forbidden`, `Unauthenticated` and `Validation` abort the
/// current operation with no partial writes. `Upstream` covers collaborator
/// failures (payment gateway, mailer); whether it propagates depends on the
/// call site: a gateway failure blocks the order commit, a mailer failure is
/// logged and swallowed.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("upstream failure: {0}")]
    Upstream(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("storage error: {0}")]
    Storage(#[from] rocksdb::Error),
}

impl StoreError {
    pub fn not_found(entity: impl std::fmt::Display) -> Self {
        Self::NotFound(entity.to_string())
    }

    /// The HTTP status the transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Forbidden(_) => 403,
            Self::Unauthenticated(_) => 401,
            Self::Validation(_) => 400,
            Self::Upstream(_) => 502,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(StoreError::not_found("product").status_code(), 404);
        assert_eq!(StoreError::Forbidden("nope".into()).status_code(), 403);
        assert_eq!(
            StoreError::Unauthenticated("expired".into()).status_code(),
            401
        );
        assert_eq!(StoreError::Validation("bad".into()).status_code(), 400);
        assert_eq!(StoreError::Upstream("gateway".into()).status_code(), 502);
    }

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("order 42");
        assert_eq!(err.to_string(), "order 42 not found");
    }
}
