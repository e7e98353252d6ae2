use thiserror::Error;

/// Errors returned by flag handle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlagError {
    /// The handle no longer references a shared state because it was the
    /// source of a move. Assign a valid reference into it before retrying.
    #[error("shared state has been moved away")]
    MovedAway,
}

pub type FlagResult<T> = std::result::Result<T, FlagError>;
