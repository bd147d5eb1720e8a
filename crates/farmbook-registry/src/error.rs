use farmbook_db::StoreError;
use thiserror::Error;

/// Registry failures
///
/// Every variant except [`RegistryError::Store`] carries a message meant for
/// the API caller.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Malformed input, e.g. a CPF without 11 digits
    #[error("{0}")]
    Validation(String),

    /// The addressed entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// The write would break a uniqueness rule
    #[error("{0}")]
    Conflict(String),

    /// A referenced producer or farm does not exist
    #[error("{0}")]
    MissingReference(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
