//! Errors the record writer hands back to the UI. Everything that is not a
//! user mistake ends up in [`LibraryError::Storage`] with its `anyhow` context
//! chain intact.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    /// A required field was blank or an id did not parse.
    #[error("{0}")]
    Validation(String),
    /// The primary key is already taken in the target table.
    #[error("{entity} ID {id} already exists.")]
    DuplicateId { entity: &'static str, id: i64 },
    /// Only produced when the strict reference policy is enabled.
    #[error("{entity} ID {id} does not exist.")]
    DanglingReference { entity: &'static str, id: i64 },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl LibraryError {
    /// True for user input mistakes, which the UI shows as warnings.
    pub fn is_validation(&self) -> bool {
        matches!(self, LibraryError::Validation(_))
    }

    /// Message suitable for a dialog. Storage errors show their innermost
    /// cause, which is usually the SQLite message.
    pub fn user_message(&self) -> String {
        match self {
            LibraryError::Storage(err) => surface_error(err),
            other => other.to_string(),
        }
    }
}

pub type WriteResult<T> = std::result::Result<T, LibraryError>;

/// Extract the most relevant error message from a chained error.
pub fn surface_error(err: &anyhow::Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
