use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Todo not found: {0}")]
    TaskNotFound(i64),

    #[error("Title is required")]
    InvalidTitle,

    #[error("Invalid status filter: {0}")]
    InvalidStatusFilter(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl Error {
    /// True for errors caused by the caller's input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidTitle | Error::InvalidStatusFilter(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
