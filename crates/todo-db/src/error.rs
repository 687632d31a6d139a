use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Todo not found: {0}")]
    TaskNotFound(i64),

    #[error(transparent)]
    Core(#[from] todo_core::Error),

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl From<Error> for todo_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::TaskNotFound(id) => todo_core::Error::TaskNotFound(id),
            Error::Core(inner) => inner,
            other => todo_core::Error::Storage(anyhow::Error::new(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
