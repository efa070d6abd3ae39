use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug)]
pub enum Error {
    /// Loading further result pages failed; the cause is attached
    #[error("Failed to load pages: {0}")]
    PageLoad(#[source] Box<Error>),

    /// A value did not satisfy an invariant (configuration, id rules)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A page could not be retrieved
    #[error("Fetching {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    /// Page markup did not have the expected structure
    #[error("Malformed markup: {0}")]
    Markup(String),

    /// The key-value store could not be read or written
    #[error("Storage operation failed: {0}")]
    Storage(String),

    /// A configuration file could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Wrap any error raised while paginating.
    pub fn page_load(cause: Error) -> Self {
        Error::PageLoad(Box::new(cause))
    }
}

impl From<redb::Error> for Error {
    fn from(value: redb::Error) -> Self {
        Error::Storage(format!("{value}"))
    }
}

impl From<redb::DatabaseError> for Error {
    fn from(value: redb::DatabaseError) -> Self {
        Error::Storage(format!("{value}"))
    }
}

impl From<redb::TransactionError> for Error {
    fn from(value: redb::TransactionError) -> Self {
        Error::Storage(format!("{value}"))
    }
}

impl From<redb::TableError> for Error {
    fn from(value: redb::TableError) -> Self {
        Error::Storage(format!("{value}"))
    }
}

impl From<redb::StorageError> for Error {
    fn from(value: redb::StorageError) -> Self {
        Error::Storage(format!("{value}"))
    }
}

impl From<redb::CommitError> for Error {
    fn from(value: redb::CommitError) -> Self {
        Error::Storage(format!("{value}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
