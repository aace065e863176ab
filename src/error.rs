//! Unified error type for all store operations.

/// Things that can go wrong when reading or writing a collection.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested collection name is not in the registry.
    UnknownCollection(String),
    /// An upsert payload lacks `id` or `item`.
    MissingField,
    /// A backing file holds invalid JSON or a non-object top level.
    DataCorruption(String),
    /// File system problem (read, write, rename, create).
    Io(String),
    /// Failed to serialize a collection to bytes.
    Serialize(String),
    /// Bad configuration (unusable data directory, bind address, etc.).
    Config(String),
}

impl Error {
    /// `true` for errors caused by the request rather than the server.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::UnknownCollection(_) | Error::MissingField)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnknownCollection(name) => write!(f, "unknown collection: {name}"),
            Error::MissingField => write!(f, "missing id or item"),
            Error::DataCorruption(msg) => write!(f, "data corruption: {msg}"),
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() || err.is_data() {
            Error::DataCorruption(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
