pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("dataset not found: {name}")]
    DatasetNotFound { name: String },

    #[error("malformed dataset (line {line}): {message}")]
    MalformedDataset { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
