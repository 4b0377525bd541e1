use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("ingest error: {0}")]
    Ingest(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error() {
        let err = CoreError::Ingest("no file name".to_string());
        assert_eq!(err.to_string(), "ingest error: no file name");
    }

    #[test]
    fn test_encoding_error() {
        let err = CoreError::Encoding("not a data url".to_string());
        assert_eq!(err.to_string(), "encoding error: not a data url");
    }

    #[test]
    fn test_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CoreError::from(io_err);
        assert!(err.to_string().contains("file not found"));
    }
}
