use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReqdeskError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("invalid requirement id '{0}': expected REQ-YYYYMM-NNN")]
    InvalidId(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ReqdeskError {
    /// True for errors caused by caller data rather than the process itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ReqdeskError::InvalidInput(_)
                | ReqdeskError::MalformedPayload(_)
                | ReqdeskError::InvalidId(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReqdeskError>;
