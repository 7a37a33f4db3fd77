use std::path::PathBuf;

/// Errors from asset loading.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("asset not found: {path}")]
    NotFound { path: PathBuf },
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

impl ResourceError {
    /// Classify an IO error, folding missing files into `NotFound`.
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ResourceError::NotFound { path }
        } else {
            ResourceError::Io { path, source }
        }
    }
}
