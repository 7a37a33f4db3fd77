use playspace_assets::ResourceError;
use playspace_render::GraphError;
use std::path::PathBuf;

/// Errors from loading and instantiating a level document.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to read level {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A mesh or entity spec names a key absent from its dictionary.
    #[error("{owner}: unresolved {kind} reference '{key}'")]
    UnresolvedReference {
        kind: &'static str,
        key: String,
        owner: String,
    },
    #[error("{owner}: invalid color value '{value}'")]
    InvalidColor { value: String, owner: String },
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
