//! Error types for MileSort

/// Reasons a sort invocation aborts before reordering.
///
/// The display strings are shown verbatim to the user in a blocking alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    #[error("Could not find offers container.")]
    ContainerNotFound,
    #[error("Found container but no offer tiles.")]
    NoTiles,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
