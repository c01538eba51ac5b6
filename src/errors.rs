use thiserror::Error;

/// Errors surfaced by validation. Policy outcomes (unknown, bypassed, not
/// satisfied) are not errors; they live in `ValidationResult`.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// A stored attribute value is neither a string nor a boolean, or has the
    /// wrong one of the two for the attribute being read.
    #[error("malformed attribute `{attribute}`: expected {expected}, found {found}")]
    MalformedAttribute {
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Failures reported by a provider catalog lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("provider lookup failed: {0}")]
    Lookup(String),

    #[error("invalid provider catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

/// Failures while loading configuration or input documents from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub type Result<T> = std::result::Result<T, ValidateError>;
