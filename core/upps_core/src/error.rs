use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UppsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{origin} must be a mapping at the top level")]
    NotAMapping { origin: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize profile: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("section '{key}' has an unexpected shape: {source}")]
    Section {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode section '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("schema file not found; searched: {}", format_paths(.searched))]
    SchemaNotFound { searched: Vec<PathBuf> },

    #[error("schema is invalid: {0}")]
    SchemaCompile(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid text pattern: {0}")]
    Pattern(#[from] regex::Error),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type UppsResult<T> = Result<T, UppsError>;
