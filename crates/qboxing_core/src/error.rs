use thiserror::Error;

/// A configuration value the engine cannot run with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: String, value: f32 },

    #[error("{field} must be a probability in [0, 1], got {value}")]
    Probability { field: String, value: f32 },

    #[error("{field}: invalid range {min}..{max}")]
    InvalidRange { field: String, min: f32, max: f32 },

    #[error("{0} must have at least one bin")]
    ZeroBins(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Unsupported config format: {0:?}")]
    UnsupportedFormat(String),
}

#[derive(Error, Debug)]
pub enum BoutError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema version mismatch: found {found}, expected {expected}")]
    SchemaVersion { found: u8, expected: u8 },
}

impl BoutError {
    /// Whether the caller can fix the request and retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BoutError::Config(_) => true,
            BoutError::Json(_) | BoutError::Yaml(_) => true,
            BoutError::SchemaVersion { .. } => true,
            BoutError::Io(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BoutError>;
