use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error(
        "SoftLayer credentials not found. Provide them in one of:\n\
        - SL_USERNAME and SL_API_KEY environment variables\n\
        - SL_CONFIG_PATH pointing at a credentials file\n\
        - ./softlayer.yaml or ./.softlayer.yaml\n\
        - ~/.config/softlayer/credentials.yaml"
    )]
    CredentialsNotFound,

    #[error("Missing required setting '{field}' in {source_name}")]
    MissingField { field: String, source_name: String },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
