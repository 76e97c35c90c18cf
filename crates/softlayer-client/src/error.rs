//! SoftLayer client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Invalid template:\n{0}")]
    InvalidTemplate(String),

    #[error("Error while looking up {field} from name [{name}]: {source}")]
    Lookup {
        field: &'static str,
        name: String,
        #[source]
        source: softlayer_core::SoftLayerError,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] softlayer_config::ConfigError),

    #[error(transparent)]
    SoftLayer(#[from] softlayer_core::SoftLayerError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
