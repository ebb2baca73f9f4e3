use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvincesError {
    #[error("Registry error: {0}")]
    Registry(#[from] crate::registry::RegistryError),
    #[error("Conversion error: {0}")]
    Bridge(#[from] crate::bridge::BridgeError),
    #[error("Data error: {0}")]
    Data(#[from] vietnam_provinces_data::DataError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ProvincesError>;
