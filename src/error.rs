use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("invalid game record: {0}")]
    Record(String),

    #[error("failed to read config file {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file is not valid YAML: {0}")]
    Yaml(#[from] yaml_rust2::ScanError),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request for {name} failed: {source}")]
    Transport {
        name: String,
        #[source]
        source: reqwest::Error,
    },
}
