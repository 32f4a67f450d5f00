use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("GitLab API error (status {status}) for {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InventoryError>;
