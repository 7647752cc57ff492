//! Chrome DevTools backend for `ion-viewport`.

pub mod config;
pub mod manager;
pub mod page;

pub use config::BrowserConfig;
pub use config::ViewportConfig;
pub use manager::BrowserManager;
pub use page::Page;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Browser not initialized")]
    NotInitialized,

    #[error("CDP error: {0}")]
    CdpError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Unexpected evaluation result: {0}")]
    UnexpectedResult(serde_json::Value),
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        BrowserError::CdpError(e.to_string())
    }
}

impl From<BrowserError> for ion_viewport::ViewportError {
    fn from(e: BrowserError) -> Self {
        ion_viewport::ViewportError::Session(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BrowserError>;
