use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Record store is missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Run cancelled")]
    Cancelled,
}

impl ScraperError {
    /// Transport failures are skipped by the adapters; everything else bubbles up.
    pub fn is_transport(&self) -> bool {
        matches!(self, ScraperError::Http(_) | ScraperError::HttpStatus { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
