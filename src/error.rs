use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("Network Error: {0}")]
    Network(#[from] NetworkError),
    #[error("UI Error: {0}")]
    Ui(String),
}

// Backend (poll / checkout) Error Type
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("Failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

// Inbound frame channel Error Type
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("Failed to receive frame: {0}")]
    Receive(tokio_tungstenite::tungstenite::Error),
}

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Frame payload is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("Frame payload is not a decodable image: {0}")]
    Image(#[from] image::ImageError),
}
