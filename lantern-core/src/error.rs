use thiserror::Error;

/// Why a poll produced no snapshot. The tick is skipped in every case.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("status API returned HTTP {status}")]
    Api { status: u16 },

    #[error("status API rejected the request: {0}")]
    Rejected(String),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("response carried no server data")]
    MissingData,
}

pub type Result<T> = std::result::Result<T, PollError>;
