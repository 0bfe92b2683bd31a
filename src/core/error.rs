use thiserror::Error;

/// Failure reported by the host while serving a callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("patient lookup failed: {0}")]
    PatientLookup(String),

    #[error("alive census unavailable: {0}")]
    Census(String),

    #[error("simulation clock unavailable: {0}")]
    Clock(String),

    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, Error)]
pub enum PrognosisError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed save data: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("unsupported save version {0}")]
    UnsupportedSaveVersion(u32),
}

pub type Result<T> = std::result::Result<T, PrognosisError>;
