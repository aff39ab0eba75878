use thiserror::Error;

#[derive(Debug, Error)]
pub enum FacilityError {
    #[error("facility parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FacilityResult<T> = Result<T, FacilityError>;
