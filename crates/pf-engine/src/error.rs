use pf_core::{AreaId, CoreError, PatientTypeId};
use pf_facility::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("patient type {patient_type} has no ENTRY edge")]
    NoEntryEdge { patient_type: PatientTypeId },

    #[error("patient type {patient_type} enters through unknown area {area}")]
    UnknownArea {
        patient_type: PatientTypeId,
        area:         AreaId,
    },

    #[error("unknown patient type {0}")]
    UnknownPatientType(PatientTypeId),

    #[error("facility validation failed: {}", summarize(.0))]
    Validation(Vec<Diagnostic>),
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    let errors: Vec<&Diagnostic> = diagnostics.iter().filter(|d| d.is_error()).collect();
    match errors.first() {
        Some(first) if errors.len() > 1 => format!("{first} (and {} more)", errors.len() - 1),
        Some(first) => first.to_string(),
        None => "no errors".to_owned(),
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
