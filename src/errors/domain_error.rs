use scan_core::ScanError;
use thiserror::Error;

/// Errores del dominio expuestos a la capa de presentación.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Entidad no encontrada: {0}")]
    NotFound(String),
    #[error("Validación fallida: {0}")]
    Validation(String),
    #[error("Error genérico de dominio: {0}")]
    Generic(String),
}

impl From<ScanError> for DomainError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Submission(inner) => DomainError::Validation(inner.to_string()),
            ScanError::InvalidRegistry(msg) | ScanError::InvalidSettings(msg) | ScanError::InvalidVerdict(msg) => {
                DomainError::Validation(msg)
            }
            ScanError::NoActiveSession => DomainError::NotFound("sesión de escaneo activa".into()),
            other => DomainError::Generic(other.to_string()),
        }
    }
}
