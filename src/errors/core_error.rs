use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error de escaneo: {0}")]
    Scan(#[from] scan_core::ScanError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_core::ScanError;

    #[test]
    fn test_config_variant_format() {
        let err = CoreError::Config("PHOENIX_TICK_STEP inválido".into());
        assert_eq!(err.to_string(), "Error de configuración: PHOENIX_TICK_STEP inválido");
    }

    #[test]
    fn test_scan_variant_from() {
        let err: CoreError = ScanError::NoActiveSession.into();
        assert!(err.to_string().starts_with("Error de escaneo: "));
    }
}
