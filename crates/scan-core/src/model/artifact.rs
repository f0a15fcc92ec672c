//! Referencia opaca al artifact enviado a análisis.
//!
//! Un `ArtifactReference` se crea una sola vez al enviar el formulario y es
//! inmutable después. El `identifier` depende del tipo:
//! - `file`: `file_<nombre>_<unix-millis>`.
//! - `url`: base64 estándar del texto de la URL.
//! - `hash`: el hash tal cual (sin espacios alrededor).
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SubmissionError;

/// Tipo declarado del artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    File,
    Url,
    Hash,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [ArtifactKind::File, ArtifactKind::Url, ArtifactKind::Hash];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::File => "file",
            ArtifactKind::Url => "url",
            ArtifactKind::Hash => "hash",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = SubmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(ArtifactKind::File),
            "url" => Ok(ArtifactKind::Url),
            "hash" => Ok(ArtifactKind::Hash),
            other => Err(SubmissionError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactReference {
    kind: ArtifactKind,
    identifier: String,
}

impl ArtifactReference {
    /// Construye la referencia a partir de la entrada cruda del usuario.
    ///
    /// Falla con `SubmissionError::EmptyInput` si no hay entrada o si sólo
    /// contiene espacios.
    pub fn submit(kind: ArtifactKind, raw: Option<&str>) -> Result<Self, SubmissionError> {
        Self::submit_at(kind, raw, Utc::now())
    }

    /// Variante de `submit` con instante explícito (el sello temporal sólo
    /// participa en identificadores de tipo `file`).
    pub fn submit_at(kind: ArtifactKind,
                     raw: Option<&str>,
                     now: DateTime<Utc>)
                     -> Result<Self, SubmissionError> {
        let input = raw.map(str::trim)
                       .filter(|s| !s.is_empty())
                       .ok_or(SubmissionError::EmptyInput { kind })?;

        let identifier = match kind {
            ArtifactKind::File => {
                let name = Path::new(input).file_name()
                                           .and_then(|n| n.to_str())
                                           .filter(|n| !n.is_empty())
                                           .unwrap_or(input);
                format!("file_{}_{}", name, now.timestamp_millis())
            }
            ArtifactKind::Url => STANDARD.encode(input.as_bytes()),
            ArtifactKind::Hash => input.to_string(),
        };

        Ok(Self { kind, identifier })
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// `true` si el identificador contiene alguna de las subcadenas dadas.
    pub fn contains_any<S: AsRef<str>>(&self, markers: &[S]) -> bool {
        markers.iter()
               .map(AsRef::as_ref)
               .filter(|m| !m.is_empty())
               .any(|m| self.identifier.contains(m))
    }
}

impl fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn hash_submission_keeps_raw_hash() {
        let art = ArtifactReference::submit(ArtifactKind::Hash, Some("d41d8cd98f00b204e9800998ecf8427e")).unwrap();
        assert_eq!(art.kind(), ArtifactKind::Hash);
        assert_eq!(art.identifier(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn file_submission_uses_name_and_timestamp() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let art = ArtifactReference::submit_at(ArtifactKind::File, Some("/tmp/samples/invoice.pdf"), now).unwrap();
        assert_eq!(art.identifier(), "file_invoice.pdf_1700000000123");
    }

    #[test]
    fn url_submission_is_base64_encoded() {
        let art = ArtifactReference::submit(ArtifactKind::Url, Some("https://example.com")).unwrap();
        assert_eq!(art.identifier(), "aHR0cHM6Ly9leGFtcGxlLmNvbQ==");
    }

    #[test]
    fn empty_or_missing_input_is_rejected() {
        for kind in ArtifactKind::ALL {
            assert_eq!(ArtifactReference::submit(kind, None), Err(SubmissionError::EmptyInput { kind }));
            assert_eq!(ArtifactReference::submit(kind, Some("")), Err(SubmissionError::EmptyInput { kind }));
            assert_eq!(ArtifactReference::submit(kind, Some("   ")), Err(SubmissionError::EmptyInput { kind }));
        }
    }

    #[test]
    fn kind_parses_from_labels() {
        assert_eq!("URL".parse::<ArtifactKind>().unwrap(), ArtifactKind::Url);
        assert_eq!("hash".parse::<ArtifactKind>().unwrap(), ArtifactKind::Hash);
        assert!(matches!("search".parse::<ArtifactKind>(), Err(SubmissionError::UnknownKind(_))));
    }

    #[test]
    fn marker_detection_ignores_empty_markers() {
        let art = ArtifactReference::submit(ArtifactKind::Hash, Some("eicar-malware-test")).unwrap();
        assert!(art.contains_any(&["malware"]));
        assert!(!art.contains_any(&["", "virus"]));
    }
}
