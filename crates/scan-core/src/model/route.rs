//! Parámetros de navegación hacia la vista de resultados.
//!
//! `from_query` nunca falla: un `artifact` ausente queda como cadena vacía y
//! un `type` ausente o desconocido cae en `file`.
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::{ArtifactKind, ArtifactReference};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParams {
    pub artifact: String,
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
}

impl RouteParams {
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new()).append_pair("artifact", &self.artifact)
                                                        .append_pair("type", self.kind.as_str())
                                                        .finish()
    }

    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut artifact = None;
        let mut kind = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "artifact" if artifact.is_none() => artifact = Some(value.into_owned()),
                "type" if kind.is_none() => kind = value.parse::<ArtifactKind>().ok(),
                _ => {}
            }
        }
        Self { artifact: artifact.unwrap_or_default(),
               kind: kind.unwrap_or(ArtifactKind::File) }
    }

    /// Título de la vista de resultados.
    pub fn title(&self) -> &'static str {
        match self.kind {
            ArtifactKind::Url => "URL Analysis",
            _ => "File Analysis",
        }
    }
}

impl From<&ArtifactReference> for RouteParams {
    fn from(artifact: &ArtifactReference) -> Self {
        Self { artifact: artifact.identifier().to_string(),
               kind: artifact.kind() }
    }
}
