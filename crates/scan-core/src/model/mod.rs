//! Modelos neutrales del flujo (artifact, veredictos, parámetros de ruta).

pub mod artifact;
pub mod route;
pub mod verdict;

pub use artifact::{ArtifactKind, ArtifactReference};
pub use route::RouteParams;
pub use verdict::{EngineVerdict, VerdictStatus};
