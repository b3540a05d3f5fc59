//! Crate error type.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the detection pipeline.
///
/// Configuration problems are rejected when a [`crate::DetectionPipeline`]
/// is constructed, never mid-stream. Backend failures are boxed so any
/// inference runtime can sit behind the detector/classifier traits.
#[derive(Debug, Error)]
pub enum Error {
    /// No label table exists for the requested classification language.
    #[error("unsupported classification language: {0:?}")]
    UnsupportedLanguage(String),

    /// The inference device name is not one the pipeline knows about.
    #[error("unsupported inference device: {0:?}")]
    UnsupportedDevice(String),

    /// The detector's class list does not contain the reserved animal class.
    #[error("detector has no {0:?} class")]
    MissingAnimalClass(&'static str),

    /// The classifier returned a score vector that does not line up with the
    /// species label table.
    #[error("classifier returned {got} scores for {expected} species labels")]
    ClassCountMismatch { got: usize, expected: usize },

    /// Failure inside the external detection backend.
    #[error("detector backend: {0}")]
    Detector(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Failure inside the external classification backend.
    #[error("classifier backend: {0}")]
    Classifier(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a detector backend failure.
    pub fn detector<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Error::Detector(Box::new(err))
    }

    /// Wrap a classifier backend failure.
    pub fn classifier<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Error::Classifier(Box::new(err))
    }
}
