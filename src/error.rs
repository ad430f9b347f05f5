//! Errors raised while mounting a carousel onto its host.

use thiserror::Error;

use crate::engine::ElementId;

/// The host could not provide the structure the carousel needs.
///
/// Returned before any host edits happen, so a failed construction leaves
/// nothing behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("expected an element or a selector, but `{0}` resolved to nothing")]
    HostNotFound(String),

    #[error("container {0:?} has no wrapper child element")]
    MissingWrapper(ElementId),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
