use thiserror::Error;

use crate::types::Origin;

/// Failure of a single source adapter. Always recovered inside the
/// aggregator: a failed adapter contributes zero records for that cycle.
#[derive(Debug, Clone, Error)]
#[error("{origin} fetch failed: {kind}")]
pub struct FetchError {
    pub origin: Origin,
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub fn timeout(origin: Origin) -> Self {
        Self {
            origin,
            kind: FetchErrorKind::Timeout,
        }
    }

    pub fn network(origin: Origin, msg: impl Into<String>) -> Self {
        Self {
            origin,
            kind: FetchErrorKind::Network(msg.into()),
        }
    }

    pub fn parse(origin: Origin, msg: impl Into<String>) -> Self {
        Self {
            origin,
            kind: FetchErrorKind::Parse(msg.into()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum FetchErrorKind {
    #[error("timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Error)]
pub enum FlashpointError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
