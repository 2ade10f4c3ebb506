use std::result::Result as StdResult;

use thiserror::Error;

/// Result type for triad operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("delegate not created: call on_create before {0}")]
    /// A delegate lifecycle method ran before `on_create`.
    NotCreated(&'static str),
    #[error("host has no content container")]
    /// The host could not provide a container to draw screens into.
    NoContainer,
    #[error("backstack already started with {0} screen(s)")]
    /// `start_with` was called on a navigator that already holds screens.
    AlreadyStarted(usize),
    #[error("cannot start with an empty backstack")]
    /// `start_with_backstack` was given no screens.
    EmptyBackstack,
    #[error("invalid screen name: {0}")]
    /// A screen name contained characters outside `[a-z0-9_]`.
    InvalidName(String),
    #[error("unknown screen: {0}")]
    /// No factory is registered for a deep-link screen key.
    UnknownScreen(String),
    #[error("payload: {0}")]
    /// A deep-link or view state payload could not be encoded or decoded.
    Payload(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Payload(e.to_string())
    }
}
