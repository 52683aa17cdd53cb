//! Error types for Focusly

use thiserror::Error;

/// Result type alias for Focusly operations
pub type FocusResult<T> = Result<T, FocusError>;

/// Every failure the extension can hit. None of these cross the message
/// channel: the background logs them, the UI shows them to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FocusError {
    #[error("no stored config for mode \"{0}\"")]
    MissingConfig(String),

    #[error("mode \"{0}\" has no sites")]
    EmptySiteList(String),

    #[error("malformed config for mode \"{mode}\": {reason}")]
    MalformedConfig { mode: String, reason: String },

    #[error("cannot parse navigation URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("navigation URL has no host: {0}")]
    MissingHost(String),

    #[error("\"{0}\" does not look like a domain")]
    InvalidDomain(String),

    #[error("mode name cannot be empty")]
    EmptyName,

    #[error("A focus mode with that name already exists.")]
    DuplicateName(String),

    #[error("the built-in mode \"{0}\" cannot be renamed")]
    BuiltInMode(String),

    #[error("\"{0}\" is reserved and cannot name a focus mode")]
    ReservedName(String),

    #[error("No focus mode name provided in the URL.")]
    NoModeSelected,

    #[error("browser API error: {0}")]
    Bridge(String),

    #[error("serialization error: {0}")]
    Serde(String),
}

impl FocusError {
    /// Wrap a failure reported by the host browser runtime
    pub fn bridge(msg: impl Into<String>) -> Self {
        Self::Bridge(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for FocusError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for FocusError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::Serde(err.to_string())
    }
}
