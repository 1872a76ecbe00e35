/// Crate-wide result alias.
pub type ScrollResult<T> = Result<T, ScrollError>;

/// Errors surfaced by configuration, binding and scene loading.
///
/// Runtime anomalies during sampling (degenerate ranges, stale elements,
/// non-positive pin travel) never produce an error; they degrade to "no
/// visible animation" instead.
#[derive(thiserror::Error, Debug)]
pub enum ScrollError {
    /// A trigger, tween or rule is structurally invalid.
    #[error("validation error: {0}")]
    Validation(String),

    /// A binding refers to something that does not exist.
    #[error("binding error: {0}")]
    Binding(String),

    /// A scene document is inconsistent.
    #[error("scene error: {0}")]
    Scene(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Passthrough for host-side failures.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollError {
    /// Build a [`ScrollError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollError::Binding`].
    pub fn binding(msg: impl Into<String>) -> Self {
        Self::Binding(msg.into())
    }

    /// Build a [`ScrollError::Scene`].
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    /// Build a [`ScrollError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ScrollError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
