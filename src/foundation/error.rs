/// Convenience result type used across Cadenza.
pub type CadenzaResult<T> = Result<T, CadenzaError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Frame-tick internals never produce these: malformed animation state
/// degrades to a no-op there so one broken step cannot stall a running
/// session. Errors are reserved for construction and registration paths
/// where the caller can still fix the input.
#[derive(thiserror::Error, Debug)]
pub enum CadenzaError {
    /// Invalid user-provided options or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while constructing or registering animation steps.
    #[error("animation error: {0}")]
    Animation(String),

    /// References to elements or scenarios that do not exist.
    #[error("scene error: {0}")]
    Scene(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CadenzaError {
    /// Build a [`CadenzaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CadenzaError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`CadenzaError::Scene`] value.
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    /// Build a [`CadenzaError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            CadenzaError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            CadenzaError::animation("x")
                .to_string()
                .contains("animation error:")
        );
        assert!(CadenzaError::scene("x").to_string().contains("scene error:"));
        assert!(
            CadenzaError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = CadenzaError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
