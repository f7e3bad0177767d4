/// Convenience result type used across segue.
pub type SegueResult<T> = Result<T, SegueError>;

/// Top-level error taxonomy used by timeline and playback APIs.
///
/// Running past the end of a non-looping timeline is not an error; it is reported
/// as `None` by the sampling methods.
#[derive(thiserror::Error, Debug)]
pub enum SegueError {
    /// Invalid animation authoring (values, durations, cardinality) or a time
    /// before the start of a timeline.
    #[error("tween error: {0}")]
    Tween(String),

    /// Invalid group construction or membership changes.
    #[error("group error: {0}")]
    Group(String),

    /// Lifecycle violations on a playback, such as starting it twice.
    #[error("playback error: {0}")]
    Playback(String),

    /// The requested easing function is not known to the registry.
    #[error("invalid easing: {0}")]
    InvalidEasing(String),

    /// Errors when deserializing timeline definitions.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SegueError {
    /// Build a [`SegueError::Tween`] value.
    pub fn tween(msg: impl Into<String>) -> Self {
        Self::Tween(msg.into())
    }

    /// Build a [`SegueError::Group`] value.
    pub fn group(msg: impl Into<String>) -> Self {
        Self::Group(msg.into())
    }

    /// Build a [`SegueError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`SegueError::InvalidEasing`] value.
    pub fn invalid_easing(msg: impl Into<String>) -> Self {
        Self::InvalidEasing(msg.into())
    }

    /// Build a [`SegueError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
