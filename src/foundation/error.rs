/// Convenience result type used across the trimmer.
pub type TrimResult<T> = Result<T, TrimError>;

/// Top-level error taxonomy used by trimming APIs.
///
/// Only conditions that make a faithful trim impossible are errors. Everything the trimmer
/// can work around is reported through [`crate::Diagnostics`] instead.
#[derive(thiserror::Error, Debug)]
pub enum TrimError {
    /// A tracked memory write runs past the end of the mapping that contains its start.
    #[error("mapping overrun: {0}")]
    MappingOverrun(String),

    /// A tracked memory write does not start inside any active mapping.
    #[error("unmapped write: {0}")]
    UnmappedWrite(String),

    /// The trace is structurally unusable (for example call numbers going backwards).
    #[error("invalid trace: {0}")]
    InvalidTrace(String),

    /// Invalid user-provided options or frame selections.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing trace records.
    #[error("serialization error: {0}")]
    Serde(String),

    /// The requested graphics API has no front end.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrimError {
    /// Build a [`TrimError::MappingOverrun`] value.
    pub fn mapping_overrun(msg: impl Into<String>) -> Self {
        Self::MappingOverrun(msg.into())
    }

    /// Build a [`TrimError::UnmappedWrite`] value.
    pub fn unmapped_write(msg: impl Into<String>) -> Self {
        Self::UnmappedWrite(msg.into())
    }

    /// Build a [`TrimError::InvalidTrace`] value.
    pub fn invalid_trace(msg: impl Into<String>) -> Self {
        Self::InvalidTrace(msg.into())
    }

    /// Build a [`TrimError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`TrimError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`TrimError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// True for the errors that stem from inconsistent memory-write tracking.
    pub fn is_mapping_error(&self) -> bool {
        matches!(self, Self::MappingOverrun(_) | Self::UnmappedWrite(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
