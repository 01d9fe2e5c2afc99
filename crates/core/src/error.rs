use thiserror::Error;

/// Everything that can go wrong around the map. None of these are fatal:
/// front ends report them and keep running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// The boundary dataset could not be fetched or parsed.
    #[error("failed to load geography: {0}")]
    LoadFailure(String),

    /// A region key had no annotation entry.
    #[error("no annotation for region {0}")]
    LookupMiss(String),

    /// The timeline store or image store rejected a read or write.
    #[error("storage error: {0}")]
    PersistenceFailure(String),

    #[error(transparent)]
    ValidationFailure(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("description is {len} characters, the limit is {cap}")]
    DescriptionTooLong { len: usize, cap: usize },

    #[error("an image must be selected before submitting")]
    MissingImage,
}

impl MapError {
    /// Whether the error was raised locally before any storage call.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailure(_))
    }
}
