/// Convenience result type used across stepviz.
pub type StepvizResult<T> = Result<T, StepvizError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum StepvizError {
    /// Invalid user-provided or model data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while producing a search trace.
    #[error("search error: {0}")]
    Search(String),

    /// Errors while producing a sort trace.
    #[error("sort error: {0}")]
    Sort(String),

    /// Errors while sampling a frame source.
    #[error("sample error: {0}")]
    Sample(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StepvizError {
    /// Build a [`StepvizError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StepvizError::Search`] value.
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    /// Build a [`StepvizError::Sort`] value.
    pub fn sort(msg: impl Into<String>) -> Self {
        Self::Sort(msg.into())
    }

    /// Build a [`StepvizError::Sample`] value.
    pub fn sample(msg: impl Into<String>) -> Self {
        Self::Sample(msg.into())
    }
}
