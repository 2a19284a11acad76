use greenlight_core::error::CoreError;

/// Pipeline-level error type.
///
/// Wraps [`CoreError`] for domain validation failures and adds
/// configuration errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A domain-level error from `greenlight_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An environment variable held a value that could not be used.
    #[error("Invalid configuration for {var}: {message}")]
    Config { var: &'static str, message: String },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
