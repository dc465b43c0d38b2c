use thiserror::Error;

/// Failures the pipeline reports to its caller. Per-page fetch problems are
/// not here: those are absorbed as empty pages.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Every source page came back empty or unreachable.
    #[error("no legislative matters could be retrieved from any source page")]
    Unavailable,

    /// Unexpected fault while consolidating.
    #[error("internal pipeline error: {0}")]
    Internal(String),
}
