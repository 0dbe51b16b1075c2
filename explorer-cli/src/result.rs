use explorer_core::ExplorerError;
use thiserror::Error;

pub(crate) type ExplorerCliResult<T> = Result<T, ExplorerCliError>;

#[derive(Error, Debug)]
pub(crate) enum ExplorerCliError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The exploration was aborted: {0}")]
    Aborted(#[from] ExplorerError),
    #[error("The exploration worker stopped without reporting.")]
    WorkerLost,
    #[error("A problem needs at least one {0}.")]
    EmptyProblem(&'static str),
}
