//! Fatal errors raised by the matching and annotation core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("reference sequence '{0}' is empty")]
    EmptyReference(String),

    #[error("no markers to search")]
    NoMarkers,

    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },

    #[error("worker {0} finished without producing output")]
    MissingWorkerOutput(usize),

    #[error("failed to create worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
