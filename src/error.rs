//! Error types for grid construction, solving and reporting.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("grid dimension must be positive")]
    InvalidDimension,

    #[error("buffer of {len} values does not match a {dimension}x{dimension} grid")]
    BufferSize { dimension: usize, len: usize },

    #[error("grid dimension {dimension} leaves no interior rows, need at least 3")]
    DegenerateDimension { dimension: usize },

    #[error("at least one worker thread is required")]
    NoWorkers,

    #[error("failed to launch worker thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("barrier was aborted before all workers arrived")]
    BarrierAborted,

    #[error(
        "{method} did not converge after {iterations} iterations (difference {difference})"
    )]
    NotConverged {
        method: &'static str,
        iterations: usize,
        difference: f64,
    },

    #[error("grid dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SolveError>;
