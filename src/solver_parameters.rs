/// Normalised difference below which a field counts as converged.
pub const TOLERANCE: f64 = 0.01;

pub const DEFAULT_THREADS: usize = 2;

/// Safety bound on iterations so pathological input cannot loop forever.
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Solving is configurable.
/// These are all the parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverParameters {
    /// How many worker threads each iteration uses.
    pub threads: usize,

    /// Convergence threshold for the difference normalised by cell count.
    pub tolerance: f64,

    /// Give up after this many iterations.
    pub max_iterations: usize,

    /// Some multithreaded operations on grids are chunked with this size
    pub chunk_size: usize,
}

impl std::default::Default for SolverParameters {
    fn default() -> Self {
        SolverParameters {
            threads: DEFAULT_THREADS,
            tolerance: TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            chunk_size: 4096,
        }
    }
}
