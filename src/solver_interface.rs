use crate::barrier::Barrier;
use crate::convergence::DiffAccumulator;
use crate::error::Result;
use crate::grid::Grid;
use crate::partition::Partition;

/// Everything one iteration shares between its workers.
/// Owned by the convergence driver and reused across iterations.
pub struct IterationContext<'a> {
    pub partitions: &'a [Partition],
    pub barrier: &'a Barrier,
    pub accumulator: &'a DiffAccumulator,
}

impl IterationContext<'_> {
    pub fn threads(&self) -> usize {
        self.partitions.len()
    }
}

/// All relaxation methods implement this interface
pub trait RelaxationMethod {
    fn name(&self) -> &'static str;

    /// Run one full iteration over `grid`.
    ///
    /// Every updated cell contributes `|new - old|` to
    /// `context.accumulator`. Boundary cells must not be written.
    /// Parallel methods launch exactly one worker per partition, and
    /// every worker reaches every barrier phase the method uses.
    fn iterate(
        &mut self,
        grid: &mut Grid,
        context: &IterationContext<'_>,
    ) -> Result<()>;
}
