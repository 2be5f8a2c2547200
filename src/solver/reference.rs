use crate::error::Result;
use crate::grid::Grid;
use crate::solver_interface::*;
use crate::stencil::{five_point, Stencil};

/// Sequential Gauss-Seidel, the baseline the parallel methods are
/// compared against.
///
/// One in place row-major sweep over every interior cell per iteration.
/// Runs on the calling thread and ignores the partitions and barrier.
pub struct ReferenceSolver {
    stencil: Stencil<5>,
}

impl ReferenceSolver {
    pub fn new() -> Self {
        Self::with_stencil(five_point())
    }

    pub fn with_stencil(stencil: Stencil<5>) -> Self {
        assert!(stencil.reach() <= 1, "stencil reach must be at most 1");
        ReferenceSolver { stencil }
    }
}

impl Default for ReferenceSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RelaxationMethod for ReferenceSolver {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn iterate(
        &mut self,
        grid: &mut Grid,
        context: &IterationContext<'_>,
    ) -> Result<()> {
        profiling::scope!("reference: iterate");
        let dimension = grid.dimension();
        let offsets = self.stencil.linear_offsets(dimension);
        let values = grid.values_mut();
        let mut difference = 0.0;
        for row in 1..dimension - 1 {
            for column in 1..dimension - 1 {
                let index = row * dimension + column;
                let args = offsets
                    .map(|offset| values[index.wrapping_add_signed(offset)]);
                let new_value = self.stencil.apply(&args);
                difference += (new_value - values[index]).abs() as f64;
                values[index] = new_value;
            }
        }
        context.accumulator.merge(difference);
        Ok(())
    }
}
