use crate::error::Result;
use crate::grid::Grid;
use crate::partition::{split_rows_mut, Partition};
use crate::solver::shared_field::SharedField;
use crate::solver::workers::{run_workers, WorkerReport};
use crate::solver_interface::*;
use crate::stencil::{five_point, Stencil};

/// Double buffered parallel Jacobi relaxation.
///
/// Each iteration computes every interior cell from the previous
/// iteration's field into a scratch buffer, then commits the scratch
/// rows back into the grid once all workers are done reading.
pub struct JacobiSolver {
    stencil: Stencil<5>,
    scratch: Vec<f32>,
}

impl JacobiSolver {
    pub fn new() -> Self {
        Self::with_stencil(five_point())
    }

    /// # Panics
    /// If the stencil reaches further than one cell, since workers only
    /// own whole rows and boundaries are one cell wide.
    pub fn with_stencil(stencil: Stencil<5>) -> Self {
        assert!(stencil.reach() <= 1, "stencil reach must be at most 1");
        JacobiSolver {
            stencil,
            scratch: Vec::new(),
        }
    }
}

impl Default for JacobiSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RelaxationMethod for JacobiSolver {
    fn name(&self) -> &'static str {
        "jacobi"
    }

    fn iterate(
        &mut self,
        grid: &mut Grid,
        context: &IterationContext<'_>,
    ) -> Result<()> {
        profiling::scope!("jacobi: iterate");
        let dimension = grid.dimension();
        self.scratch.resize(grid.num_elements(), 0.0);

        let stencil = &self.stencil;
        let offsets = stencil.linear_offsets(dimension);
        let field = SharedField::new(grid);
        let next_rows =
            split_rows_mut(&mut self.scratch, dimension, context.partitions);
        let tasks: Vec<(Partition, &mut [f32])> =
            context.partitions.iter().copied().zip(next_rows).collect();

        let reports =
            run_workers("jacobi", context.barrier, tasks, |(partition, next)| {
                jacobi_worker(stencil, &offsets, &field, partition, next, context)
            })?;
        for report in &reports {
            tracing::trace!(
                worker = report.worker_index,
                diff = report.local_difference,
                cells = report.cells_updated,
                "jacobi worker"
            );
        }
        Ok(())
    }
}

fn jacobi_worker(
    stencil: &Stencil<5>,
    offsets: &[isize; 5],
    field: &SharedField<'_>,
    partition: Partition,
    next: &mut [f32],
    context: &IterationContext<'_>,
) -> Result<WorkerReport> {
    let dimension = field.dimension();
    let mut local_difference = 0.0;
    let mut cells_updated = 0;

    {
        profiling::scope!("jacobi: compute");
        for (row, next_row) in partition.rows().zip(next.chunks_mut(dimension)) {
            for column in 1..dimension - 1 {
                let index = row * dimension + column;
                let new_value = stencil.apply(&field.gather(index, offsets));
                local_difference += (new_value - field.load(index)).abs() as f64;
                next_row[column] = new_value;
                cells_updated += 1;
            }
        }
    }

    // Every worker must be done reading the old field before any commit
    context.barrier.arrive_and_wait()?;

    {
        profiling::scope!("jacobi: commit");
        for (row, next_row) in partition.rows().zip(next.chunks(dimension)) {
            let base = row * dimension;
            for column in 1..dimension - 1 {
                field.store(base + column, next_row[column]);
            }
        }
    }

    context.accumulator.merge(local_difference);
    Ok(WorkerReport {
        worker_index: partition.worker_index,
        local_difference,
        cells_updated,
    })
}
