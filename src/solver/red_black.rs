use crate::error::Result;
use crate::grid::Grid;
use crate::partition::Partition;
use crate::solver::shared_field::SharedField;
use crate::solver::workers::{run_workers, WorkerReport};
use crate::solver_interface::*;
use crate::stencil::{five_point, Stencil};

/// First column of the pass updating odd columns.
const ODD_COLUMNS: usize = 1;

/// First column of the pass updating even columns.
const EVEN_COLUMNS: usize = 2;

/// In place parallel Gauss-Seidel with two color classes.
///
/// Cells are colored by column parity. Each iteration first updates the
/// odd columns, then, after every worker has finished that pass, the
/// even columns, which read the freshly updated odd neighbors.
/// The iteration's difference is the sum of both passes.
pub struct RedBlackSolver {
    stencil: Stencil<5>,
}

impl RedBlackSolver {
    pub fn new() -> Self {
        Self::with_stencil(five_point())
    }

    /// # Panics
    /// If the stencil reaches further than one cell.
    pub fn with_stencil(stencil: Stencil<5>) -> Self {
        assert!(stencil.reach() <= 1, "stencil reach must be at most 1");
        RedBlackSolver { stencil }
    }
}

impl Default for RedBlackSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RelaxationMethod for RedBlackSolver {
    fn name(&self) -> &'static str {
        "red-black"
    }

    fn iterate(
        &mut self,
        grid: &mut Grid,
        context: &IterationContext<'_>,
    ) -> Result<()> {
        profiling::scope!("red_black: iterate");
        let stencil = &self.stencil;
        let offsets = stencil.linear_offsets(grid.dimension());
        let field = SharedField::new(grid);
        let tasks = context.partitions.to_vec();

        let reports = run_workers("red_black", context.barrier, tasks, |partition| {
            red_black_worker(stencil, &offsets, &field, partition, context)
        })?;
        for report in &reports {
            tracing::trace!(
                worker = report.worker_index,
                diff = report.local_difference,
                cells = report.cells_updated,
                "red-black worker"
            );
        }
        Ok(())
    }
}

fn red_black_worker(
    stencil: &Stencil<5>,
    offsets: &[isize; 5],
    field: &SharedField<'_>,
    partition: Partition,
    context: &IterationContext<'_>,
) -> Result<WorkerReport> {
    let (odd_difference, odd_cells) = {
        profiling::scope!("red_black: odd pass");
        relax_columns(stencil, offsets, field, &partition, ODD_COLUMNS)
    };
    context.accumulator.merge(odd_difference);

    // Even columns read odd neighbors, possibly from other workers' rows
    context.barrier.arrive_and_wait()?;

    let (even_difference, even_cells) = {
        profiling::scope!("red_black: even pass");
        relax_columns(stencil, offsets, field, &partition, EVEN_COLUMNS)
    };
    context.accumulator.merge(even_difference);

    Ok(WorkerReport {
        worker_index: partition.worker_index,
        local_difference: odd_difference + even_difference,
        cells_updated: odd_cells + even_cells,
    })
}

/// Update every second interior column starting at `first_column`, in
/// place, over the partition's rows. Returns the summed `|new - old|`
/// and the number of cells updated.
fn relax_columns(
    stencil: &Stencil<5>,
    offsets: &[isize; 5],
    field: &SharedField<'_>,
    partition: &Partition,
    first_column: usize,
) -> (f64, usize) {
    let dimension = field.dimension();
    let mut difference = 0.0;
    let mut cells = 0;
    for row in partition.rows() {
        let base = row * dimension;
        for column in (first_column..dimension - 1).step_by(2) {
            let index = base + column;
            let old_value = field.load(index);
            let new_value = stencil.apply(&field.gather(index, offsets));
            field.store(index, new_value);
            difference += (new_value - old_value).abs() as f64;
            cells += 1;
        }
    }
    (difference, cells)
}
