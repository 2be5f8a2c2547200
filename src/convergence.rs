//! Iteration loop shared by every relaxation method.
//!
//! The driver owns the barrier and the difference accumulator, hands them
//! to the method once per iteration, and decides when to stop.

use crate::barrier::Barrier;
use crate::error::{Result, SolveError};
use crate::grid::Grid;
use crate::partition::partition_rows;
use crate::solver_interface::*;
use crate::solver_parameters::SolverParameters;
use std::sync::{Mutex, PoisonError};

/// Global sum of per-worker differences for one iteration.
/// Workers merge into it once per phase.
#[derive(Debug, Default)]
pub struct DiffAccumulator {
    total: Mutex<f64>,
}

impl DiffAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&self, local_difference: f64) {
        let mut total =
            self.total.lock().unwrap_or_else(PoisonError::into_inner);
        *total += local_difference;
    }

    pub fn value(&self) -> f64 {
        *self.total.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reset(&self) {
        *self.total.lock().unwrap_or_else(PoisonError::into_inner) = 0.0;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConvergenceState {
    /// Sum of `|new - old|` over the cells updated by the last iteration.
    pub global_difference: f64,
    pub iteration_count: usize,
}

impl ConvergenceState {
    /// Difference averaged over every cell of the grid, boundary included.
    pub fn normalized_difference(&self, num_elements: usize) -> f64 {
        self.global_difference / num_elements as f64
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DriverState {
    Running,
    Converged,
    /// The iteration cap was reached first.
    Exhausted,
}

/// Outcome of a converged solve.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvergenceReport {
    pub method: &'static str,
    pub iterations: usize,
    /// Normalised difference of the final iteration.
    pub difference: f64,
    pub dimension: usize,
    pub threads: usize,
}

pub struct ConvergenceDriver {
    parameters: SolverParameters,
}

impl ConvergenceDriver {
    pub fn new(parameters: SolverParameters) -> Self {
        ConvergenceDriver { parameters }
    }

    pub fn parameters(&self) -> &SolverParameters {
        &self.parameters
    }

    /// Iterate `method` on `grid` until the normalised difference drops
    /// below the tolerance.
    ///
    /// Degenerate grids and zero workers are rejected before anything is
    /// launched. Hitting `max_iterations` returns
    /// `SolveError::NotConverged` and leaves the last field in `grid`.
    pub fn solve<M: RelaxationMethod + ?Sized>(
        &self,
        method: &mut M,
        grid: &mut Grid,
    ) -> Result<ConvergenceReport> {
        profiling::scope!("convergence_driver: solve");
        let partitions =
            partition_rows(grid.dimension(), self.parameters.threads)?;
        let barrier = Barrier::new(self.parameters.threads);
        let accumulator = DiffAccumulator::new();
        let context = IterationContext {
            partitions: &partitions,
            barrier: &barrier,
            accumulator: &accumulator,
        };

        let mut state = ConvergenceState::default();
        let mut driver_state = DriverState::Running;
        while driver_state == DriverState::Running {
            driver_state = self.step(method, grid, &context, &mut state)?;
        }

        let difference = state.normalized_difference(grid.num_elements());
        if driver_state == DriverState::Exhausted {
            tracing::warn!(
                method = method.name(),
                iterations = state.iteration_count,
                difference,
                "iteration cap reached"
            );
            return Err(SolveError::NotConverged {
                method: method.name(),
                iterations: state.iteration_count,
                difference,
            });
        }

        tracing::info!(
            method = method.name(),
            iterations = state.iteration_count,
            difference,
            "converged"
        );
        Ok(ConvergenceReport {
            method: method.name(),
            iterations: state.iteration_count,
            difference,
            dimension: grid.dimension(),
            threads: self.parameters.threads,
        })
    }

    fn step<M: RelaxationMethod + ?Sized>(
        &self,
        method: &mut M,
        grid: &mut Grid,
        context: &IterationContext<'_>,
        state: &mut ConvergenceState,
    ) -> Result<DriverState> {
        if state.iteration_count >= self.parameters.max_iterations {
            return Ok(DriverState::Exhausted);
        }

        profiling::scope!("convergence_driver: step");
        context.accumulator.reset();
        method.iterate(grid, context)?;
        state.global_difference = context.accumulator.value();
        state.iteration_count += 1;

        let difference = state.normalized_difference(grid.num_elements());
        tracing::debug!(
            method = method.name(),
            iteration = state.iteration_count,
            diff = state.global_difference,
            difference,
            "iteration"
        );

        if difference < self.parameters.tolerance {
            Ok(DriverState::Converged)
        } else if state.iteration_count >= self.parameters.max_iterations {
            Ok(DriverState::Exhausted)
        } else {
            Ok(DriverState::Running)
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    /// Reports a fixed sequence of differences, touching nothing.
    struct Scripted {
        differences: Vec<f64>,
        calls: usize,
    }

    impl RelaxationMethod for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn iterate(
            &mut self,
            _grid: &mut Grid,
            context: &IterationContext<'_>,
        ) -> Result<()> {
            let d = self.differences[self.calls.min(self.differences.len() - 1)];
            self.calls += 1;
            // Split across two merges like a two-phase method would
            context.accumulator.merge(d / 2.0);
            context.accumulator.merge(d / 2.0);
            Ok(())
        }
    }

    #[test]
    fn accumulator_test() {
        let accumulator = DiffAccumulator::new();
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1000 {
                        accumulator.merge(0.5);
                    }
                });
            }
        });
        assert_approx_eq!(f64, accumulator.value(), 4000.0);
        accumulator.reset();
        assert_eq!(accumulator.value(), 0.0);
    }

    #[test]
    fn converges_test() {
        // 10x10 grid, differences normalised by 100
        let mut grid = Grid::new(10).unwrap();
        let mut method = Scripted {
            differences: vec![500.0, 50.0, 5.0, 0.5],
            calls: 0,
        };
        let driver = ConvergenceDriver::new(SolverParameters::default());
        let report = driver.solve(&mut method, &mut grid).unwrap();
        assert_eq!(report.iterations, 4);
        assert_eq!(report.method, "scripted");
        assert_approx_eq!(f64, report.difference, 0.005);
        assert_eq!(report.dimension, 10);
    }

    #[test]
    fn exhausted_test() {
        let mut grid = Grid::new(10).unwrap();
        let mut method = Scripted {
            differences: vec![500.0],
            calls: 0,
        };
        let driver = ConvergenceDriver::new(SolverParameters {
            max_iterations: 7,
            ..Default::default()
        });
        match driver.solve(&mut method, &mut grid) {
            Err(SolveError::NotConverged {
                method: "scripted",
                iterations,
                difference,
            }) => {
                assert_eq!(iterations, 7);
                assert_approx_eq!(f64, difference, 5.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(method.calls, 7);
    }

    #[test]
    fn rejects_degenerate_test() {
        let mut method = Scripted {
            differences: vec![0.0],
            calls: 0,
        };
        let driver = ConvergenceDriver::new(SolverParameters::default());

        let mut small = Grid::new(2).unwrap();
        assert!(matches!(
            driver.solve(&mut method, &mut small),
            Err(SolveError::DegenerateDimension { dimension: 2 })
        ));

        let no_workers = ConvergenceDriver::new(SolverParameters {
            threads: 0,
            ..Default::default()
        });
        let mut grid = Grid::new(8).unwrap();
        assert!(matches!(
            no_workers.solve(&mut method, &mut grid),
            Err(SolveError::NoWorkers)
        ));
        assert_eq!(method.calls, 0);
    }
}
