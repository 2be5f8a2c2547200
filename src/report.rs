//! Summaries of converged grids.

use crate::error::{Result, SolveError};
use crate::grid::Grid;
use rayon::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridStatistics {
    pub min: f32,
    pub max: f32,
    pub average: f64,
}

impl GridStatistics {
    /// Min, max and average over every cell, boundary included.
    pub fn compute(grid: &Grid, chunk_size: usize) -> Self {
        profiling::scope!("report: statistics");
        let (min, max, sum) = grid
            .values()
            .par_chunks(chunk_size.max(1))
            .map(|chunk| {
                chunk.iter().fold(
                    (f32::INFINITY, f32::NEG_INFINITY, 0.0f64),
                    |(min, max, sum), &v| (min.min(v), max.max(v), sum + v as f64),
                )
            })
            .reduce(
                || (f32::INFINITY, f32::NEG_INFINITY, 0.0),
                |a, b| (a.0.min(b.0), a.1.max(b.1), a.2 + b.2),
            );
        GridStatistics {
            min,
            max,
            average: sum / grid.num_elements() as f64,
        }
    }
}

impl std::fmt::Display for GridStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "AVG: {:.6}", self.average)?;
        writeln!(f, "MIN: {:.6}", self.min)?;
        write!(f, "MAX: {:.6}", self.max)
    }
}

/// Mean of `|a - b|` over every cell.
pub fn average_difference(a: &Grid, b: &Grid, chunk_size: usize) -> Result<f64> {
    if a.dimension() != b.dimension() {
        return Err(SolveError::DimensionMismatch {
            left: a.dimension(),
            right: b.dimension(),
        });
    }
    profiling::scope!("report: difference");
    let chunk_size = chunk_size.max(1);
    let total: f64 = a
        .values()
        .par_chunks(chunk_size)
        .zip(b.values().par_chunks(chunk_size))
        .map(|(a_chunk, b_chunk)| {
            a_chunk
                .iter()
                .zip(b_chunk)
                .map(|(x, y)| (x - y).abs() as f64)
                .sum::<f64>()
        })
        .sum();
    Ok(total / a.num_elements() as f64)
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn statistics_test() {
        let values = vec![3.0, -1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0];
        let grid = Grid::from_values(3, values).unwrap();
        for chunk_size in [1, 2, 4, 100] {
            let stats = GridStatistics::compute(&grid, chunk_size);
            assert_eq!(stats.min, -1.0);
            assert_eq!(stats.max, 9.0);
            assert_approx_eq!(f64, stats.average, 34.0 / 9.0);
        }
    }

    #[test]
    fn display_test() {
        let grid = Grid::from_values(2, vec![0.0, 1.0, 2.0, 5.0]).unwrap();
        let text = GridStatistics::compute(&grid, 2).to_string();
        assert_eq!(text, "AVG: 2.000000\nMIN: 0.000000\nMAX: 5.000000");
    }

    #[test]
    fn average_difference_test() {
        let a = Grid::from_values(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Grid::from_values(2, vec![1.0, 0.0, 4.0, 4.0]).unwrap();
        assert_approx_eq!(f64, average_difference(&a, &b, 3).unwrap(), 0.75);
        assert_approx_eq!(f64, average_difference(&a, &a, 1).unwrap(), 0.0);

        let c = Grid::new(3).unwrap();
        assert!(matches!(
            average_difference(&a, &c, 1),
            Err(SolveError::DimensionMismatch { left: 2, right: 3 })
        ));
    }
}
