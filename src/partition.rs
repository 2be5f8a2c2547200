//! Row partitioning shared by every parallel solver.

use crate::error::{Result, SolveError};
use std::ops::Range;

/// The rows one worker is responsible for updating.
/// `row_end` is exclusive.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Partition {
    pub worker_index: usize,
    pub row_start: usize,
    pub row_end: usize,
}

impl Partition {
    pub fn rows(&self) -> Range<usize> {
        self.row_start..self.row_end
    }

    pub fn len(&self) -> usize {
        self.row_end - self.row_start
    }

    pub fn is_empty(&self) -> bool {
        self.row_start == self.row_end
    }
}

/// Check that `dimension` and `workers` describe a grid with interior
/// rows to hand out.
pub fn validate(dimension: usize, workers: usize) -> Result<()> {
    if dimension < 3 {
        return Err(SolveError::DegenerateDimension { dimension });
    }
    if workers == 0 {
        return Err(SolveError::NoWorkers);
    }
    Ok(())
}

/// Split the interior rows `[1, dimension - 1)` into `workers` contiguous
/// ranges with floor-division boundaries.
///
/// Ranges differ in size by at most one row. When there are more workers
/// than interior rows, the trailing partitions come back empty.
pub fn partition_rows(dimension: usize, workers: usize) -> Result<Vec<Partition>> {
    validate(dimension, workers)?;
    let interior = dimension - 2;
    Ok((0..workers)
        .map(|worker_index| Partition {
            worker_index,
            row_start: 1 + interior * worker_index / workers,
            row_end: 1 + interior * (worker_index + 1) / workers,
        })
        .collect())
}

/// Split a `dimension x dimension` buffer into one mutable slice per
/// partition, each covering exactly that partition's rows.
pub fn split_rows_mut<'a>(
    buffer: &'a mut [f32],
    dimension: usize,
    partitions: &[Partition],
) -> Vec<&'a mut [f32]> {
    debug_assert_eq!(buffer.len(), dimension * dimension);
    let mut result = Vec::with_capacity(partitions.len());
    let first_row = partitions.first().map_or(0, |p| p.row_start);
    let (_, mut rest) = buffer.split_at_mut(first_row * dimension);
    for p in partitions {
        let (rows, tail) = rest.split_at_mut(p.len() * dimension);
        result.push(rows);
        rest = tail;
    }
    result
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn check_cover(dimension: usize, workers: usize) {
        let partitions = partition_rows(dimension, workers).unwrap();
        assert_eq!(partitions.len(), workers);

        let mut next_row = 1;
        for (i, p) in partitions.iter().enumerate() {
            assert_eq!(p.worker_index, i);
            assert_eq!(p.row_start, next_row, "gap or overlap at worker {i}");
            assert!(p.row_end >= p.row_start);
            next_row = p.row_end;
        }
        assert_eq!(next_row, dimension - 1);

        let min = partitions.iter().map(Partition::len).min().unwrap();
        let max = partitions.iter().map(Partition::len).max().unwrap();
        assert!(max - min <= 1, "{dimension}/{workers}: {min}..{max}");
    }

    #[test]
    fn cover_test() {
        for dimension in 3..40 {
            for workers in 1..12 {
                check_cover(dimension, workers);
            }
        }
        check_cover(8192, 2);
        check_cover(8192, 7);
    }

    #[test]
    fn uneven_test() {
        // 10 interior rows over 3 workers
        let partitions = partition_rows(12, 3).unwrap();
        let ranges: Vec<_> = partitions.iter().map(|p| p.rows()).collect();
        assert_eq!(ranges, vec![1..4, 4..7, 7..11]);
    }

    #[test]
    fn more_workers_than_rows_test() {
        let partitions = partition_rows(4, 5).unwrap();
        let owned: usize = partitions.iter().map(Partition::len).sum();
        assert_eq!(owned, 2);
        assert_eq!(partitions.iter().filter(|p| p.is_empty()).count(), 3);
    }

    #[test]
    fn degenerate_test() {
        assert!(matches!(
            partition_rows(2, 1),
            Err(SolveError::DegenerateDimension { dimension: 2 })
        ));
        assert!(matches!(partition_rows(10, 0), Err(SolveError::NoWorkers)));
    }

    #[test]
    fn split_rows_mut_test() {
        let dimension = 6;
        let partitions = partition_rows(dimension, 3).unwrap();
        let mut buffer: Vec<f32> =
            (0..dimension * dimension).map(|v| v as f32).collect();
        let slices = split_rows_mut(&mut buffer, dimension, &partitions);
        assert_eq!(slices.len(), 3);
        for (p, slice) in partitions.iter().zip(slices.iter()) {
            assert_eq!(slice.len(), p.len() * dimension);
            if !p.is_empty() {
                assert_eq!(slice[0], (p.row_start * dimension) as f32);
            }
        }
    }
}
