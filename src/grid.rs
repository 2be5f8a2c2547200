//! The scalar field being relaxed.
//!
//! A grid is a dense square of `f32` values stored row-major.
//! Solvers mutate it in place, but never touch the outermost rows
//! and columns, which hold the fixed boundary values.

use crate::error::{Result, SolveError};
use rayon::prelude::*;

/// Default edge length of the square grid.
pub const GRID_DIMENSION: usize = 8192;

/// The largest value the grid factory will produce.
pub const UPPER_BOUND_ON_GRID_VALUE: f32 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    dimension: usize,
    values: Vec<f32>,
}

impl Grid {
    /// Create a zero filled grid of `dimension x dimension` cells.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(SolveError::InvalidDimension);
        }
        Ok(Grid {
            dimension,
            values: vec![0.0; dimension * dimension],
        })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_values(dimension: usize, values: Vec<f32>) -> Result<Self> {
        if dimension == 0 {
            return Err(SolveError::InvalidDimension);
        }
        if values.len() != dimension * dimension {
            return Err(SolveError::BufferSize {
                dimension,
                len: values.len(),
            });
        }
        Ok(Grid { dimension, values })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Total number of cells, boundary included.
    #[inline]
    pub fn num_elements(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Return the linear index for `(row, column)`.
    #[inline]
    pub fn coord_to_linear(&self, row: usize, column: usize) -> usize {
        debug_assert!(row < self.dimension && column < self.dimension);
        row * self.dimension + column
    }

    /// Return `(row, column)` for a linear index.
    #[inline]
    pub fn linear_to_coord(&self, index: usize) -> (usize, usize) {
        (index / self.dimension, index % self.dimension)
    }

    #[track_caller]
    pub fn get(&self, row: usize, column: usize) -> f32 {
        self.values[self.coord_to_linear(row, column)]
    }

    #[track_caller]
    pub fn set(&mut self, row: usize, column: usize, value: f32) {
        let index = self.coord_to_linear(row, column);
        self.values[index] = value;
    }

    /// Whether the cell is on the fixed outer ring.
    pub fn is_boundary(&self, row: usize, column: usize) -> bool {
        let last = self.dimension - 1;
        row == 0 || column == 0 || row == last || column == last
    }

    /// Iterate over the linear indices of every boundary cell.
    pub fn boundary_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_elements()).filter(move |&index| {
            let (row, column) = self.linear_to_coord(index);
            self.is_boundary(row, column)
        })
    }

    /// Set every cell from its coordinate.
    /// `chunk_size` breaks the work into tasks for multi-threading.
    pub fn par_set_values<F>(&mut self, f: F, chunk_size: usize)
    where
        F: Fn(usize, usize) -> f32 + Send + Sync,
    {
        let dimension = self.dimension;
        let chunk_size = chunk_size.max(1);
        self.values
            .par_chunks_mut(chunk_size)
            .enumerate()
            .for_each(|(chunk_index, chunk): (usize, &mut [f32])| {
                let offset = chunk_index * chunk_size;
                for (i, value) in chunk.iter_mut().enumerate() {
                    let linear_index = offset + i;
                    *value =
                        f(linear_index / dimension, linear_index % dimension);
                }
            });
    }
}
