//! Grid Initialization
//!
//! Utilities for seeding a grid before a solve.
//! Use `Grid::par_set_values` for custom needs.

use crate::grid::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;

/// Fill with uniform values in `[0, upper_bound]`, boundary included.
///
/// Each chunk draws from its own generator seeded by `seed` and the chunk
/// index, so a seed and chunk size give the same grid regardless of
/// thread count.
pub fn rand(grid: &mut Grid, upper_bound: f32, seed: u64, chunk_size: usize) {
    let chunk_size = chunk_size.max(1);
    grid.values_mut()
        .par_chunks_mut(chunk_size)
        .enumerate()
        .for_each(|(chunk_index, chunk): (usize, &mut [f32])| {
            let chunk_seed = (chunk_index as u64)
                .wrapping_mul(0x9E37_79B9_7F4A_7C15)
                .wrapping_add(seed);
            let mut rng = StdRng::seed_from_u64(chunk_seed);
            for value in chunk {
                *value = rng.gen_range(0.0..=upper_bound);
            }
        });
}

/// Sets each cell to the same value.
pub fn constant(grid: &mut Grid, value: f32, chunk_size: usize) {
    grid.par_set_values(|_, _| value, chunk_size);
}
