use crate::grid::Grid;
use std::sync::atomic::{AtomicU32, Ordering};

const _: () = assert!(
    std::mem::size_of::<AtomicU32>() == std::mem::size_of::<f32>()
        && std::mem::align_of::<AtomicU32>() == std::mem::align_of::<f32>()
);

/// A `Sync` view of a grid's cells for the duration of one iteration.
///
/// Workers only write their own rows, but may read rows a neighbor is
/// writing in the same pass. Every access is a relaxed atomic, so those
/// reads are defined and see either the old or the new value. Ordering
/// between phases comes from the barrier and from joining the workers.
pub struct SharedField<'a> {
    dimension: usize,
    cells: &'a [AtomicU32],
}

impl<'a> SharedField<'a> {
    pub fn new(grid: &'a mut Grid) -> Self {
        let dimension = grid.dimension();
        let values: &'a mut [f32] = grid.values_mut();
        // SAFETY: `AtomicU32` has the same size and alignment as `f32`
        // (checked above) and any bit pattern is valid for both. The
        // exclusive borrow of the grid is held for `'a`, so no other
        // non-atomic access can alias these cells.
        let cells = unsafe {
            std::slice::from_raw_parts(
                values.as_mut_ptr() as *const AtomicU32,
                values.len(),
            )
        };
        SharedField { dimension, cells }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn load(&self, index: usize) -> f32 {
        f32::from_bits(self.cells[index].load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, index: usize, value: f32) {
        self.cells[index].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Load the neighborhood of `index` described by linear `offsets`.
    #[inline]
    pub fn gather<const NEIGHBORHOOD_SIZE: usize>(
        &self,
        index: usize,
        offsets: &[isize; NEIGHBORHOOD_SIZE],
    ) -> [f32; NEIGHBORHOOD_SIZE] {
        offsets.map(|offset| self.load(index.wrapping_add_signed(offset)))
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn load_store_test() {
        let values = (0..16).map(|v| v as f32).collect();
        let mut grid = Grid::from_values(4, values).unwrap();
        {
            let field = SharedField::new(&mut grid);
            assert_eq!(field.dimension(), 4);
            assert_eq!(field.load(5), 5.0);
            field.store(5, -2.5);
            assert_eq!(field.load(5), -2.5);
            assert_eq!(
                field.gather(5, &[0, -4, 4, 1, -1]),
                [-2.5, 1.0, 9.0, 6.0, 4.0]
            );
        }
        assert_eq!(grid.get(1, 1), -2.5);
    }

    #[test]
    fn disjoint_writers_test() {
        let mut grid = Grid::new(8).unwrap();
        {
            let field = SharedField::new(&mut grid);
            let field = &field;
            std::thread::scope(|s| {
                for row in 0..8 {
                    s.spawn(move || {
                        for column in 0..8 {
                            field.store(row * 8 + column, row as f32);
                        }
                    });
                }
            });
        }
        for row in 0..8 {
            for column in 0..8 {
                assert_eq!(grid.get(row, column), row as f32);
            }
        }
    }
}
