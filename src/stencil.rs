/// For linear stencils, we can extract the weight for a neighbor
/// by passing in 1.0 for that neighbor and 0.0 for the others.
pub fn extract_weights<
    const NEIGHBORHOOD_SIZE: usize,
    F: Fn(&[f32; NEIGHBORHOOD_SIZE]) -> f32,
>(
    f: F,
) -> [f32; NEIGHBORHOOD_SIZE] {
    let mut weights = [0.0; NEIGHBORHOOD_SIZE];
    let mut arg_buffer = [0.0; NEIGHBORHOOD_SIZE];
    for n in 0..NEIGHBORHOOD_SIZE {
        arg_buffer[n] = 1.0;
        weights[n] = f(&arg_buffer);
        arg_buffer[n] = 0.0;
    }
    weights
}

/// Linear 2D stencil, a combination of `[row, column]` neighbor offsets
/// and weights.
#[derive(Clone, Debug, PartialEq)]
pub struct Stencil<const NEIGHBORHOOD_SIZE: usize> {
    weights: [f32; NEIGHBORHOOD_SIZE],
    offsets: [[i32; 2]; NEIGHBORHOOD_SIZE],
}

impl<const NEIGHBORHOOD_SIZE: usize> Stencil<NEIGHBORHOOD_SIZE> {
    pub fn new<F: Fn(&[f32; NEIGHBORHOOD_SIZE]) -> f32>(
        offsets: [[i32; 2]; NEIGHBORHOOD_SIZE],
        operation: F,
    ) -> Self {
        Stencil {
            weights: extract_weights(operation),
            offsets,
        }
    }

    pub fn weights(&self) -> &[f32; NEIGHBORHOOD_SIZE] {
        &self.weights
    }

    pub fn offsets(&self) -> &[[i32; 2]; NEIGHBORHOOD_SIZE] {
        &self.offsets
    }

    /// Largest distance any offset reaches along either axis.
    pub fn reach(&self) -> usize {
        self.offsets
            .iter()
            .flat_map(|o| o.iter())
            .map(|d| d.unsigned_abs() as usize)
            .max()
            .unwrap_or(0)
    }

    /// Offsets converted to linear buffer offsets for a row-major
    /// square grid with edge length `dimension`.
    pub fn linear_offsets(&self, dimension: usize) -> [isize; NEIGHBORHOOD_SIZE] {
        self.offsets
            .map(|[row, column]| row as isize * dimension as isize + column as isize)
    }

    #[inline]
    pub fn apply(&self, args: &[f32; NEIGHBORHOOD_SIZE]) -> f32 {
        let mut result = 0.0;
        for n in 0..NEIGHBORHOOD_SIZE {
            result += self.weights[n] * args[n];
        }
        result
    }
}

/// Weight every cell of the five point neighborhood gets.
pub const FIVE_POINT_WEIGHT: f32 = 0.2;

/// Average of a cell and its four orthogonal neighbors.
/// Argument order is center, north, south, east, west.
pub fn five_point() -> Stencil<5> {
    Stencil::new(
        [[0, 0], [-1, 0], [1, 0], [0, 1], [0, -1]],
        |args: &[f32; 5]| {
            FIVE_POINT_WEIGHT * (args[0] + args[1] + args[2] + args[3] + args[4])
        },
    )
}
