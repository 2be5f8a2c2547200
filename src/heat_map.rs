use crate::error::Result;
use crate::grid::Grid;

/// Write the grid as a PNG, row `i` becomes image row `i`.
/// Values are scaled by `upper_bound` into the TURBO gradient.
pub fn write_heat_map<F: AsRef<std::path::Path>>(
    grid: &Grid,
    upper_bound: f32,
    path: &F,
) -> Result<()> {
    profiling::scope!("heat_map: write");
    let dimension = grid.dimension() as u32;
    let gradient = colorous::TURBO;
    let mut img = image::RgbImage::new(dimension, dimension);
    for (l, value) in grid.values().iter().enumerate() {
        let (row, column) = grid.linear_to_coord(l);
        let r = (*value / upper_bound).clamp(0.0, 1.0);
        let c = gradient.eval_continuous(r as f64);
        img.put_pixel(column as u32, row as u32, image::Rgb(c.as_array()));
    }
    img.save(path)?;
    Ok(())
}
