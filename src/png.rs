use image::{Rgb, RgbImage};
use std::path::Path;

use crate::eval::compile_str;
use crate::grid::Region;
use crate::math::C;
use crate::visualizer::domain_color;

/// Render a domain-coloring plot of `expression` over `region` and save it
/// as a PNG of `size` x `size` pixels.
pub fn export_png<P: AsRef<Path>>(
    path: P,
    expression: &str,
    region: Region,
    size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let compiled = compile_str(expression, "z")?;

    let side = size.max(1);
    let dx = (region.x_max - region.x_min) / side as f64;
    let dy = (region.y_max - region.y_min) / side as f64;

    let mut img = RgbImage::new(side, side);
    for py in 0..side {
        let y = region.y_max - py as f64 * dy;
        for px in 0..side {
            let x = region.x_min + px as f64 * dx;
            let z = compiled.eval_or_nan(C::new(x, y));
            let (r, g, b) = domain_color(z);
            img.put_pixel(px, py, Rgb([r, g, b]));
        }
    }

    img.save(path)?;
    Ok(())
}
