use serde::{Serialize, Deserialize};

use crate::eval::{compile_str, CompiledExpr};
use crate::math::C;

/// Rectangular window of the complex plane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Region {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Region {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Region { x_min, x_max, y_min, y_max }
    }
}

/// Scalar extracted from a complex value for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    Modulus,
    Argument,
    Real,
    Imaginary,
}

impl Projection {
    /// Project a value to its display scalar. Any non-finite input or
    /// output becomes the NaN marker, never a silent zero.
    pub fn apply(&self, z: C) -> f64 {
        if !z.is_finite() {
            return f64::NAN;
        }
        let scalar = match self {
            Projection::Modulus => z.abs(),
            Projection::Argument => z.arg(),
            Projection::Real => z.re,
            Projection::Imaginary => z.im,
        };
        if scalar.is_finite() { scalar } else { f64::NAN }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainColoringConfig {
    pub expression: String,
    pub region: Region,
    pub resolution: usize,
    pub projection: Projection,
    pub color_projection: Projection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainColoringData {
    pub scalar_grid: Vec<Vec<f64>>,
    pub color_grid: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surface3DConfig {
    pub expression: String,
    pub region: Region,
    pub resolution: usize,
    pub height_projection: Projection,
    pub color_projection: Projection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surface3DData {
    pub x_axis: Vec<f64>,
    pub y_axis: Vec<f64>,
    pub height_grid: Vec<Vec<f64>>,
    pub color_grid: Vec<Vec<f64>>,
}

pub(crate) fn axis_step(min: f64, max: f64, resolution: usize) -> f64 {
    (max - min) / resolution.saturating_sub(1).max(1) as f64
}

// Row-major sampling: one evaluation per cell feeds both projections, so a
// surface never pays for a second pass over the function.
fn sample_projected(
    f: &CompiledExpr,
    region: Region,
    resolution: usize,
    first: Projection,
    second: Projection,
) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let n = resolution.max(1);
    let dx = axis_step(region.x_min, region.x_max, n);
    let dy = axis_step(region.y_min, region.y_max, n);

    let mut first_grid = Vec::with_capacity(n);
    let mut second_grid = Vec::with_capacity(n);

    for j in 0..n {
        let y = region.y_min + j as f64 * dy;
        let mut first_row = Vec::with_capacity(n);
        let mut second_row = Vec::with_capacity(n);

        for i in 0..n {
            let x = region.x_min + i as f64 * dx;
            let z = f.eval_or_nan(C::new(x, y));
            first_row.push(first.apply(z));
            second_row.push(second.apply(z));
        }

        first_grid.push(first_row);
        second_grid.push(second_row);
    }

    (first_grid, second_grid)
}

/// Sample a function over a region into a scalar grid plus a color grid.
/// Returns `None` if the expression does not parse; per-cell failures are
/// contained as NaN cells with the grid shape preserved.
pub fn evaluate_domain_coloring(config: &DomainColoringConfig) -> Option<DomainColoringData> {
    let f = compile_str(&config.expression, "z").ok()?;
    let (scalar_grid, color_grid) = sample_projected(
        &f,
        config.region,
        config.resolution,
        config.projection,
        config.color_projection,
    );
    Some(DomainColoringData { scalar_grid, color_grid })
}

/// Same sampling as domain coloring, emitting height and color grids plus
/// the axes the grids are sampled on.
pub fn evaluate_surface3d(config: &Surface3DConfig) -> Option<Surface3DData> {
    let f = compile_str(&config.expression, "z").ok()?;
    let (height_grid, color_grid) = sample_projected(
        &f,
        config.region,
        config.resolution,
        config.height_projection,
        config.color_projection,
    );

    let n = config.resolution.max(1);
    let dx = axis_step(config.region.x_min, config.region.x_max, n);
    let dy = axis_step(config.region.y_min, config.region.y_max, n);
    let x_axis = (0..n).map(|i| config.region.x_min + i as f64 * dx).collect();
    let y_axis = (0..n).map(|j| config.region.y_min + j as f64 * dy).collect();

    Some(Surface3DData { x_axis, y_axis, height_grid, color_grid })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coloring(expression: &str, region: Region, resolution: usize) -> DomainColoringConfig {
        DomainColoringConfig {
            expression: expression.to_string(),
            region,
            resolution,
            projection: Projection::Modulus,
            color_projection: Projection::Argument,
        }
    }

    #[test]
    fn grids_are_rectangular() {
        let config = coloring("z^2", Region::new(-2.0, 2.0, -2.0, 2.0), 17);
        let data = evaluate_domain_coloring(&config).unwrap();
        assert_eq!(data.scalar_grid.len(), 17);
        assert_eq!(data.color_grid.len(), 17);
        for row in data.scalar_grid.iter().chain(data.color_grid.iter()) {
            assert_eq!(row.len(), 17);
        }
    }

    #[test]
    fn modulus_at_three_four_is_five() {
        // Resolution 11 over [-5, 5] puts a cell exactly on (3, 4).
        let config = coloring("z", Region::new(-5.0, 5.0, -5.0, 5.0), 11);
        let data = evaluate_domain_coloring(&config).unwrap();
        let i = 8; // x = -5 + 8 = 3
        let j = 9; // y = -5 + 9 = 4
        assert!((data.scalar_grid[j][i] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn singular_cell_is_marked_without_spreading() {
        // 1/z over a 3x3 grid centered on the origin: only the center cell
        // hits the pole.
        let config = coloring("1/z", Region::new(-1.0, 1.0, -1.0, 1.0), 3);
        let data = evaluate_domain_coloring(&config).unwrap();

        assert!(data.scalar_grid[1][1].is_nan());
        for j in 0..3 {
            for i in 0..3 {
                if (i, j) != (1, 1) {
                    assert!(data.scalar_grid[j][i].is_finite());
                }
            }
        }
    }

    #[test]
    fn log_of_zero_is_marked() {
        let config = coloring("log(z)", Region::new(-1.0, 1.0, -1.0, 1.0), 3);
        let data = evaluate_domain_coloring(&config).unwrap();
        assert!(data.scalar_grid[1][1].is_nan());
        assert!(data.scalar_grid[0][0].is_finite());
    }

    #[test]
    fn argument_stays_in_principal_range() {
        let config = DomainColoringConfig {
            expression: "z".to_string(),
            region: Region::new(-3.0, 3.0, -3.0, 3.0),
            resolution: 7,
            projection: Projection::Argument,
            color_projection: Projection::Argument,
        };
        let data = evaluate_domain_coloring(&config).unwrap();
        for row in &data.scalar_grid {
            for &v in row {
                assert!(v > -std::f64::consts::PI - 1e-12);
                assert!(v <= std::f64::consts::PI + 1e-12);
            }
        }
    }

    #[test]
    fn unparsable_expression_aborts_the_request() {
        let config = coloring("(", Region::new(-1.0, 1.0, -1.0, 1.0), 4);
        assert!(evaluate_domain_coloring(&config).is_none());
    }

    #[test]
    fn surface_emits_axes_and_independent_projections() {
        let config = Surface3DConfig {
            expression: "z".to_string(),
            region: Region::new(0.0, 4.0, -2.0, 2.0),
            resolution: 5,
            height_projection: Projection::Real,
            color_projection: Projection::Imaginary,
        };
        let data = evaluate_surface3d(&config).unwrap();

        assert_eq!(data.x_axis, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(data.y_axis, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        // height = Re(z) = x, color = Im(z) = y, row-major.
        for (j, row) in data.height_grid.iter().enumerate() {
            for (i, &h) in row.iter().enumerate() {
                assert!((h - data.x_axis[i]).abs() < 1e-12);
                assert!((data.color_grid[j][i] - data.y_axis[j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn resolution_one_collapses_to_the_lower_corner() {
        let config = coloring("z", Region::new(2.0, 6.0, 3.0, 9.0), 1);
        let data = evaluate_domain_coloring(&config).unwrap();
        assert_eq!(data.scalar_grid.len(), 1);
        assert_eq!(data.scalar_grid[0].len(), 1);
        let expected = (2.0f64 * 2.0 + 3.0 * 3.0).sqrt();
        assert!((data.scalar_grid[0][0] - expected).abs() < 1e-12);
    }

    #[test]
    fn projection_selectors_serialize_lowercase() {
        let text = serde_json::to_string(&Projection::Modulus).unwrap();
        assert_eq!(text, "\"modulus\"");
        let back: Projection = serde_json::from_str("\"imaginary\"").unwrap();
        assert_eq!(back, Projection::Imaginary);
    }

    #[test]
    fn sampling_is_idempotent() {
        let config = coloring("sin(z)/z", Region::new(-2.0, 2.0, -2.0, 2.0), 9);
        let a = evaluate_domain_coloring(&config).unwrap();
        let b = evaluate_domain_coloring(&config).unwrap();
        for (ra, rb) in a.scalar_grid.iter().zip(b.scalar_grid.iter()) {
            for (va, vb) in ra.iter().zip(rb.iter()) {
                assert!(va.to_bits() == vb.to_bits());
            }
        }
    }
}
