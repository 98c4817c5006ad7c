use serde::{Serialize, Deserialize};

use crate::contour::{param_step, ContourEntry};
use crate::eval::compile_str;
use crate::math::C;

// Differentiation step as a fraction of the sample spacing.
const DERIV_STEP: f64 = 0.01;

/// Result of a numerical line integral along a sampled contour. The four
/// sequences are index-aligned and ordered by increasing parameter; only
/// samples that survived evaluation appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourIntegralResult {
    pub id: u32,
    pub t_values: Vec<f64>,
    pub curve_points: Vec<C>,
    pub integrand_values: Vec<C>,
    pub partial_sums: Vec<C>,
    pub value: C,
    pub expression: String,
    pub integrand: String,
}

/// Estimate the line integral of the entry's transform along its curve by
/// Riemann-sum quadrature: `sum += f(gamma(t)) * gamma'(t) * dt`, with
/// `gamma'` from a central difference (forward-difference fallback when a
/// shifted sample is not finite). A missing transform integrates the
/// constant 1. Returns `None` when either expression fails to parse or no
/// sample survives - "nothing computable" rather than an error.
pub fn evaluate_contour_integral(entry: &ContourEntry) -> Option<ContourIntegralResult> {
    let gamma = compile_str(&entry.expression, "t").ok()?;
    let integrand_src = match &entry.transform {
        Some(text) if !text.trim().is_empty() => text.clone(),
        _ => "1".to_string(),
    };
    let f = compile_str(&integrand_src, "z").ok()?;

    let steps = entry.samples;
    let dt = param_step(entry.t_min, entry.t_max, steps);
    let h = dt * DERIV_STEP;

    let mut t_values = Vec::new();
    let mut curve_points = Vec::new();
    let mut integrand_values = Vec::new();
    let mut partial_sums = Vec::new();
    let mut sum = C::zero();

    for step in 0..steps {
        let t = entry.t_min + step as f64 * dt;

        let point = gamma.eval_or_nan(C::new(t, 0.0));
        if !point.is_finite() {
            continue;
        }

        let ahead = gamma.eval_or_nan(C::new(t + h, 0.0));
        let behind = gamma.eval_or_nan(C::new(t - h, 0.0));
        let derivative = if ahead.is_finite() && behind.is_finite() {
            ahead.sub(behind).scale(1.0 / (2.0 * h))
        } else if ahead.is_finite() {
            ahead.sub(point).scale(1.0 / h)
        } else {
            continue;
        };

        let vector = f.eval_or_nan(point).mul(derivative);
        if !vector.is_finite() {
            continue;
        }

        sum = sum.add(vector.scale(dt));
        t_values.push(t);
        curve_points.push(point);
        integrand_values.push(vector);
        partial_sums.push(sum);
    }

    if t_values.is_empty() {
        return None;
    }

    Some(ContourIntegralResult {
        id: entry.id,
        t_values,
        curve_points,
        integrand_values,
        partial_sums,
        value: sum,
        expression: entry.expression.clone(),
        integrand: integrand_src,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn circle(transform: Option<&str>, samples: usize) -> ContourEntry {
        ContourEntry {
            id: 1,
            expression: "exp(i*t)".to_string(),
            transform: transform.map(str::to_string),
            t_min: 0.0,
            t_max: 2.0 * PI,
            samples,
            enabled: true,
            color: String::new(),
            speed: 0.0,
        }
    }

    #[test]
    fn constant_integrand_around_a_closed_loop_vanishes() {
        let result = evaluate_contour_integral(&circle(Some("1"), 2000)).unwrap();
        assert!(result.value.abs() < 1e-2);
    }

    #[test]
    fn missing_transform_defaults_to_one() {
        let explicit = evaluate_contour_integral(&circle(Some("1"), 500)).unwrap();
        let defaulted = evaluate_contour_integral(&circle(None, 500)).unwrap();
        assert!(explicit.value.sub(defaulted.value).abs() < 1e-12);
        assert_eq!(defaulted.integrand, "1");
    }

    #[test]
    fn residue_of_one_over_z() {
        // Residue theorem: the integral of dz/z around the unit circle
        // is 2*pi*i.
        let result = evaluate_contour_integral(&circle(Some("1/z"), 2000)).unwrap();
        assert!((result.value.re - 0.0).abs() < 1e-2);
        assert!((result.value.im - 2.0 * PI).abs() < 1e-2);
    }

    #[test]
    fn sequences_are_index_aligned() {
        let result = evaluate_contour_integral(&circle(Some("z"), 100)).unwrap();
        let n = result.t_values.len();
        assert!(n > 0);
        assert_eq!(result.curve_points.len(), n);
        assert_eq!(result.integrand_values.len(), n);
        assert_eq!(result.partial_sums.len(), n);

        let last = result.partial_sums[n - 1];
        assert!(last.sub(result.value).abs() < 1e-12);

        for pair in result.t_values.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn partial_sums_accumulate() {
        let result = evaluate_contour_integral(&circle(Some("1/z"), 200)).unwrap();
        let mut acc = C::zero();
        let dt = 2.0 * PI / 199.0;
        for (vector, partial) in result.integrand_values.iter().zip(result.partial_sums.iter()) {
            acc = acc.add(vector.scale(dt));
            assert!(acc.sub(*partial).abs() < 1e-9);
        }
    }

    #[test]
    fn singular_samples_are_skipped() {
        // 1/(z - 1) has a pole where the circle starts; those samples drop
        // out while the rest still accumulate.
        let result = evaluate_contour_integral(&circle(Some("1/(z-1)"), 401)).unwrap();
        assert!(result.t_values.len() < 401);
        assert!(result.value.is_finite());
    }

    #[test]
    fn unparsable_curve_is_none() {
        let mut entry = circle(Some("1"), 100);
        entry.expression = "exp(".to_string();
        assert!(evaluate_contour_integral(&entry).is_none());
    }

    #[test]
    fn nothing_computable_is_none() {
        let mut entry = circle(Some("1"), 100);
        entry.expression = "1/(t-t)".to_string();
        assert!(evaluate_contour_integral(&entry).is_none());
    }

    #[test]
    fn echoes_the_expressions() {
        let result = evaluate_contour_integral(&circle(Some("1/z"), 50)).unwrap();
        assert_eq!(result.expression, "exp(i*t)");
        assert_eq!(result.integrand, "1/z");
        assert_eq!(result.id, 1);
    }
}
