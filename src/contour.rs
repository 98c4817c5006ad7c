use serde::{Serialize, Deserialize};

use crate::eval::compile_str;
use crate::math::C;

fn default_enabled() -> bool {
    true
}

/// One contour in a plot configuration. The core consumes id, the two
/// expression strings, the parameter interval and the sample count;
/// `color` and `speed` are pass-through display metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourEntry {
    pub id: u32,
    pub expression: String,
    #[serde(default)]
    pub transform: Option<String>,
    pub t_min: f64,
    pub t_max: f64,
    pub samples: usize,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourConfig {
    pub contours: Vec<ContourEntry>,
}

/// Sampled curve. `points` can be shorter than the requested sample count:
/// non-finite samples are dropped, so positions do not map back to
/// parameter values without recomputing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourData {
    pub id: u32,
    pub points: Vec<C>,
    pub t_min: f64,
    pub t_max: f64,
    pub color: String,
    pub speed: f64,
}

pub(crate) fn param_step(t_min: f64, t_max: f64, steps: usize) -> f64 {
    (t_max - t_min) / steps.saturating_sub(1).max(1) as f64
}

/// Sample `curve` (free variable `t`) over `[t_min, t_max]`, both endpoints
/// included, optionally post-composing with `transform` (free variable `z`).
///
/// A curve that fails to parse yields the empty sequence; a transform that
/// fails to parse is ignored so the raw curve still renders while the
/// transform is being typed.
pub fn sample_contour(
    curve: &str,
    transform: Option<&str>,
    t_min: f64,
    t_max: f64,
    steps: usize,
) -> Vec<C> {
    let gamma = match compile_str(curve, "t") {
        Ok(compiled) => compiled,
        Err(_) => return Vec::new(),
    };
    let post = transform.and_then(|text| compile_str(text, "z").ok());

    let dt = param_step(t_min, t_max, steps);
    let mut points = Vec::with_capacity(steps);

    for step in 0..steps {
        let t = t_min + step as f64 * dt;
        let mut z = gamma.eval_or_nan(C::new(t, 0.0));
        if let Some(f) = &post {
            z = f.eval_or_nan(z);
        }
        if z.is_finite() {
            points.push(z);
        }
    }

    points
}

/// Sample every enabled, non-empty contour of a configuration.
pub fn evaluate_contours(config: &ContourConfig) -> Vec<ContourData> {
    config
        .contours
        .iter()
        .filter(|entry| entry.enabled && !entry.expression.trim().is_empty())
        .map(|entry| ContourData {
            id: entry.id,
            points: sample_contour(
                &entry.expression,
                entry.transform.as_deref(),
                entry.t_min,
                entry.t_max,
                entry.samples,
            ),
            t_min: entry.t_min,
            t_max: entry.t_max,
            color: entry.color.clone(),
            speed: entry.speed,
        })
        .collect()
}
