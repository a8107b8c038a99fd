use crate::expression::{EvaluationResult, evaluate_with_variable};
use crate::settings::GraphSettings;
use log::debug;
use serde::{Deserialize, Serialize};

/// One plotted sample.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

/// Samples `expr` at `samples` evenly spaced points across `[x_min, x_max]`.
///
/// Points where the expression errors or does not parse are left out.
///
/// # Arguments
/// * `expr` - Function body in terms of `variable`, e.g. `"2x+1"`
/// * `variable` - The letter substituted at each sample
/// * `x_min`, `x_max` - Sampled range, both ends included
/// * `samples` - Number of sample points; fewer than 2 samples only `x_min`
///
/// # Examples
/// ```
/// use blockcalc::grapher::sample_curve;
///
/// let points = sample_curve("2x+1", 'x', 0.0, 4.0, 5);
/// let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
/// assert_eq!(ys, vec![1.0, 3.0, 5.0, 7.0, 9.0]);
/// ```
pub fn sample_curve(
    expr: &str,
    variable: char,
    x_min: f64,
    x_max: f64,
    samples: usize,
) -> Vec<CurvePoint> {
    sample_positions(x_min, x_max, samples)
        .into_iter()
        .filter_map(|x| match evaluate_with_variable(expr, variable, x) {
            EvaluationResult::Number(y) => Some(CurvePoint { x, y }),
            _ => None,
        })
        .collect()
}

/// Samples with the configured variable, range and sample count.
pub fn sample_with_settings(expr: &str, settings: &GraphSettings) -> Vec<CurvePoint> {
    sample_curve(
        expr,
        settings.variable,
        settings.x_min,
        settings.x_max,
        settings.samples,
    )
}

/// Samples and splits the curve wherever a sample was dropped, so a renderer
/// never draws a line across a gap such as `1/x` at zero.
pub fn sample_segments(
    expr: &str,
    variable: char,
    x_min: f64,
    x_max: f64,
    samples: usize,
) -> Vec<Vec<CurvePoint>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for x in sample_positions(x_min, x_max, samples) {
        match evaluate_with_variable(expr, variable, x) {
            EvaluationResult::Number(y) => current.push(CurvePoint { x, y }),
            _ => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    debug!("{:?}: {} segments", expr, segments.len());
    segments
}

fn sample_positions(x_min: f64, x_max: f64, samples: usize) -> Vec<f64> {
    if samples < 2 {
        return vec![x_min];
    }
    let step = (x_max - x_min) / (samples - 1) as f64;
    (0..samples)
        .map(|i| {
            if i == samples - 1 {
                x_max
            } else {
                x_min + step * i as f64
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_include_both_ends() {
        let xs = sample_positions(-1.0, 1.0, 5);
        assert_eq!(xs, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(sample_positions(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn division_by_zero_sample_dropped() {
        let points = sample_curve("1/x", 'x', -1.0, 1.0, 5);
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.x != 0.0));
    }

    #[test]
    fn gap_splits_segments() {
        let segments = sample_segments("1/x", 'x', -1.0, 1.0, 5);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1].len(), 2);
    }

    #[test]
    fn unparseable_curve_is_empty() {
        assert!(sample_curve("hello", 'x', 0.0, 1.0, 10).is_empty());
        assert!(sample_segments("x+", 'x', 0.0, 1.0, 10).is_empty());
    }

    #[test]
    fn default_settings_give_500_samples() {
        let points = sample_with_settings("x*x", &GraphSettings::default());
        assert_eq!(points.len(), 500);
        assert_eq!(points[0], CurvePoint { x: -10.0, y: 100.0 });
        assert_eq!(points[499], CurvePoint { x: 10.0, y: 100.0 });
    }
}
