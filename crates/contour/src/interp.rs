//! One-dimensional interpolation of y(x) at a set of targets.
//!
//! Knots must be strictly increasing. Targets outside the knot range are
//! extrapolated from the end intervals.

use contour_common::{ContourError, Result};
use serde::{Deserialize, Serialize};

/// Interpolant used to resample a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    #[default]
    Linear,
    /// Akima's spline, resistant to wiggles near outliers
    Akima,
    /// Cubic spline with zero curvature at both ends
    NaturalCubic,
    Nearest,
}

impl Method {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" | "l" => Some(Method::Linear),
            "akima" | "a" => Some(Method::Akima),
            "cubic" | "natural_cubic" | "c" => Some(Method::NaturalCubic),
            "nearest" | "n" => Some(Method::Nearest),
            _ => None,
        }
    }

    /// Minimum number of knots the method needs.
    pub fn min_knots(&self) -> usize {
        match self {
            Method::Linear | Method::Nearest => 2,
            Method::Akima | Method::NaturalCubic => 4,
        }
    }
}

/// Interpolate `y(x)` at every value of `u`.
pub fn interpolate(method: Method, x: &[f64], y: &[f64], u: &[f64]) -> Result<Vec<f64>> {
    check_knots(x, y, method.min_knots())?;
    let values = match method {
        Method::Linear => u.iter().map(|&t| linear_at(x, y, t)).collect(),
        Method::Nearest => u.iter().map(|&t| nearest_at(x, y, t)).collect(),
        Method::Akima => {
            let slopes = akima_slopes(x, y);
            u.iter().map(|&t| hermite_at(x, y, &slopes, t)).collect()
        }
        Method::NaturalCubic => {
            let curvature = natural_cubic_curvature(x, y);
            u.iter().map(|&t| cubic_at(x, y, &curvature, t)).collect()
        }
    };
    Ok(values)
}

fn check_knots(x: &[f64], y: &[f64], min: usize) -> Result<()> {
    if x.len() != y.len() {
        return Err(ContourError::degenerate(format!(
            "{} knots but {} values",
            x.len(),
            y.len()
        )));
    }
    if x.len() < min {
        return Err(ContourError::degenerate(format!(
            "need at least {min} knots, got {}",
            x.len()
        )));
    }
    if x.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(ContourError::degenerate("knots are not strictly increasing"));
    }
    Ok(())
}

/// Index of the interval [x[j], x[j+1]] used for `t`.
fn interval(x: &[f64], t: f64) -> usize {
    x.partition_point(|&xi| xi <= t)
        .saturating_sub(1)
        .min(x.len() - 2)
}

fn linear_at(x: &[f64], y: &[f64], t: f64) -> f64 {
    let j = interval(x, t);
    y[j] + (y[j + 1] - y[j]) * (t - x[j]) / (x[j + 1] - x[j])
}

fn nearest_at(x: &[f64], y: &[f64], t: f64) -> f64 {
    let j = interval(x, t);
    if t - x[j] <= x[j + 1] - t {
        y[j]
    } else {
        y[j + 1]
    }
}

/// Node slopes for Akima's spline.
fn akima_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    // Interval slopes with two extrapolated values on each side; m[k + 2]
    // is the slope of interval k.
    let mut m = vec![0.0; n + 3];
    for k in 0..n - 1 {
        m[k + 2] = (y[k + 1] - y[k]) / (x[k + 1] - x[k]);
    }
    m[1] = 2.0 * m[2] - m[3];
    m[0] = 2.0 * m[1] - m[2];
    m[n + 1] = 2.0 * m[n] - m[n - 1];
    m[n + 2] = 2.0 * m[n + 1] - m[n];

    (0..n)
        .map(|i| {
            let w_left = (m[i + 3] - m[i + 2]).abs();
            let w_right = (m[i + 1] - m[i]).abs();
            if w_left + w_right == 0.0 {
                0.5 * (m[i + 1] + m[i + 2])
            } else {
                (w_left * m[i + 1] + w_right * m[i + 2]) / (w_left + w_right)
            }
        })
        .collect()
}

fn hermite_at(x: &[f64], y: &[f64], slopes: &[f64], t: f64) -> f64 {
    let j = interval(x, t);
    let h = x[j + 1] - x[j];
    let secant = (y[j + 1] - y[j]) / h;
    let c2 = (3.0 * secant - 2.0 * slopes[j] - slopes[j + 1]) / h;
    let c3 = (slopes[j] + slopes[j + 1] - 2.0 * secant) / (h * h);
    let d = t - x[j];
    y[j] + d * (slopes[j] + d * (c2 + d * c3))
}

/// Second derivatives of the natural cubic spline through the knots.
fn natural_cubic_curvature(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut y2 = vec![0.0; n];
    let mut work = vec![0.0; n];
    for i in 1..n - 1 {
        let sig = (x[i] - x[i - 1]) / (x[i + 1] - x[i - 1]);
        let p = sig * y2[i - 1] + 2.0;
        y2[i] = (sig - 1.0) / p;
        let dd = (y[i + 1] - y[i]) / (x[i + 1] - x[i]) - (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
        work[i] = (6.0 * dd / (x[i + 1] - x[i - 1]) - sig * work[i - 1]) / p;
    }
    y2[n - 1] = 0.0;
    for k in (0..n - 1).rev() {
        y2[k] = y2[k] * y2[k + 1] + work[k];
    }
    y2
}

fn cubic_at(x: &[f64], y: &[f64], y2: &[f64], t: f64) -> f64 {
    let j = interval(x, t);
    let h = x[j + 1] - x[j];
    let a = (x[j + 1] - t) / h;
    let b = (t - x[j]) / h;
    a * y[j] + b * y[j + 1] + ((a * a * a - a) * y2[j] + (b * b * b - b) * y2[j + 1]) * h * h / 6.0
}
