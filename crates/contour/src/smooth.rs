//! Resampling contours along their arc length.
//!
//! Original vertices are kept exactly; new points in between are clamped
//! to the box of their two bracketing originals so a spline cannot
//! overshoot into a neighbouring cell.

use contour_common::{Point, Result};
use serde::{Deserialize, Serialize};

use crate::interp::{self, Method};
use crate::walker::is_seam_jump;

/// Smoothing of traced contours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Upsampling factor; 0 disables smoothing
    pub factor: usize,
    /// Interpolant, None disables smoothing
    pub method: Option<Method>,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            factor: 0,
            method: Some(Method::Linear),
        }
    }
}

impl SmoothingConfig {
    pub fn new(factor: usize, method: Method) -> Self {
        Self {
            factor,
            method: Some(method),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.factor > 0 && self.method.is_some()
    }
}

/// Smooth a polyline.
///
/// Runs separated by a 360° seam jump are smoothed on their
/// own and the jump is kept. Runs with fewer than four distinct points
/// are returned deduplicated but otherwise untouched.
pub fn smooth_path(points: &[Point], config: &SmoothingConfig) -> Result<Vec<Point>> {
    let method = match config.method {
        Some(m) if config.factor > 0 => m,
        _ => return Ok(points.to_vec()),
    };

    let mut out = Vec::new();
    out.try_reserve(points.len() * config.factor)?;
    let mut start = 0;
    for i in 1..=points.len() {
        if i == points.len() || is_seam_jump(&points[i - 1], &points[i]) {
            let run = dedup(&points[start..i]);
            if run.len() < 4 {
                out.extend_from_slice(&run);
            } else {
                out.extend(resample(&run, config.factor, method)?);
            }
            start = i;
        }
    }
    Ok(out)
}

/// Drop points that do not advance the cumulative arc length.
fn dedup(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for p in points {
        match out.last() {
            None => out.push(*p),
            Some(q) => {
                let next = total + q.distance(p);
                if next > total {
                    total = next;
                    out.push(*p);
                }
            }
        }
    }
    out
}

fn resample(run: &[Point], factor: usize, method: Method) -> Result<Vec<Point>> {
    let n = run.len();
    let mut knots = Vec::with_capacity(n);
    let mut total = 0.0;
    knots.push(0.0);
    for w in run.windows(2) {
        total += w[0].distance(&w[1]);
        knots.push(total);
    }

    // Equidistant targets merged with the original knots; Some(j) marks
    // original vertex j.
    let n_even = factor * n - 1;
    let step = total / (n_even - 1) as f64;
    let mut targets: Vec<(f64, Option<usize>)> = Vec::new();
    targets.try_reserve(n_even + n)?;
    let mut j = 0;
    for k in 0..n_even {
        let t = if k + 1 == n_even { total } else { k as f64 * step };
        while j < n && knots[j] <= t {
            targets.push((knots[j], Some(j)));
            j += 1;
        }
        if targets.last().map_or(true, |&(last, _)| last < t) {
            targets.push((t, None));
        }
    }
    targets.extend((j..n).map(|j| (knots[j], Some(j))));

    let u: Vec<f64> = targets.iter().map(|&(t, _)| t).collect();
    let xs: Vec<f64> = run.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = run.iter().map(|p| p.y).collect();
    let ix = interp::interpolate(method, &knots, &xs, &u)?;
    let iy = interp::interpolate(method, &knots, &ys, &u)?;

    let mut out = Vec::with_capacity(targets.len());
    let mut previous = 0;
    for (k, &(_, original)) in targets.iter().enumerate() {
        if let Some(j) = original {
            out.push(run[j]);
            previous = j;
            continue;
        }
        let (a, b) = (run[previous], run[(previous + 1).min(n - 1)]);
        out.push(Point::new(
            ix[k].clamp(a.x.min(b.x), a.x.max(b.x)),
            iy[k].clamp(a.y.min(b.y), a.y.max(b.y)),
        ));
    }
    Ok(out)
}
