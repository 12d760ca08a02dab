//! Label angles fitted to the local path direction.

use contour_common::Point;

use super::config::AngleMode;
use super::policy::Candidate;

/// Half-width used when none is configured: grows slowly with point count.
pub fn auto_half_width(n_points: usize) -> usize {
    let w = (n_points as f64 / 3.0).log10().powi(2).round();
    (w as usize).max(1)
}

/// Direction of travel at a candidate, in degrees within (-180, 180].
///
/// A straight line is fitted to the vertices within `half_width` of the
/// candidate's segment using the principal axis of their spread, then
/// pointed along the path.
pub(crate) fn line_angle(path: &[Point], c: &Candidate, half_width: usize) -> f64 {
    let n = path.len();
    let (mut start, mut stop) = if c.fraction > 0.0 {
        (c.segment, (c.segment + 1).min(n - 1))
    } else {
        (c.segment, c.segment)
    };
    if start == stop {
        start = start.saturating_sub(1);
        stop = (stop + 1).min(n - 1);
    }
    let first = start.saturating_sub(half_width);
    let last = (stop + half_width).min(n - 1);
    let window = &path[first..=last];

    let m = window.len() as f64;
    let (mx, my) = window
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x / m, sy + p.y / m));
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for p in window {
        let (dx, dy) = (p.x - mx, p.y - my);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    let axis = 0.5 * (2.0 * sxy).atan2(sxx - syy);
    let (ax, ay) = (axis.cos(), axis.sin());

    let (a, b) = (path[first], path[last]);
    let along = (b.x - a.x) * ax + (b.y - a.y) * ay;
    let degrees = axis.to_degrees();
    if along < 0.0 {
        wrap_half_turn(degrees + 180.0)
    } else {
        degrees
    }
}

fn wrap_half_turn(degrees: f64) -> f64 {
    if degrees > 180.0 {
        degrees - 360.0
    } else if degrees <= -180.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

/// Fold an angle into [-90, 90] so text never reads upside down.
pub fn fold_upright(degrees: f64) -> f64 {
    let a = wrap_half_turn(degrees);
    if a > 90.0 {
        a - 180.0
    } else if a < -90.0 {
        a + 180.0
    } else {
        a
    }
}

/// Angle at which the annotation is drawn.
pub(crate) fn annotation_angle(mode: AngleMode, line_angle: f64) -> f64 {
    match mode {
        AngleMode::AlongLine => fold_upright(line_angle),
        AngleMode::Normal => fold_upright(line_angle + 90.0),
        AngleMode::Fixed { degrees } => degrees,
    }
}
