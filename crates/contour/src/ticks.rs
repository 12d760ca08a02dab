//! Ticks on innermost closed contours.
//!
//! A closed contour is innermost when no other closed contour, of any
//! level, lies inside it. Such a ring surrounds a single local high or low,
//! found by sampling a grid node inside it. Ticks are short strokes spread
//! evenly along the ring that point downhill: outwards around a high,
//! inwards around a low.

use contour_common::{BoundingBox, Grid, Point};
use serde::{Deserialize, Serialize};

/// What an innermost ring encloses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extremum {
    High,
    Low,
}

/// Ticking of innermost closed contours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Distance between ticks along the contour, in plot units
    pub spacing: f64,
    /// Tick length in plot units
    pub length: f64,
    /// Tick rings around highs
    pub highs: bool,
    /// Tick rings around lows
    pub lows: bool,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            spacing: 15.0,
            length: 3.0,
            highs: true,
            lows: true,
        }
    }
}

impl TickConfig {
    /// Parse `[+|-][spacing/length]`: `+` ticks only highs, `-` only lows.
    pub fn from_str(s: &str) -> Option<Self> {
        let mut config = Self::default();
        let rest = if let Some(rest) = s.strip_prefix('+') {
            config.lows = false;
            rest
        } else if let Some(rest) = s.strip_prefix('-') {
            config.highs = false;
            rest
        } else {
            s
        };
        if !rest.is_empty() {
            let (spacing, length) = rest.split_once('/')?;
            config.spacing = spacing.trim().parse().ok()?;
            config.length = length.trim().parse().ok()?;
        }
        Some(config)
    }

    pub fn wants(&self, kind: Extremum) -> bool {
        match kind {
            Extremum::High => self.highs,
            Extremum::Low => self.lows,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.spacing > 0.0) {
            return Err("tick spacing must be > 0".to_string());
        }
        if self.length == 0.0 || !self.length.is_finite() {
            return Err("tick length must be finite and non-zero".to_string());
        }
        Ok(())
    }
}

/// One tick: from a contour vertex towards lower values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    pub base: Point,
    pub tip: Point,
}

/// Whether `p` lies inside `ring` (ray casting).
pub fn ring_contains(ring: &[Point], p: Point) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// For each ring, whether no other ring has its midpoint inside it.
pub fn innermost(rings: &[&[Point]]) -> Vec<bool> {
    let boxes: Vec<Option<BoundingBox>> =
        rings.iter().map(|r| BoundingBox::from_points(r)).collect();
    rings
        .iter()
        .enumerate()
        .map(|(i, ring)| {
            let Some(bbox) = boxes[i] else {
                return false;
            };
            !rings.iter().enumerate().any(|(j, other)| {
                if i == j || other.is_empty() {
                    return false;
                }
                let mid = other[other.len() / 2];
                bbox.contains_point(mid.x, mid.y) && ring_contains(ring, mid)
            })
        })
        .collect()
}

/// High or low enclosed by a ring at `level`, judged from the first grid
/// node inside it along its middle row. None when no valid node is inside.
pub fn enclosed_extremum(ring: &[Point], level: f64, grid: &Grid) -> Option<Extremum> {
    let bbox = BoundingBox::from_points(ring)?;
    let spec = &grid.spec;
    let last_row = (spec.ny - 1) as f64;
    let last_col = (spec.nx - 1) as f64;

    let row = spec
        .y_to_row(0.5 * (bbox.min_y + bbox.max_y))
        .round()
        .clamp(0.0, last_row) as usize;
    let y = spec.row_to_y(row as f64);
    let (a, b) = (spec.x_to_col(bbox.min_x), spec.x_to_col(bbox.max_x));
    let first = a.min(b).floor().clamp(0.0, last_col) as usize;
    let last = a.max(b).ceil().clamp(0.0, last_col) as usize;

    (first..=last).find_map(|col| {
        let x = spec.col_to_x(col as f64);
        let z = grid.value(row, col) as f64;
        if z.is_nan() || !ring_contains(ring, Point::new(x, y)) {
            return None;
        }
        Some(if z > level {
            Extremum::High
        } else {
            Extremum::Low
        })
    })
}

/// Ticks along a closed ring, `config.spacing` apart, pointing downhill.
///
/// The spacing is stretched so the ring holds a whole number of ticks;
/// rings shorter than one spacing get none.
pub fn place_ticks(ring: &[Point], kind: Extremum, config: &TickConfig) -> Vec<Tick> {
    let n = ring.len();
    if n < 3 || !(config.spacing > 0.0) {
        return Vec::new();
    }
    let mut track = Vec::with_capacity(n);
    track.push(0.0);
    for w in ring.windows(2) {
        let last = track[track.len() - 1];
        track.push(last + w[0].distance(&w[1]));
    }
    let total = track[n - 1];
    let count = (total / config.spacing).floor() as usize;
    if count == 0 {
        return Vec::new();
    }

    // Twice the signed area; positive for counterclockwise rings, whose
    // outside is on the right of the direction of travel.
    let area: f64 = ring
        .windows(2)
        .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
        .sum();
    let outward = if area > 0.0 {
        -std::f64::consts::FRAC_PI_2
    } else {
        std::f64::consts::FRAC_PI_2
    };
    let turn = match kind {
        Extremum::High => outward,
        Extremum::Low => -outward,
    };

    let step = total / count as f64;
    let mut next = 0.0;
    let mut ticks = Vec::with_capacity(count);
    for j in 0..n - 1 {
        if track[j] < next {
            continue;
        }
        let (base, ahead) = (ring[j], ring[j + 1]);
        let (sin, cos) = ((ahead.y - base.y).atan2(ahead.x - base.x) + turn).sin_cos();
        ticks.push(Tick {
            base,
            tip: Point::new(base.x + config.length * cos, base.y + config.length * sin),
        });
        next += step;
    }
    ticks
}
