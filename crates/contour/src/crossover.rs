//! Intersections between two polylines.

use contour_common::{BoundingBox, Point};

/// One intersection of line A with line B.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub point: Point,
    /// Fractional node index along A (segment i at fraction f is i + f)
    pub node_a: f64,
    /// Fractional node index along B
    pub node_b: f64,
}

/// All intersections of polyline `a` with polyline `b`, ordered along `a`.
///
/// A crossing exactly on a shared vertex is reported once. Parallel
/// overlapping segments do not produce crossings.
pub fn find_crossings(a: &[Point], b: &[Point]) -> Vec<Crossing> {
    let mut crossings = Vec::new();
    if a.len() < 2 || b.len() < 2 {
        return crossings;
    }
    let last_a = a.len() - 2;
    let last_b = b.len() - 2;
    let b_boxes: Vec<BoundingBox> = b
        .windows(2)
        .map(|w| BoundingBox::from_segment(&w[0], &w[1]))
        .collect();

    for (i, wa) in a.windows(2).enumerate() {
        let box_a = BoundingBox::from_segment(&wa[0], &wa[1]);
        for (j, wb) in b.windows(2).enumerate() {
            if !box_a.overlaps(&b_boxes[j]) {
                continue;
            }
            let Some((s, t)) = segment_intersection(wa[0], wa[1], wb[0], wb[1]) else {
                continue;
            };
            // The far end belongs to the next segment unless this is the last.
            if (s >= 1.0 && i < last_a) || (t >= 1.0 && j < last_b) {
                continue;
            }
            crossings.push(Crossing {
                point: wa[0].lerp(&wa[1], s),
                node_a: i as f64 + s,
                node_b: j as f64 + t,
            });
        }
    }
    crossings.sort_by(|x, y| x.node_a.total_cmp(&y.node_a));
    crossings
}

/// Parameters (s along p0->p1, t along q0->q1) of the intersection, if any.
fn segment_intersection(p0: Point, p1: Point, q0: Point, q1: Point) -> Option<(f64, f64)> {
    let r = (p1.x - p0.x, p1.y - p0.y);
    let d = (q1.x - q0.x, q1.y - q0.y);
    let denom = r.0 * d.1 - r.1 * d.0;
    if denom == 0.0 {
        return None;
    }
    let w = (q0.x - p0.x, q0.y - p0.y);
    let s = (w.0 * d.1 - w.1 * d.0) / denom;
    let t = (w.0 * r.1 - w.1 * r.0) / denom;
    ((0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t)).then_some((s, t))
}
