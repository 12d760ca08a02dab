//! Joining the two halves of a contour cut by missing data.

use contour_common::{ContourError, Point, Result};

/// Join a forward and a backward fragment traced from the same seed.
///
/// Both fragments start at the shared seed vertex. The backward fragment is
/// reversed, its copy of the seed dropped, and the forward fragment appended,
/// giving `m + n - 1` points.
pub fn splice(forward: &[Point], backward: &[Point]) -> Result<Vec<Point>> {
    if forward.is_empty() || backward.is_empty() {
        return Err(ContourError::degenerate("cannot splice an empty fragment"));
    }
    let mut joined = Vec::new();
    joined.try_reserve_exact(forward.len() + backward.len() - 1)?;
    joined.extend(backward[1..].iter().rev());
    joined.extend_from_slice(forward);
    Ok(joined)
}
