//! Planar polygon primitives: shoelace area and point-in-ring tests.
//!
//! Rings are given as open vertex sequences; the closing segment from the
//! last point back to the first is implied.

use nalgebra::Point2;

/// Where a point lies relative to a closed ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Inside,
    Boundary,
    Outside,
}

impl Containment {
    /// Inside or on the boundary.
    #[inline]
    pub fn is_covered(self) -> bool {
        !matches!(self, Containment::Outside)
    }
}

/// Signed area via the shoelace formula. Positive for counter-clockwise rings.
pub fn signed_polygon_area(ring: &[Point2<f64>]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += ring[i].x * ring[j].y;
        area -= ring[j].x * ring[i].y;
    }
    area / 2.0
}

/// Absolute enclosed area.
#[inline]
pub fn polygon_area(ring: &[Point2<f64>]) -> f64 {
    signed_polygon_area(ring).abs()
}

/// Twice the signed area of triangle (a, b, p); > 0 when p is left of a→b.
#[inline]
fn orient(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y)
}

/// Whether p lies on segment a-b, with a tolerance scaled by the segment size.
fn on_segment(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> bool {
    let scale = (b - a).norm() * (p - a).norm().max((p - b).norm());
    if orient(a, b, p).abs() > 8.0 * f64::EPSILON * scale {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Classify `p` against a closed ring using the winding number.
///
/// Points on an edge or vertex report [`Containment::Boundary`]. Any
/// non-zero winding counts as inside, so orientation does not matter.
pub fn ring_containment(ring: &[Point2<f64>], p: &Point2<f64>) -> Containment {
    let n = ring.len();
    if n < 3 {
        return Containment::Outside;
    }

    let mut winding = 0i32;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];

        if on_segment(a, b, p) {
            return Containment::Boundary;
        }

        if a.y <= p.y {
            if b.y > p.y && orient(a, b, p) > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && orient(a, b, p) < 0.0 {
            winding -= 1;
        }
    }

    if winding != 0 {
        Containment::Inside
    } else {
        Containment::Outside
    }
}
