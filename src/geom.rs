// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Planar predicates and constructions on projected (s, t) coordinates.
//
// Every stage after projection works on `Point`s ordered lexicographically
// (s first, then t). That order is the sweep order: an edge "goes right" when
// its origin sorts before its destination, and vertical edges are treated as
// if tilted infinitesimally to the right.

use std::cmp::Ordering;

pub type Real = f64;

/// A vertex position in the working plane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub s: Real,
    pub t: Real,
}

impl Point {
    #[inline]
    pub const fn new(s: Real, t: Real) -> Self {
        Point { s, t }
    }

    /// Returns true if `self` is lexicographically <= `other` (s first, then t).
    #[inline]
    pub fn leq(self, other: Point) -> bool {
        self.s < other.s || (self.s == other.s && self.t <= other.t)
    }

    /// Total sweep order. Coordinates are finite, so `partial_cmp` never fails;
    /// NaN would compare equal rather than panic.
    #[inline]
    pub fn sweep_cmp(self, other: Point) -> Ordering {
        self.s
            .partial_cmp(&other.s)
            .unwrap_or(Ordering::Equal)
            .then(self.t.partial_cmp(&other.t).unwrap_or(Ordering::Equal))
    }

    #[inline]
    pub fn l1_dist(self, other: Point) -> Real {
        (self.s - other.s).abs() + (self.t - other.t).abs()
    }

    #[inline]
    pub fn lerp(self, other: Point, u: Real) -> Point {
        Point::new(self.s + (other.s - self.s) * u, self.t + (other.t - self.t) * u)
    }
}

/// Twice the signed area of triangle (a, b, c). Positive when the turn
/// a -> b -> c is counter-clockwise.
#[inline]
pub fn orient(a: Point, b: Point, c: Point) -> Real {
    (b.s - a.s) * (c.t - a.t) - (c.s - a.s) * (b.t - a.t)
}

/// Given u <= v <= w in sweep order, evaluates the t-coordinate of edge uw at
/// the s-coordinate of v and returns `v.t - uw(v.s)`: the signed distance of v
/// above the edge. A vertical edge through v gives zero.
///
/// The interpolation runs from whichever endpoint is closer to v, which keeps
/// the result accurate when v nearly coincides with an endpoint.
pub fn edge_eval(u: Point, v: Point, w: Point) -> Real {
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r > 0.0 {
        if gap_l < gap_r {
            (v.t - u.t) + (u.t - w.t) * (gap_l / (gap_l + gap_r))
        } else {
            (v.t - w.t) + (w.t - u.t) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.0
    }
}

/// Proper crossing of segments ab and cd.
///
/// Returns the crossing point together with its parameters along ab and cd,
/// or `None` when the segments do not cross in their interiors. Touching
/// configurations (an endpoint on the other segment, collinear overlap) are
/// not crossings; callers detect those with [`point_on_segment`].
pub fn segment_crossing(a: Point, b: Point, c: Point, d: Point) -> Option<(Point, Real, Real)> {
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);
    if !(o1 * o2 < 0.0 && o3 * o4 < 0.0) {
        return None;
    }

    // The crossing parameter along each segment is the ratio of the
    // distances of its endpoints from the other segment.
    let u = (o3 / (o3 - o4)).clamp(0.0, 1.0);
    let v = (o1 / (o1 - o2)).clamp(0.0, 1.0);

    let p = a.lerp(b, u);
    let q = c.lerp(d, v);
    Some((Point::new(0.5 * (p.s + q.s), 0.5 * (p.t + q.t)), u, v))
}

/// If `p` lies in the interior of segment ab (within `tol` of the line and
/// strictly between the endpoints), returns its parameter along ab.
pub fn point_on_segment(p: Point, a: Point, b: Point, tol: Real) -> Option<Real> {
    if p == a || p == b {
        return None;
    }
    let ds = b.s - a.s;
    let dt = b.t - a.t;
    let len2 = ds * ds + dt * dt;
    if len2 == 0.0 {
        return None;
    }
    let dist = orient(a, b, p).abs() / len2.sqrt();
    if dist > tol {
        return None;
    }
    let u = ((p.s - a.s) * ds + (p.t - a.t) * dt) / len2;
    if u <= 0.0 || u >= 1.0 {
        return None;
    }
    Some(u)
}

/// Signed area of a closed loop (positive when counter-clockwise).
pub fn loop_area<I>(points: I) -> Real
where
    I: IntoIterator<Item = Point>,
    I::IntoIter: Clone,
{
    let iter = points.into_iter();
    let mut next = iter.clone().cycle();
    next.next();
    let mut area = 0.0;
    for (p, q) in iter.zip(next) {
        area += p.s * q.t - q.s * p.t;
    }
    0.5 * area
}
