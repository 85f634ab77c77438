use crate::scalar::Scalar;
use crate::utils::min_max;
use crate::{vector, Box2D, Point, Vector};

#[cfg(test)]
use crate::point;

use core::ops::Range;

/// A linear segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineSegment<S> {
    pub from: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> LineSegment<S> {
    /// Returns the vector between this segment's `from` and `to` points.
    #[inline]
    pub fn to_vector(&self) -> Vector<S> {
        self.to - self.from
    }

    /// Computes the length of this segment.
    #[inline]
    pub fn length(&self) -> S {
        self.to_vector().length()
    }

    #[inline]
    pub fn mid_point(&self) -> Point<S> {
        self.from.lerp(self.to, S::HALF)
    }
}

/// An infinite line defined by a point and a vector.
///
/// The vector also orients the line: points on the left of the line are on the
/// left when walking along `vector`.
#[derive(Copy, Clone, Debug)]
pub struct Line<S> {
    pub point: Point<S>,
    pub vector: Vector<S>,
}

impl<S: Scalar> Line<S> {
    /// The perpendicular bisector of two points, oriented so that `left` is on its left
    /// and `right` on its right.
    ///
    /// The line's point is the middle of the two points and its vector has the same
    /// length as the distance between them.
    #[inline]
    pub fn bisector(left: Point<S>, right: Point<S>) -> Self {
        let d = left - right;
        Line {
            point: left.lerp(right, S::HALF),
            vector: vector(d.y, -d.x),
        }
    }

    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        self.point + self.vector * t
    }

    /// Returns the parameter of the orthogonal projection of `p` on this line.
    #[inline]
    pub fn project_t(&self, p: Point<S>) -> S {
        let len = self.vector.square_length();
        if len == S::ZERO {
            return S::ZERO;
        }

        (p - self.point).dot(self.vector) / len
    }

    /// Positive on the left side of the line, negative on the right side.
    pub fn signed_distance_to_point(&self, p: &Point<S>) -> S {
        let v = *p - self.point;
        self.vector.cross(v) / self.vector.length()
    }

    /// Computes the range of the line's parameter for which the line is inside a
    /// rectangle (Liang-Barsky).
    ///
    /// Returns `None` if the line misses the rectangle. A line that only touches a
    /// corner produces an empty range (`start == end`).
    pub fn clipped_t(&self, clip: &Box2D<S>) -> Option<Range<S>> {
        let mut t0 = S::MIN;
        let mut t1 = S::MAX;

        let axes = [
            (self.vector.x, self.point.x, clip.min.x, clip.max.x),
            (self.vector.y, self.point.y, clip.min.y, clip.max.y),
        ];

        for &(d, p, min, max) in &axes {
            if d == S::ZERO {
                // Parallel to this pair of sides.
                if p < min || p > max {
                    return None;
                }
                continue;
            }

            let (a, b) = min_max((min - p) / d, (max - p) / d);
            t0 = S::max(t0, a);
            t1 = S::min(t1, b);
        }

        if t0 > t1 {
            return None;
        }

        Some(t0..t1)
    }
}

#[cfg(test)]
fn fuzzy_eq_point(a: Point<f64>, b: Point<f64>, epsilon: f64) -> bool {
    f64::abs(a.x - b.x) <= epsilon && f64::abs(a.y - b.y) <= epsilon
}

#[test]
fn bisector_orientation() {
    let a = point(0.0, 10.0);
    let b = point(0.0, -10.0);
    let line = Line::bisector(a, b);

    assert_eq!(line.point, point(0.0, 0.0));
    assert!(line.signed_distance_to_point(&a) > 0.0);
    assert!(line.signed_distance_to_point(&b) < 0.0);

    // Every point of the bisector is equidistant from both points.
    for i in -5..5 {
        let p = line.sample(i as f64 * 0.37);
        assert!(f64::abs((p - a).length() - (p - b).length()) < 1e-9);
    }
}

#[test]
fn project() {
    let line = Line {
        point: point(1.0, 1.0),
        vector: vector(2.0, 0.0),
    };

    assert_eq!(line.project_t(point(5.0, 3.0)), 2.0);
    assert_eq!(line.project_t(point(1.0, -7.0)), 0.0);
    assert_eq!(line.sample(line.project_t(point(-3.0, 3.0))), point(-3.0, 1.0));
}

#[test]
fn clip_line_against_box() {
    let rect = Box2D {
        min: point(0.0, 0.0),
        max: point(10.0, 10.0),
    };

    let horizontal = Line {
        point: point(-5.0, 5.0),
        vector: vector(1.0, 0.0),
    };
    assert_eq!(horizontal.clipped_t(&rect), Some(5.0..15.0));

    let reversed = Line {
        point: point(20.0, 5.0),
        vector: vector(-2.0, 0.0),
    };
    assert_eq!(reversed.clipped_t(&rect), Some(5.0..10.0));

    let outside = Line {
        point: point(-5.0, 11.0),
        vector: vector(1.0, 0.0),
    };
    assert_eq!(outside.clipped_t(&rect), None);

    let along_side = Line {
        point: point(0.0, 3.0),
        vector: vector(0.0, 1.0),
    };
    assert_eq!(along_side.clipped_t(&rect), Some(-3.0..7.0));

    let diagonal = Line {
        point: point(5.0, 5.0),
        vector: vector(1.0, 1.0),
    };
    let range = diagonal.clipped_t(&rect).unwrap();
    assert!(fuzzy_eq_point(diagonal.sample(range.start), point(0.0, 0.0), 1e-12));
    assert!(fuzzy_eq_point(diagonal.sample(range.end), point(10.0, 10.0), 1e-12));

    // Only touches the corner.
    let corner = Line {
        point: point(0.0, 20.0),
        vector: vector(1.0, -1.0),
    };
    let range = corner.clipped_t(&rect).unwrap();
    assert_eq!(range.start, range.end);
    assert!(fuzzy_eq_point(corner.sample(range.start), point(10.0, 10.0), 1e-12));
}

#[test]
fn segment_measures() {
    let s = LineSegment {
        from: point(1.0, 1.0),
        to: point(4.0, 5.0),
    };

    assert_eq!(s.to_vector(), vector(3.0, 4.0));
    assert_eq!(s.length(), 5.0);
    assert_eq!(s.mid_point(), point(2.5, 3.0));
}
