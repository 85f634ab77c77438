use crate::scalar::Scalar;
use crate::{Box2D, Point};

/// Returns the two values sorted.
#[inline]
pub fn min_max<S: Scalar>(a: S, b: S) -> (S, S) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// The span and the magnitude of a set of points, as used by
/// [`Tolerance::for_extent`](../struct.Tolerance.html#method.for_extent).
///
/// The span is the longest side of their bounding rectangle and the magnitude is the
/// largest absolute coordinate. Non-finite coordinates are skipped.
pub fn extent<S: Scalar>(points: impl IntoIterator<Item = Point<S>>) -> (S, S) {
    let mut lo = [S::MAX; 2];
    let mut hi = [S::MIN; 2];
    let mut magnitude = S::ZERO;
    for p in points {
        for (axis, v) in [p.x, p.y].iter().enumerate() {
            if !v.is_finite() {
                continue;
            }
            lo[axis] = S::min(lo[axis], *v);
            hi[axis] = S::max(hi[axis], *v);
            magnitude = S::max(magnitude, S::abs(*v));
        }
    }

    let mut span = S::ZERO;
    for axis in 0..2 {
        if lo[axis] <= hi[axis] {
            span = S::max(span, hi[axis] - lo[axis]);
        }
    }

    (span, magnitude)
}

/// Returns true if the rectangle has a strictly positive area.
#[inline]
pub fn is_normalized<S: Scalar>(rect: &Box2D<S>) -> bool {
    rect.min.x < rect.max.x && rect.min.y < rect.max.y
}

#[test]
fn test_min_max() {
    assert_eq!(min_max(1.0, 2.0), (1.0, 2.0));
    assert_eq!(min_max(2.0, 1.0), (1.0, 2.0));
    assert_eq!(min_max(-3.0, -3.0), (-3.0, -3.0));
}

#[test]
fn test_extent() {
    use crate::point;

    let corners = [point(-10.0, 0.0), point(5.0, 20.0)];
    assert_eq!(extent(corners.iter().cloned()), (20.0, 20.0));

    let more = [point(3.0, -70.0), point(f64::NAN, 1.0)];
    assert_eq!(extent(corners.iter().chain(more.iter()).cloned()), (90.0, 70.0));

    let far = [point(1e6, 1e6), point(1e6 + 1.0, 1e6 + 2.0)];
    assert_eq!(extent(far.iter().cloned()), (2.0, 1e6 + 2.0));

    assert_eq!(extent(core::iter::empty::<Point<f64>>()), (0.0, 0.0));
}

#[test]
fn test_is_normalized() {
    use crate::point;

    assert!(is_normalized(&Box2D {
        min: point(0.0, 0.0),
        max: point(1.0, 1.0),
    }));
    assert!(!is_normalized(&Box2D {
        min: point(0.0, 0.0),
        max: point(0.0, 1.0),
    }));
    assert!(!is_normalized(&Box2D {
        min: point(2.0, 0.0),
        max: point(1.0, 1.0),
    }));
    assert!(!is_normalized(&Box2D {
        min: point(0.0, f64::NAN),
        max: point(1.0, 1.0),
    }));
}
