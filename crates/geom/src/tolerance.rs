use crate::scalar::Scalar;
use crate::Point;

/// The approximation policy shared by every geometric predicate of a construction.
///
/// Float precision depends on the magnitude of the values being compared, so the
/// epsilon is usually derived from the size and position of the working area with
/// [`Tolerance::for_extent`]. Within one construction, a single `Tolerance` value must
/// be used everywhere: two predicates disagreeing about whether three points are
/// collinear is how inconsistent topology creeps in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tolerance<S> {
    epsilon: S,
}

impl<S: Scalar> Tolerance<S> {
    /// A tolerance with an absolute epsilon.
    #[inline]
    pub fn new(epsilon: S) -> Self {
        debug_assert!(epsilon >= S::ZERO);
        Tolerance {
            epsilon: S::max(epsilon, S::ZERO),
        }
    }

    /// A tolerance relative to the size of the working area.
    ///
    /// The epsilon is `relative * span`, where `span` is the size of the area, but never
    /// less than the rounding error of coordinates as large as `magnitude`. An area far
    /// from the origin gets the same tolerance as the same area around the origin until
    /// the rounding error of its coordinates takes over.
    ///
    /// See [`utils::extent`](utils/fn.extent.html).
    #[inline]
    pub fn for_extent(relative: S, span: S, magnitude: S) -> Self {
        let floor = S::abs(magnitude) * S::EPSILON;
        let epsilon = S::max(relative * S::abs(span), floor);
        Tolerance::new(S::max(epsilon, S::min_positive_value()))
    }

    #[inline]
    pub fn epsilon(&self) -> S {
        self.epsilon
    }

    #[inline]
    pub fn approx_eq(&self, a: S, b: S) -> bool {
        S::abs(a - b) <= self.epsilon
    }

    /// Returns true if `a` is lower than `b` by more than the tolerance.
    #[inline]
    pub fn definitely_lt(&self, a: S, b: S) -> bool {
        a < b - self.epsilon
    }

    /// Returns true if `a` is greater than `b` by more than the tolerance.
    #[inline]
    pub fn definitely_gt(&self, a: S, b: S) -> bool {
        a > b + self.epsilon
    }

    #[inline]
    pub fn points_approx_eq(&self, a: Point<S>, b: Point<S>) -> bool {
        self.approx_eq(a.x, b.x) && self.approx_eq(a.y, b.y)
    }

    /// Snaps `v` to `target` if they are within tolerance of each other.
    #[inline]
    pub fn snap(&self, v: S, target: S) -> S {
        if self.approx_eq(v, target) {
            target
        } else {
            v
        }
    }
}

#[test]
fn relative_tolerance() {
    let t = Tolerance::for_extent(1e-9, 1000.0, 1000.0);
    assert!(t.approx_eq(500.0, 500.0 + 1e-7));
    assert!(!t.approx_eq(500.0, 500.0 + 1e-5));

    // Scales with the span, not with the distance to the origin.
    let t = Tolerance::for_extent(1e-9, 0.001, 0.001);
    assert_eq!(t.epsilon(), 1e-9 * 0.001);
    let t = Tolerance::for_extent(1e-9, 1.0, 1000.0);
    assert_eq!(t.epsilon(), 1e-9);

    // Unless the coordinates are too large to resolve it.
    let t = Tolerance::for_extent(1e-9, 1.0, 1e6);
    assert_eq!(t.epsilon(), 1e6 * 1e-14);
    assert!(t.epsilon() < 1e-7);

    let t: Tolerance<f64> = Tolerance::for_extent(0.0, 0.0, 0.0);
    assert!(t.epsilon() > 0.0);
}

#[test]
fn comparisons() {
    let t = Tolerance::new(0.01);
    assert!(t.definitely_lt(1.0, 1.5));
    assert!(!t.definitely_lt(1.0, 1.005));
    assert!(t.definitely_gt(2.0, 1.0));
    assert!(!t.definitely_gt(1.005, 1.0));
    assert_eq!(t.snap(0.999, 1.0), 1.0);
    assert_eq!(t.snap(0.9, 1.0), 0.9);
    assert!(t.points_approx_eq(crate::point(1.0, 1.0), crate::point(1.001, 0.999)));
}
