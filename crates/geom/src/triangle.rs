use crate::scalar::Scalar;
use crate::{vector, Point, Tolerance};

#[cfg(test)]
use crate::point;

/// A 2D triangle defined by three points `a`, `b` and `c`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle<S> {
    pub a: Point<S>,
    pub b: Point<S>,
    pub c: Point<S>,
}

impl<S: Scalar> Triangle<S> {
    /// Twice the signed area of the triangle.
    ///
    /// Positive if `a`, `b`, `c` turn counter-clockwise (in a y-up frame), negative
    /// if they turn clockwise.
    #[inline]
    pub fn signed_area2(&self) -> S {
        (self.b - self.a).cross(self.c - self.a)
    }

    /// The length of the longest side.
    #[inline]
    pub fn longest_side(&self) -> S {
        let ab = (self.b - self.a).length();
        let bc = (self.c - self.b).length();
        let ca = (self.a - self.c).length();

        S::max(S::max(ab, bc), ca)
    }

    /// Returns true if going from `a` to `b` to `c` is a right turn by more than
    /// the tolerance.
    ///
    /// The tolerance is scaled by the longest side so that the result does not depend
    /// on the size of the triangle.
    #[inline]
    pub fn is_clockwise(&self, tolerance: &Tolerance<S>) -> bool {
        self.signed_area2() < -tolerance.epsilon() * self.longest_side()
    }

    /// The center of the circle passing through the three points.
    ///
    /// Returns `None` if the points are exactly collinear.
    pub fn circumcenter(&self) -> Option<Point<S>> {
        // Computed relative to `a` to limit the loss of precision with large coordinates.
        let b = self.b - self.a;
        let c = self.c - self.a;
        let d = S::TWO * b.cross(c);
        if d == S::ZERO || !d.is_finite() {
            return None;
        }

        let b2 = b.square_length();
        let c2 = c.square_length();
        let center = vector((c.y * b2 - b.y * c2) / d, (b.x * c2 - c.x * b2) / d);
        if !center.x.is_finite() || !center.y.is_finite() {
            return None;
        }

        Some(self.a + center)
    }

    /// The center and radius of the circle passing through the three points.
    #[inline]
    pub fn circumcircle(&self) -> Option<(Point<S>, S)> {
        let center = self.circumcenter()?;

        Some((center, (self.a - center).length()))
    }
}

#[test]
fn test_orientation() {
    let tolerance = Tolerance::new(1e-9);
    let ccw = Triangle {
        a: point(0.0, 0.0),
        b: point(10.0, 0.0),
        c: point(0.0, 10.0),
    };
    assert_eq!(ccw.signed_area2(), 100.0);
    assert!(!ccw.is_clockwise(&tolerance));

    let cw = Triangle {
        a: ccw.a,
        b: ccw.c,
        c: ccw.b,
    };
    assert!(cw.is_clockwise(&tolerance));

    let flat = Triangle {
        a: point(0.0, 0.0),
        b: point(1.0, 1.0),
        c: point(2.0, 2.0 + 1e-12),
    };
    // Within tolerance of collinear, in both directions.
    assert!(!flat.is_clockwise(&tolerance));
    let flat_reversed = Triangle {
        a: flat.a,
        b: flat.c,
        c: flat.b,
    };
    assert!(!flat_reversed.is_clockwise(&tolerance));
}

#[test]
fn test_circumcircle() {
    let t = Triangle {
        a: point(300.0, 700.0),
        b: point(300.0, 300.0),
        c: point(700.0, 300.0),
    };
    let (center, radius) = t.circumcircle().unwrap();
    assert!((center - point(500.0, 500.0)).length() < 1e-9);
    assert!((radius - 200.0 * f64::sqrt(2.0)).abs() < 1e-9);

    // Far away from the origin.
    let offset = vector(1.0e6, -3.0e6);
    let far = Triangle {
        a: t.a + offset,
        b: t.b + offset,
        c: t.c + offset,
    };
    let center = far.circumcenter().unwrap();
    assert!((center - (point(500.0, 500.0) + offset)).length() < 1e-6);

    let collinear = Triangle {
        a: point(0.0, 0.0),
        b: point(1.0, 1.0),
        c: point(2.0, 2.0),
    };
    assert_eq!(collinear.circumcenter(), None);
}
