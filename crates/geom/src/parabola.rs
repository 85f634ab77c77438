use crate::scalar::Scalar;
use crate::{point, Point, Tolerance};

/// The set of points equidistant from a focus and a horizontal directrix located
/// below it.
///
/// In a sweep-line Voronoi construction the focus is a site and the directrix is the
/// sweep line. The parabola is "flat" when the directrix reaches the focus, in which
/// case it degenerates into the vertical half-line above the focus.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Parabola<S> {
    pub focus: Point<S>,
    pub directrix_y: S,
}

impl<S: Scalar> Parabola<S> {
    #[inline]
    pub fn new(focus: Point<S>, directrix_y: S) -> Self {
        Parabola { focus, directrix_y }
    }

    /// Distance between the focus and the directrix.
    #[inline]
    pub fn focal_distance(&self) -> S {
        self.focus.y - self.directrix_y
    }

    /// Returns true if the directrix is within tolerance of the focus.
    #[inline]
    pub fn is_flat(&self, tolerance: &Tolerance<S>) -> bool {
        self.focal_distance() <= tolerance.epsilon()
    }

    /// Evaluates the parabola at `x`.
    ///
    /// Must not be called on a flat parabola.
    #[inline]
    pub fn y_at(&self, x: S) -> S {
        let d = self.focal_distance();
        let dx = x - self.focus.x;

        dx * dx / (S::TWO * d) + (self.focus.y + self.directrix_y) * S::HALF
    }

    #[inline]
    pub fn sample(&self, x: S) -> Point<S> {
        point(x, self.y_at(x))
    }

    /// The x coordinate of the intersection between two parabolas sharing the same
    /// directrix, for the breakpoint that has `left` on its left and `right` on its
    /// right.
    ///
    /// Two distinct parabolas with a common directrix intersect twice unless their
    /// foci are at the same height. Which of the two intersections is picked depends
    /// on the order of the arcs: the breakpoint between `left` and `right` is the
    /// one where `left` is the lower parabola on the left side of the intersection.
    pub fn breakpoint_x(left: Point<S>, right: Point<S>, directrix_y: S, tolerance: &Tolerance<S>) -> S {
        let eps = tolerance.epsilon();
        let da = left.y - directrix_y;
        let db = right.y - directrix_y;
        let mid = (left.x + right.x) * S::HALF;

        let left_flat = da <= eps;
        let right_flat = db <= eps;
        if left_flat && right_flat {
            return mid;
        }
        if right_flat {
            return right.x;
        }
        if left_flat {
            return left.x;
        }
        if S::abs(da - db) <= eps {
            return mid;
        }

        // Solve the quadratic in a frame centered on the right focus.
        //   (x - ax)^2 / da + ay = x^2 / db + by
        let ax = left.x - right.x;
        let a = db - da;
        let b = -S::TWO * db * ax;
        let c = db * ax * ax + da * db * (left.y - right.y);
        let disc = S::sqrt(S::max(b * b - S::FOUR * a * c, S::ZERO));

        // Numerically stable variant of the quadratic formula, always picking the
        // `(-b + sqrt(disc)) / 2a` root.
        let x = if b >= S::ZERO {
            let denom = b + disc;
            if denom == S::ZERO {
                return mid;
            }
            -S::TWO * c / denom
        } else {
            (-b + disc) / (S::TWO * a)
        };

        if !x.is_finite() {
            return mid;
        }

        x + right.x
    }
}

#[test]
fn evaluate() {
    let p = Parabola::new(point(0.0, 2.0), 0.0);
    assert_eq!(p.y_at(0.0), 1.0);
    assert_eq!(p.y_at(2.0), 2.0);
    assert_eq!(p.y_at(-2.0), 2.0);
    assert_eq!(p.sample(4.0), point(4.0, 5.0));

    let t = Tolerance::new(1e-9);
    assert!(!p.is_flat(&t));
    assert!(Parabola::new(point(0.0, 2.0), 2.0).is_flat(&t));
}

#[test]
fn breakpoints_of_stacked_foci() {
    let t = Tolerance::new(1e-9);
    let upper = point(500.0, 600.0);
    let lower = point(500.0, 400.0);
    let directrix: f64 = 300.0;

    // The lower focus splits the upper arc in two, producing two breakpoints.
    let left = Parabola::breakpoint_x(upper, lower, directrix, &t);
    let right = Parabola::breakpoint_x(lower, upper, directrix, &t);

    assert!((left - 326.794919).abs() < 1e-5);
    assert!((right - 673.205080).abs() < 1e-5);

    let pu = Parabola::new(upper, directrix);
    let pl = Parabola::new(lower, directrix);
    assert!((pu.y_at(left) - pl.y_at(left)).abs() < 1e-6);
    assert!((pu.y_at(right) - pl.y_at(right)).abs() < 1e-6);
}

#[test]
fn breakpoints_of_level_foci() {
    let t = Tolerance::new(1e-9);
    let a = point(100.0, 500.0);
    let b = point(300.0, 500.0);

    assert_eq!(Parabola::breakpoint_x(a, b, 200.0, &t), 200.0);
    assert_eq!(Parabola::breakpoint_x(a, b, 500.0, &t), 200.0);
}

#[test]
fn breakpoints_with_flat_arcs() {
    let t = Tolerance::new(1e-9);
    let high = point(0.0, 10.0);
    let on_sweep = point(4.0, 0.0);

    assert_eq!(Parabola::breakpoint_x(high, on_sweep, 0.0, &t), 4.0);
    assert_eq!(Parabola::breakpoint_x(on_sweep, high, 0.0, &t), 4.0);
}

#[test]
fn breakpoints_are_equidistant() {
    let t = Tolerance::new(1e-9);
    let sites = [
        (point(10.0, 90.0), point(70.0, 40.0)),
        (point(70.0, 40.0), point(10.0, 90.0)),
        (point(-30.0, 15.0), point(25.0, 12.0)),
        (point(25.0, 12.0), point(-30.0, 15.0)),
    ];
    let directrix: f64 = 5.0;

    for &(left, right) in &sites {
        let x = Parabola::breakpoint_x(left, right, directrix, &t);
        let p = Parabola::new(left, directrix).sample(x);
        let dl = (p - left).length();
        let dr = (p - right).length();
        assert!((dl - dr).abs() < 1e-6, "{:?} {:?}", dl, dr);
        assert!((dl - (p.y - directrix)).abs() < 1e-6);
    }
}
