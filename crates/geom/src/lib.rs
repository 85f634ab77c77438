#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::let_and_return)]
#![allow(clippy::many_single_char_names)]
#![no_std]

//! Simple 2D geometric primitives on top of euclid, for sweep-line Voronoi construction.
//!
//! This crate is reexported in [fortune](https://docs.rs/fortune/).
//!
//! # Overview.
//!
//! This crate implements the maths needed to sweep a plane with Fortune's algorithm
//! and to clip the result against an axis-aligned rectangle:
//!
//! - lines, perpendicular bisectors and line segments,
//! - triangles (orientation and circumcircles),
//! - parabolic arcs and the breakpoints between them,
//! - a [`Tolerance`] policy shared by every approximate comparison.
//!
//! # Tolerance
//!
//! Voronoi construction is full of exact ties: sites on a common line, four sites on a
//! common circle, a vertex landing exactly on the clipping rectangle. Floating point
//! arithmetic turns those ties into tiny positive or negative values. Instead of
//! sprinkling ad-hoc constants, every predicate that needs to recognize a tie takes a
//! [`Tolerance`], and a single tolerance value is created for the whole construction.
//!
//! ```
//! use fortune_geom::{point, Tolerance, Triangle};
//!
//! let tolerance = Tolerance::for_extent(1e-9, 1000.0, 1000.0);
//! let t = Triangle {
//!     a: point(0.0, 0.0),
//!     b: point(500.0, 500.0 + 1e-9),
//!     c: point(1000.0, 1000.0),
//! };
//! // Collinear within tolerance, so not a right turn.
//! assert!(!t.is_clockwise(&tolerance));
//! ```

#[cfg(any(test, feature = "std"))]
extern crate std;

// Reexport dependencies.
pub use euclid;

mod line;
mod parabola;
mod tolerance;
mod triangle;
pub mod utils;

#[doc(inline)]
pub use crate::line::{Line, LineSegment};
#[doc(inline)]
pub use crate::parabola::Parabola;
#[doc(inline)]
pub use crate::tolerance::Tolerance;
#[doc(inline)]
pub use crate::triangle::Triangle;

pub use crate::scalar::Scalar;

mod scalar {
    pub(crate) use num_traits::Float;

    use core::fmt::{Debug, Display};
    use core::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

    pub trait Scalar:
        Float
        + Sized
        + Display
        + Debug
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
    {
        const HALF: Self;
        const ZERO: Self;
        const ONE: Self;
        const TWO: Self;
        const FOUR: Self;

        const MIN: Self;
        const MAX: Self;

        /// Relative rounding error of this precision, with a few ulps of headroom.
        const EPSILON: Self;
    }

    impl Scalar for f32 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const FOUR: Self = 4.0;

        const MIN: Self = f32::MIN;
        const MAX: Self = f32::MAX;

        const EPSILON: Self = 1e-6;
    }

    impl Scalar for f64 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const FOUR: Self = 4.0;

        const MIN: Self = f64::MIN;
        const MAX: Self = f64::MAX;

        const EPSILON: Self = 1e-14;
    }
}

/// Alias for `euclid::default::Point2D`.
pub use euclid::default::Point2D as Point;

/// Alias for `euclid::default::Vector2D`.
pub use euclid::default::Vector2D as Vector;

/// Alias for `euclid::default::Box2D`
pub use euclid::default::Box2D;

/// Alias for `euclid::default::Rotation2D`
pub type Rotation<S> = euclid::default::Rotation2D<S>;

/// An angle in radians.
pub use euclid::Angle;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector<S>(x: S, y: S) -> Vector<S> {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point<S>(x: S, y: S) -> Point<S> {
    Point::new(x, y)
}
