#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![allow(clippy::too_many_arguments)]
#![no_std]

//! Voronoi diagrams of point sites, clipped to a rectangle.
//!
//! This crate is reexported in [fortune](https://docs.rs/fortune/).
//!
//! ## Overview
//!
//! The diagram is computed in two stages:
//!
//! * [FortuneSweep](struct.FortuneSweep.html) sweeps a horizontal line from the top of
//!   the plane to the bottom, maintaining a beach line of parabolic arcs. Each time an
//!   arc disappears a Voronoi vertex is produced. The output of this stage is a
//!   [DiagramGraph](struct.DiagramGraph.html), in which edges that never met a vertex
//!   still extend to infinity.
//! * [BorderClipper](struct.BorderClipper.html) cuts that graph against the clipping
//!   rectangle and adds the rectangle's own sides, split wherever a cell boundary
//!   reaches them.
//!
//! The result is a [VoronoiDiagram](struct.VoronoiDiagram.html): a set of straight
//! [edges](struct.Edge.html), each knowing the site on its left and the site on its
//! right. Edges on the rectangle's sides only have a site on their left, the right side
//! being outside of the diagram.
//!
//! ```
//! use fortune_voronoi::{FortuneSweep, VoronoiOptions};
//! use fortune_voronoi::math::{point, Box2D};
//!
//! let sites = [point(500.0, 600.0), point(500.0, 400.0)];
//! let bounds = Box2D { min: point(0.0, 0.0), max: point(1000.0, 1000.0) };
//!
//! let mut sweep = FortuneSweep::new();
//! let diagram = sweep.build(&sites, &bounds, &VoronoiOptions::DEFAULT).unwrap();
//!
//! // The bisector plus six pieces of the rectangle's sides.
//! assert_eq!(diagram.edges().len(), 7);
//! ```
//!
//! ## Orientation
//!
//! The y axis points up: the sweep starts at the largest y and boundary edges run
//! counter-clockwise. Walking along any edge from `from` to `to`, the `left` site is on
//! the left.
//!
//! ## Tolerance
//!
//! Sites on a common line or circle, sites on the rectangle and duplicated sites are
//! all valid input. Recognizing these configurations requires approximate comparisons,
//! and every one of them goes through a single `Tolerance` derived from
//! [VoronoiOptions::tolerance](struct.VoronoiOptions.html#structfield.tolerance) and
//! the magnitude of the input coordinates.

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub extern crate fortune_geom;

pub use fortune_geom as geom;

mod beach_line;
mod clip;
mod diagram;
mod error;
mod event_queue;
mod graph;
mod sweep;

#[cfg(test)]
mod diagram_tests;
#[cfg(test)]
mod fuzz_tests;

#[doc(inline)]
pub use crate::beach_line::{ArcId, BeachLine, Location};
#[doc(inline)]
pub use crate::clip::BorderClipper;
#[doc(inline)]
pub use crate::diagram::{Edge, VoronoiDiagram};
#[doc(inline)]
pub use crate::error::*;
#[doc(inline)]
pub use crate::event_queue::{CircleEvent, CircleId, Event, EventQueue};
#[doc(inline)]
pub use crate::graph::{DiagramGraph, GraphEdge};
#[doc(inline)]
pub use crate::sweep::FortuneSweep;

/// Double precision aliases of the geometry types, used throughout this crate.
pub mod math {
    /// Alias for `euclid::default::Point2D<f64>`.
    pub type Point = crate::geom::Point<f64>;

    /// Alias for `euclid::default::Vector2D<f64>`.
    pub type Vector = crate::geom::Vector<f64>;

    /// Alias for `euclid::default::Box2D<f64>`.
    pub type Box2D = crate::geom::Box2D<f64>;

    /// Alias for `euclid::default::Rotation2D<f64>`.
    pub type Rotation = crate::geom::Rotation<f64>;

    /// An angle in radians.
    pub type Angle = crate::geom::Angle<f64>;

    pub type Line = crate::geom::Line<f64>;
    pub type LineSegment = crate::geom::LineSegment<f64>;
    pub type Tolerance = crate::geom::Tolerance<f64>;

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f64, y: f64) -> Vector {
        Vector::new(x, y)
    }
}

pub type Index = u32;

macro_rules! impl_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub Index);

        impl $name {
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub fn offset(self) -> u32 {
                self.0
            }

            #[inline]
            pub fn to_usize(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn from_usize(v: usize) -> Self {
                $name(v as Index)
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }
    };
}

impl_id!(
    /// Identifies a site: its index in the slice of positions given to the sweep.
    SiteId
);

impl_id!(
    /// Identifies a vertex of a [DiagramGraph](struct.DiagramGraph.html).
    VertexId
);

impl_id!(
    /// Identifies an edge of a [DiagramGraph](struct.DiagramGraph.html).
    EdgeId
);

/// Parameters for the Voronoi construction.
#[derive(Copy, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct VoronoiOptions {
    /// Relative tolerance of the approximate comparisons.
    ///
    /// The effective epsilon is this value multiplied by the largest absolute coordinate
    /// of the sites and the clipping rectangle (or by one if that is smaller). Points
    /// closer than the epsilon are considered to be at the same position.
    ///
    /// Must be strictly positive and finite.
    ///
    /// Default value: `VoronoiOptions::DEFAULT_TOLERANCE`.
    pub tolerance: f64,
}

impl VoronoiOptions {
    /// Default relative tolerance.
    pub const DEFAULT_TOLERANCE: f64 = 1e-9;

    pub const DEFAULT: Self = VoronoiOptions {
        tolerance: Self::DEFAULT_TOLERANCE,
    };

    #[inline]
    pub fn tolerance(tolerance: f64) -> Self {
        Self::DEFAULT.with_tolerance(tolerance)
    }

    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Default for VoronoiOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[test]
fn options() {
    assert_eq!(VoronoiOptions::default(), VoronoiOptions::DEFAULT);
    assert_eq!(VoronoiOptions::tolerance(0.5).tolerance, 0.5);
    assert_eq!(
        VoronoiOptions::DEFAULT.with_tolerance(1e-6),
        VoronoiOptions::tolerance(1e-6)
    );
}

#[test]
fn ids() {
    assert_eq!(SiteId::from_usize(3).to_usize(), 3);
    assert!(!EdgeId::INVALID.is_valid());
    assert!(VertexId(0).is_valid());
    assert!(SiteId(1) < SiteId(2));
}
