#![deny(bare_trait_objects)]
#![no_std]

//! Voronoi diagrams of point sites, clipped to a rectangle.
//!
//! # Crates
//!
//! This meta-crate (`fortune`) reexports the following sub-crates for convenience:
//!
//! * **fortune_voronoi** - The sweep-line construction and the clipping of the diagram.
//! * **fortune_geom** - Lines, triangles and parabolic arcs on top of euclid, along with
//!   the tolerance used for approximate comparisons.
//!
//! Each `fortune_<name>` crate is reexported as a `<name>` module in `fortune`. For example:
//!
//! ```ignore
//! extern crate fortune_voronoi;
//! use fortune_voronoi::FortuneSweep;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! extern crate fortune;
//! use fortune::voronoi::FortuneSweep;
//! ```
//!
//! # Feature flags
//!
//! The `std` feature is enabled by default. Without it the crates only depend on
//! `core` and `alloc`.
//!
//! # Examples
//!
//! ## Computing the cells of a few sites
//!
//! ```
//! use fortune::math::{point, Box2D};
//! use fortune::voronoi::{FortuneSweep, SiteId, VoronoiOptions};
//!
//! let sites = [
//!     point(300.0, 700.0),
//!     point(300.0, 300.0),
//!     point(700.0, 300.0),
//!     point(700.0, 700.0),
//! ];
//! let bounds = Box2D { min: point(0.0, 0.0), max: point(1000.0, 1000.0) };
//!
//! let mut sweep = FortuneSweep::new();
//! let diagram = sweep.build(&sites, &bounds, &VoronoiOptions::DEFAULT).unwrap();
//!
//! // Four edges meet at the center, eight pieces of the rectangle close the cells.
//! assert_eq!(diagram.edges().len(), 12);
//!
//! for edge in diagram.cell_edges(SiteId(0)) {
//!     println!("{:?} -> {:?}", edge.from, edge.to);
//! }
//! ```
//!
//! ## What is the tolerance?
//!
//! Sites that share a row, lie on a common circle or sit on the rectangle are valid
//! input. Telling these configurations apart requires approximate comparisons. The
//! tolerance in `VoronoiOptions` is relative: it is scaled by the magnitude of the
//! coordinates, so the same value works for unit squares and for map projections.

pub extern crate fortune_voronoi;

pub use fortune_voronoi as voronoi;
pub use voronoi::geom;

pub use voronoi::math;
