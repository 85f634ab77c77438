use crate::math::Point;
use crate::SiteId;

use thiserror::Error;

/// The result type of the Voronoi construction.
pub type VoronoiResult<T> = Result<T, VoronoiError>;

/// Describes an unexpected state of the sweep.
///
/// These are never produced by valid input, however degenerate. If you run into one
/// of them, it is a bug.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum InternalError {
    #[error("Circle event on an arc without two neighbors")]
    CircleEventWithoutNeighbors,
    #[error("Breakpoint without an edge")]
    MissingBreakpointEdge,
    #[error("Edge {0} closed at two different vertices")]
    EdgeClosedTwice(u32),
}

/// The Voronoi construction's error enumeration.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum VoronoiError {
    #[error("Invalid clipping rectangle ({min:?} - {max:?}), min must be smaller than max on both axes")]
    InvalidBounds { min: Point, max: Point },
    #[error("Site {} has a NaN or infinite coordinate", .0.offset())]
    PositionIsNaN(SiteId),
    #[error("The tolerance must be finite and strictly positive")]
    InvalidTolerance,
    #[error("Internal error: {0}")]
    Internal(#[from] InternalError),
}

#[cfg(all(test, feature = "std"))]
#[test]
fn error_messages() {
    use std::string::ToString;

    let e = VoronoiError::PositionIsNaN(SiteId(4));
    assert_eq!(e.to_string(), "Site 4 has a NaN or infinite coordinate");

    let e: VoronoiError = InternalError::EdgeClosedTwice(2).into();
    assert_eq!(
        e.to_string(),
        "Internal error: Edge 2 closed at two different vertices"
    );
}
