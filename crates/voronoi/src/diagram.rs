use crate::math::{Box2D, LineSegment, Point};
use crate::SiteId;

use alloc::vec::Vec;

/// A straight edge of a clipped Voronoi diagram.
///
/// Walking from `from` to `to`, the `left` site is on the left and the `right` site on
/// the right. Edges on the sides of the clipping rectangle have no site on their right,
/// they run counter-clockwise around the rectangle. Both are `None` only if the diagram
/// has no sites at all.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub from: Point,
    pub to: Point,
    pub left: Option<SiteId>,
    pub right: Option<SiteId>,
}

impl Edge {
    /// Returns true if the edge is part of the clipping rectangle.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.left.is_none() || self.right.is_none()
    }

    #[inline]
    pub fn segment(&self) -> LineSegment {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    #[inline]
    pub fn has_site(&self, site: SiteId) -> bool {
        self.left == Some(site) || self.right == Some(site)
    }

    /// The site on the other side of the edge, if `site` borders it.
    #[inline]
    pub fn other_site(&self, site: SiteId) -> Option<SiteId> {
        if self.left == Some(site) {
            self.right
        } else if self.right == Some(site) {
            self.left
        } else {
            None
        }
    }

    /// The same edge, walked in the other direction.
    #[inline]
    pub fn flip(&self) -> Self {
        Edge {
            from: self.to,
            to: self.from,
            left: self.right,
            right: self.left,
        }
    }
}

/// A Voronoi diagram clipped to a rectangle.
///
/// Produced by [FortuneSweep::build](struct.FortuneSweep.html#method.build).
#[derive(Clone, Debug)]
pub struct VoronoiDiagram {
    bounds: Box2D,
    sites: Vec<Point>,
    edges: Vec<Edge>,
    duplicates: Vec<Option<SiteId>>,
}

impl VoronoiDiagram {
    pub(crate) fn new(
        bounds: Box2D,
        sites: Vec<Point>,
        edges: Vec<Edge>,
        duplicates: Vec<Option<SiteId>>,
    ) -> Self {
        VoronoiDiagram {
            bounds,
            sites,
            edges,
            duplicates,
        }
    }

    /// The clipping rectangle.
    #[inline]
    pub fn bounds(&self) -> &Box2D {
        &self.bounds
    }

    #[inline]
    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    #[inline]
    pub fn site(&self, id: SiteId) -> Point {
        self.sites[id.to_usize()]
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }

    /// The edges bordering the cell of a site.
    pub fn cell_edges(&self, site: SiteId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |edge| edge.has_site(site))
    }

    /// If a site was at the same position as another one (within tolerance), returns
    /// the site that owns the cell. Duplicated sites don't have edges.
    #[inline]
    pub fn duplicate_of(&self, site: SiteId) -> Option<SiteId> {
        self.duplicates.get(site.to_usize()).cloned().flatten()
    }

    /// The site whose cell contains `position`.
    ///
    /// On a cell boundary the smallest site id wins. Returns `None` if there are no
    /// sites.
    pub fn nearest_site(&self, position: Point) -> Option<SiteId> {
        let mut best: Option<(SiteId, f64)> = None;
        for (idx, site) in self.sites.iter().enumerate() {
            let id = SiteId::from_usize(idx);
            if self.duplicate_of(id).is_some() {
                continue;
            }

            let d = (*site - position).square_length();
            match best {
                Some((_, best_d)) if best_d <= d => {}
                _ => best = Some((id, d)),
            }
        }

        best.map(|(id, _)| id)
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn edge_sites() {
    let edge = Edge {
        from: point(0.0, 0.0),
        to: point(0.0, 10.0),
        left: Some(SiteId(3)),
        right: Some(SiteId(5)),
    };

    assert!(!edge.is_boundary());
    assert!(edge.has_site(SiteId(5)));
    assert!(!edge.has_site(SiteId(4)));
    assert_eq!(edge.other_site(SiteId(3)), Some(SiteId(5)));
    assert_eq!(edge.other_site(SiteId(5)), Some(SiteId(3)));
    assert_eq!(edge.other_site(SiteId(0)), None);
    assert_eq!(edge.segment().length(), 10.0);
    assert_eq!(edge.flip().flip(), edge);
    assert_eq!(edge.flip().left, Some(SiteId(5)));

    let boundary = Edge {
        left: Some(SiteId(1)),
        right: None,
        ..edge
    };
    assert!(boundary.is_boundary());
    assert_eq!(boundary.other_site(SiteId(1)), None);
}

#[test]
fn nearest() {
    let bounds = Box2D {
        min: point(0.0, 0.0),
        max: point(10.0, 10.0),
    };
    let sites = alloc::vec![point(2.0, 2.0), point(8.0, 8.0), point(2.0, 2.0)];
    let diagram = VoronoiDiagram::new(bounds, sites, Vec::new(), alloc::vec![None, None, Some(SiteId(0))]);

    assert_eq!(diagram.nearest_site(point(1.0, 1.0)), Some(SiteId(0)));
    assert_eq!(diagram.nearest_site(point(9.0, 7.0)), Some(SiteId(1)));
    // On the bisector.
    assert_eq!(diagram.nearest_site(point(5.0, 5.0)), Some(SiteId(0)));
    assert_eq!(diagram.duplicate_of(SiteId(2)), Some(SiteId(0)));
    assert_eq!(diagram.duplicate_of(SiteId(1)), None);
    assert!(diagram.is_empty());

    let empty = VoronoiDiagram::new(bounds, Vec::new(), Vec::new(), Vec::new());
    assert_eq!(empty.nearest_site(point(1.0, 1.0)), None);
}
