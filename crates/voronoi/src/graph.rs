use crate::error::InternalError;
use crate::geom::Line;
use crate::math::{Point, Tolerance};
use crate::{EdgeId, SiteId, VertexId};

use alloc::vec::Vec;

/// An edge of the unclipped diagram.
///
/// The edge lies on the bisector of its two sites. Walking from `from` to `to`, `left`
/// is on the left. A missing endpoint means that the edge extends to infinity in that
/// direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
    pub left: SiteId,
    pub right: SiteId,
    pub from: Option<VertexId>,
    pub to: Option<VertexId>,
}

impl GraphEdge {
    /// The oriented bisector supporting this edge.
    #[inline]
    pub fn line(&self, sites: &[Point]) -> Line<f64> {
        Line::bisector(sites[self.left.to_usize()], sites[self.right.to_usize()])
    }

    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() || self.to.is_none()
    }

    #[inline]
    pub fn has_site(&self, site: SiteId) -> bool {
        self.left == site || self.right == site
    }
}

/// The Voronoi diagram as produced by the sweep, before clipping.
#[derive(Clone, Debug, Default)]
pub struct DiagramGraph {
    sites: Vec<Point>,
    vertices: Vec<Point>,
    edges: Vec<GraphEdge>,
    discarded: Vec<bool>,
    duplicates: Vec<Option<SiteId>>,
}

impl DiagramGraph {
    pub fn new(sites: &[Point]) -> Self {
        let mut graph = DiagramGraph::default();
        graph.reset(sites);

        graph
    }

    pub fn reset(&mut self, sites: &[Point]) {
        self.sites.clear();
        self.sites.extend_from_slice(sites);
        self.vertices.clear();
        self.edges.clear();
        self.discarded.clear();
        self.duplicates.clear();
        self.duplicates.resize(sites.len(), None);
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
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> Point {
        self.vertices[id.to_usize()]
    }

    /// The edges of the graph.
    ///
    /// While the sweep runs this may contain discarded edges, they are removed by
    /// `remove_degenerate_edges`.
    #[inline]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &GraphEdge {
        &self.edges[id.to_usize()]
    }

    /// The site that `site` was found to duplicate, if any.
    #[inline]
    pub fn duplicate_of(&self, site: SiteId) -> Option<SiteId> {
        self.duplicates.get(site.to_usize()).cloned().flatten()
    }

    pub(crate) fn duplicates(&self) -> &[Option<SiteId>] {
        &self.duplicates
    }

    pub fn set_duplicate(&mut self, site: SiteId, original: SiteId) {
        self.duplicates[site.to_usize()] = Some(original);
    }

    pub fn add_vertex(&mut self, position: Point) -> VertexId {
        let id = VertexId::from_usize(self.vertices.len());
        self.vertices.push(position);

        id
    }

    /// Adds an edge with `left` on its left, starting at `from` (or at infinity).
    pub fn add_edge(&mut self, left: SiteId, right: SiteId, from: Option<VertexId>) -> EdgeId {
        debug_assert!(left != right);
        let id = EdgeId::from_usize(self.edges.len());
        self.edges.push(GraphEdge {
            left,
            right,
            from,
            to: None,
        });
        self.discarded.push(false);

        id
    }

    /// Ends an edge at a vertex.
    ///
    /// `breakpoint_right_site` is the site of the arc on the right of the breakpoint
    /// that traced the edge, which tells which end of the edge the breakpoint was
    /// moving.
    pub fn close(
        &mut self,
        edge: EdgeId,
        breakpoint_right_site: SiteId,
        vertex: VertexId,
    ) -> Result<(), InternalError> {
        let e = &mut self.edges[edge.to_usize()];
        let end = if e.left == breakpoint_right_site {
            &mut e.to
        } else {
            &mut e.from
        };

        match *end {
            Some(v) if v != vertex => Err(InternalError::EdgeClosedTwice(edge.offset())),
            _ => {
                *end = Some(vertex);
                Ok(())
            }
        }
    }

    /// Marks an edge as not part of the diagram.
    pub fn discard(&mut self, edge: EdgeId) {
        self.discarded[edge.to_usize()] = true;
    }

    /// Returns a vertex at `position`, reusing one of the given edges' endpoints if
    /// it is within tolerance.
    pub(crate) fn vertex_near(
        &mut self,
        position: Point,
        candidates: &[Option<EdgeId>],
        tolerance: &Tolerance,
    ) -> VertexId {
        for edge in candidates.iter().flatten() {
            let e = self.edges[edge.to_usize()];
            for v in e.from.iter().chain(e.to.iter()) {
                if tolerance.points_approx_eq(self.vertex(*v), position) {
                    return *v;
                }
            }
        }

        self.add_vertex(position)
    }

    /// Removes discarded edges as well as edges with both ends at the same position.
    ///
    /// This invalidates edge ids.
    pub fn remove_degenerate_edges(&mut self, tolerance: &Tolerance) {
        let vertices = &self.vertices;
        let discarded = &self.discarded;
        let mut idx = 0;
        self.edges.retain(|e| {
            let keep = !discarded[idx]
                && match (e.from, e.to) {
                    (Some(a), Some(b)) => {
                        a != b
                            && !tolerance
                                .points_approx_eq(vertices[a.to_usize()], vertices[b.to_usize()])
                    }
                    _ => true,
                };
            idx += 1;

            keep
        });
        self.discarded.clear();
        self.discarded.resize(self.edges.len(), false);
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn close_edges() {
    let sites = [point(0.0, 10.0), point(0.0, -10.0)];
    let mut graph = DiagramGraph::new(&sites);

    // Traced by the breakpoint between an arc of site 0 on the left and
    // an arc of site 1 on the right.
    let e = graph.add_edge(SiteId(1), SiteId(0), None);
    let line = graph.edge(e).line(graph.sites());
    assert!(line.signed_distance_to_point(&sites[1]) > 0.0);

    let v = graph.add_vertex(point(-20.0, 0.0));
    graph.close(e, SiteId(1), v).unwrap();
    assert_eq!(graph.edge(e).to, Some(v));
    assert_eq!(graph.edge(e).from, None);
    assert!(graph.edge(e).is_unbounded());

    let w = graph.add_vertex(point(20.0, 0.0));
    graph.close(e, SiteId(0), w).unwrap();
    assert_eq!(graph.edge(e).from, Some(w));
    assert!(!graph.edge(e).is_unbounded());

    // Closing again at the same vertex is fine, at another one is not.
    assert_eq!(graph.close(e, SiteId(1), v), Ok(()));
    assert_eq!(
        graph.close(e, SiteId(1), w),
        Err(InternalError::EdgeClosedTwice(0))
    );
}

#[test]
fn degenerate_edges() {
    let tolerance = Tolerance::new(1e-6);
    let sites = [point(0.0, 0.0), point(2.0, 0.0), point(0.0, 2.0)];
    let mut graph = DiagramGraph::new(&sites);

    let a = graph.add_vertex(point(1.0, 1.0));
    let b = graph.add_vertex(point(1.0, 1.0 + 1e-9));
    let c = graph.add_vertex(point(5.0, 5.0));

    let e0 = graph.add_edge(SiteId(0), SiteId(1), Some(a));
    graph.close(e0, SiteId(0), b).unwrap();
    let e1 = graph.add_edge(SiteId(1), SiteId(2), Some(a));
    graph.close(e1, SiteId(1), c).unwrap();
    let e2 = graph.add_edge(SiteId(0), SiteId(2), Some(c));
    graph.discard(e2);
    let _e3 = graph.add_edge(SiteId(2), SiteId(0), None);

    assert_eq!(graph.edges().len(), 4);
    graph.remove_degenerate_edges(&tolerance);

    assert_eq!(graph.edges().len(), 2);
    assert_eq!(graph.edges()[0].left, SiteId(1));
    assert_eq!(graph.edges()[1].left, SiteId(2));
}

#[test]
fn vertex_reuse() {
    let tolerance = Tolerance::new(1e-6);
    let sites = [point(0.0, 0.0), point(2.0, 0.0)];
    let mut graph = DiagramGraph::new(&sites);

    let a = graph.add_vertex(point(1.0, 1.0));
    let e = graph.add_edge(SiteId(0), SiteId(1), Some(a));

    assert_eq!(
        graph.vertex_near(point(1.0, 1.0 + 1e-8), &[None, Some(e)], &tolerance),
        a
    );
    let b = graph.vertex_near(point(1.0, 3.0), &[Some(e)], &tolerance);
    assert_ne!(a, b);
    assert_eq!(graph.vertices().len(), 2);

    assert_eq!(graph.duplicate_of(SiteId(1)), None);
    graph.set_duplicate(SiteId(1), SiteId(0));
    assert_eq!(graph.duplicate_of(SiteId(1)), Some(SiteId(0)));
}
