use crate::diagram::{Edge, VoronoiDiagram};
use crate::graph::{DiagramGraph, GraphEdge};
use crate::math::{point, vector, Box2D, Point, Tolerance, Vector};
use crate::SiteId;

use alloc::vec::Vec;
use core::cmp::Ordering;

/// A point where the boundary of a cell reaches the rectangle, or a corner.
struct BoundaryPoint {
    /// Counter-clockwise distance along the rectangle from `(min.x, min.y)`.
    s: f64,
    position: Point,
    corner: bool,
    /// Sites of the edges ending at this point.
    sites: Vec<SiteId>,
}

/// Clips the output of the sweep against a rectangle and closes the cells along the
/// rectangle's sides.
pub struct BorderClipper {
    bounds: Box2D,
    tolerance: Tolerance,
}

impl BorderClipper {
    pub fn new(bounds: Box2D, tolerance: Tolerance) -> Self {
        BorderClipper { bounds, tolerance }
    }

    #[inline]
    pub fn bounds(&self) -> &Box2D {
        &self.bounds
    }

    #[inline]
    fn width(&self) -> f64 {
        self.bounds.max.x - self.bounds.min.x
    }

    #[inline]
    fn height(&self) -> f64 {
        self.bounds.max.y - self.bounds.min.y
    }

    #[inline]
    fn perimeter(&self) -> f64 {
        2.0 * (self.width() + self.height())
    }

    pub fn clip(&self, graph: &DiagramGraph) -> VoronoiDiagram {
        let mut edges = Vec::with_capacity(graph.edges().len() + 8);
        let mut points = self.corners();

        for graph_edge in graph.edges() {
            let edge = match self.clip_edge(graph_edge, graph) {
                Some(edge) => edge,
                None => continue,
            };

            for p in &[edge.from, edge.to] {
                if let Some(s) = self.perimeter_position(*p) {
                    points.push(BoundaryPoint {
                        s,
                        position: *p,
                        corner: false,
                        sites: alloc::vec![graph_edge.left, graph_edge.right],
                    });
                }
            }

            edges.push(edge);
        }

        let points = self.merge_points(points);
        self.add_boundary_edges(points, graph, &mut edges);

        VoronoiDiagram::new(
            self.bounds,
            graph.sites().to_vec(),
            edges,
            graph.duplicates().to_vec(),
        )
    }

    /// Clips an edge of the sweep's graph, returning `None` if nothing of it is
    /// left inside of the rectangle.
    pub fn clip_edge(&self, edge: &GraphEdge, graph: &DiagramGraph) -> Option<Edge> {
        let line = edge.line(graph.sites());
        let range = line.clipped_t(&self.bounds)?;

        let t_from = edge
            .from
            .map(|v| line.project_t(graph.vertex(v)))
            .unwrap_or(f64::NEG_INFINITY);
        let t_to = edge
            .to
            .map(|v| line.project_t(graph.vertex(v)))
            .unwrap_or(f64::INFINITY);

        let start = f64::max(t_from, range.start);
        let end = f64::min(t_to, range.end);
        if start > end {
            return None;
        }

        // Keep the vertices' exact positions when they are inside.
        let from = match edge.from {
            Some(v) if start == t_from => graph.vertex(v),
            _ => line.sample(start),
        };
        let to = match edge.to {
            Some(v) if end == t_to => graph.vertex(v),
            _ => line.sample(end),
        };

        let from = self.snap(from);
        let to = self.snap(to);

        if self.tolerance.points_approx_eq(from, to) || self.on_same_side(from, to) {
            return None;
        }

        Some(Edge {
            from,
            to,
            left: Some(edge.left),
            right: Some(edge.right),
        })
    }

    /// Moves coordinates that are within tolerance of the rectangle onto it and
    /// clamps the rest.
    fn snap(&self, p: Point) -> Point {
        let min = self.bounds.min;
        let max = self.bounds.max;
        let t = &self.tolerance;
        let x = t.snap(t.snap(p.x, min.x), max.x);
        let y = t.snap(t.snap(p.y, min.y), max.y);

        point(x.max(min.x).min(max.x), y.max(min.y).min(max.y))
    }

    fn on_same_side(&self, a: Point, b: Point) -> bool {
        let min = self.bounds.min;
        let max = self.bounds.max;

        (a.x == min.x && b.x == min.x)
            || (a.x == max.x && b.x == max.x)
            || (a.y == min.y && b.y == min.y)
            || (a.y == max.y && b.y == max.y)
    }

    /// Distance from the `(min.x, min.y)` corner going counter-clockwise, for points
    /// that are exactly on the rectangle.
    fn perimeter_position(&self, p: Point) -> Option<f64> {
        let min = self.bounds.min;
        let max = self.bounds.max;
        let w = self.width();
        let h = self.height();

        if p.y == min.y {
            Some(p.x - min.x)
        } else if p.x == max.x {
            Some(w + p.y - min.y)
        } else if p.y == max.y {
            Some(w + h + max.x - p.x)
        } else if p.x == min.x {
            Some(2.0 * w + h + max.y - p.y)
        } else {
            None
        }
    }

    /// The point at a given perimeter position and the direction pointing inside of
    /// the rectangle from there.
    fn point_at(&self, s: f64) -> (Point, Vector) {
        let min = self.bounds.min;
        let max = self.bounds.max;
        let w = self.width();
        let h = self.height();

        if s <= w {
            (point(min.x + s, min.y), vector(0.0, 1.0))
        } else if s <= w + h {
            (point(max.x, min.y + s - w), vector(-1.0, 0.0))
        } else if s <= 2.0 * w + h {
            (point(max.x - (s - w - h), max.y), vector(0.0, -1.0))
        } else {
            (point(min.x, max.y - (s - 2.0 * w - h)), vector(1.0, 0.0))
        }
    }

    fn corners(&self) -> Vec<BoundaryPoint> {
        let min = self.bounds.min;
        let max = self.bounds.max;
        let w = self.width();
        let h = self.height();

        let corner = |s: f64, position: Point| BoundaryPoint {
            s,
            position,
            corner: true,
            sites: Vec::new(),
        };

        alloc::vec![
            corner(0.0, min),
            corner(w, point(max.x, min.y)),
            corner(w + h, max),
            corner(2.0 * w + h, point(min.x, max.y)),
        ]
    }

    /// Sorts the boundary points and merges the ones that are within tolerance of
    /// each other. Corners win over the other points.
    fn merge_points(&self, mut points: Vec<BoundaryPoint>) -> Vec<BoundaryPoint> {
        points.sort_by(|a, b| {
            a.s.partial_cmp(&b.s)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.corner.cmp(&a.corner))
        });

        let mut merged: Vec<BoundaryPoint> = Vec::with_capacity(points.len());
        for p in points {
            if let Some(last) = merged.last_mut() {
                if self.tolerance.approx_eq(last.s, p.s) {
                    absorb(last, p);
                    continue;
                }
            }
            merged.push(p);
        }

        // The last point may be right before the first corner.
        if merged.len() > 1 {
            let perimeter = self.perimeter();
            let n = merged.len();
            if self.tolerance.approx_eq(merged[n - 1].s, perimeter + merged[0].s) {
                if let Some(last) = merged.pop() {
                    absorb(&mut merged[0], last);
                }
            }
        }

        merged
    }

    fn add_boundary_edges(
        &self,
        mut points: Vec<BoundaryPoint>,
        graph: &DiagramGraph,
        edges: &mut Vec<Edge>,
    ) {
        let n = points.len();
        let perimeter = self.perimeter();

        let mut owners: Vec<Option<SiteId>> = Vec::with_capacity(n);
        let mut candidates: Vec<SiteId> = Vec::new();
        for i in 0..n {
            let a = &points[i];
            let b = &points[(i + 1) % n];
            let end = if i + 1 == n { b.s + perimeter } else { b.s };
            let mut mid = (a.s + end) * 0.5;
            if mid >= perimeter {
                mid -= perimeter;
            }

            candidates.clear();
            candidates.extend_from_slice(&a.sites);
            candidates.extend_from_slice(&b.sites);
            if candidates.is_empty() {
                candidates.extend(
                    (0..graph.sites().len())
                        .map(SiteId::from_usize)
                        .filter(|s| graph.duplicate_of(*s).is_none()),
                );
            }
            candidates.sort();
            candidates.dedup();

            let (position, inward) = self.point_at(mid);
            let nudge = f64::min(end - a.s, f64::min(self.width(), self.height())) * 0.25;
            owners.push(self.nearest(&candidates, graph.sites(), position, inward * nudge));
        }

        // Merge consecutive stretches of the same cell, except around corners.
        let mut keep: Vec<bool> = Vec::with_capacity(n);
        for i in 0..n {
            let prev_owner = owners[(i + n - 1) % n];
            keep.push(points[i].corner || prev_owner != owners[i]);
        }

        let mut kept_points = Vec::with_capacity(n);
        let mut kept_owners = Vec::with_capacity(n);
        for (i, p) in points.drain(..).enumerate() {
            if keep[i] {
                kept_points.push(p.position);
                kept_owners.push(owners[i]);
            }
        }

        let n = kept_points.len();
        for i in 0..n {
            edges.push(Edge {
                from: kept_points[i],
                to: kept_points[(i + 1) % n],
                left: kept_owners[i],
                right: None,
            });
        }
    }

    /// The closest site to `position`, among `candidates`.
    ///
    /// Sites at the same distance within tolerance are compared at
    /// `position + nudge` and then by id.
    fn nearest(
        &self,
        candidates: &[SiteId],
        sites: &[Point],
        position: Point,
        nudge: Vector,
    ) -> Option<SiteId> {
        let distance = |site: SiteId, p: Point| (sites[site.to_usize()] - p).length();

        let mut best: Option<(SiteId, f64)> = None;
        for &site in candidates {
            let d = distance(site, position);
            best = match best {
                Some((best_site, best_d)) if best_d <= d => Some((best_site, best_d)),
                _ => Some((site, d)),
            };
        }

        let (best_site, best_d) = best?;

        let nudged = position + nudge;
        let mut result = best_site;
        let mut result_d = distance(best_site, nudged);
        for &site in candidates {
            if site == best_site || !self.tolerance.approx_eq(distance(site, position), best_d) {
                continue;
            }

            let d = distance(site, nudged);
            if self.tolerance.definitely_lt(d, result_d)
                || (!self.tolerance.definitely_gt(d, result_d) && site < result)
            {
                result = site;
                result_d = d;
            }
        }

        Some(result)
    }
}

fn absorb(target: &mut BoundaryPoint, p: BoundaryPoint) {
    if p.corner && !target.corner {
        target.s = p.s;
        target.position = p.position;
        target.corner = true;
    }
    target.sites.extend_from_slice(&p.sites);
}

#[cfg(test)]
fn test_clipper() -> BorderClipper {
    BorderClipper::new(
        Box2D {
            min: point(0.0, 0.0),
            max: point(1000.0, 1000.0),
        },
        Tolerance::for_extent(1e-9, 1000.0, 1000.0),
    )
}

#[test]
fn perimeter_positions() {
    let clipper = test_clipper();

    assert_eq!(clipper.perimeter_position(point(0.0, 0.0)), Some(0.0));
    assert_eq!(clipper.perimeter_position(point(250.0, 0.0)), Some(250.0));
    assert_eq!(clipper.perimeter_position(point(1000.0, 0.0)), Some(1000.0));
    assert_eq!(clipper.perimeter_position(point(1000.0, 300.0)), Some(1300.0));
    assert_eq!(clipper.perimeter_position(point(1000.0, 1000.0)), Some(2000.0));
    assert_eq!(clipper.perimeter_position(point(900.0, 1000.0)), Some(2100.0));
    assert_eq!(clipper.perimeter_position(point(0.0, 1000.0)), Some(3000.0));
    assert_eq!(clipper.perimeter_position(point(0.0, 400.0)), Some(3600.0));
    assert_eq!(clipper.perimeter_position(point(10.0, 400.0)), None);

    for &s in &[250.0, 1300.0, 2100.0, 3600.0] {
        let (p, inward) = clipper.point_at(s);
        assert_eq!(clipper.perimeter_position(p), Some(s));
        assert!(clipper.perimeter_position(p + inward).is_none());
    }
}

#[test]
fn snapping() {
    let clipper = test_clipper();

    assert_eq!(clipper.snap(point(1e-8, 500.0)), point(0.0, 500.0));
    assert_eq!(clipper.snap(point(1000.0 + 1e-8, 1000.0 - 1e-8)), point(1000.0, 1000.0));
    assert_eq!(clipper.snap(point(-3.0, 1200.0)), point(0.0, 1000.0));
    assert_eq!(clipper.snap(point(3.0, 5.0)), point(3.0, 5.0));
}

#[test]
fn clip_unbounded_edges() {
    let clipper = test_clipper();
    let sites = [point(500.0, 600.0), point(500.0, 400.0)];
    let mut graph = DiagramGraph::new(&sites);

    // Horizontal bisector, extending to infinity on both sides.
    let e = graph.add_edge(SiteId(1), SiteId(0), None);
    let edge = clipper.clip_edge(graph.edge(e), &graph).unwrap();
    // Walking from `from` to `to`, site 1 (below) is on the left: going right to left.
    assert_eq!(edge.from, point(1000.0, 500.0));
    assert_eq!(edge.to, point(0.0, 500.0));
    assert_eq!(edge.left, Some(SiteId(1)));
    assert_eq!(edge.right, Some(SiteId(0)));

    // Half of it.
    let v = graph.add_vertex(point(300.0, 500.0));
    let half = graph.add_edge(SiteId(1), SiteId(0), Some(v));
    let edge = clipper.clip_edge(graph.edge(half), &graph).unwrap();
    assert_eq!(edge.from, point(300.0, 500.0));
    assert_eq!(edge.to, point(0.0, 500.0));

    // Starting outside of the rectangle and going away from it.
    let w = graph.add_vertex(point(-100.0, 500.0));
    let outside = graph.add_edge(SiteId(1), SiteId(0), Some(w));
    assert_eq!(clipper.clip_edge(graph.edge(outside), &graph), None);
}

#[test]
fn clip_edge_along_side() {
    let clipper = test_clipper();
    // The bisector is the rectangle's bottom side.
    let sites = [point(500.0, 100.0), point(500.0, -100.0)];
    let mut graph = DiagramGraph::new(&sites);
    let e = graph.add_edge(SiteId(0), SiteId(1), None);

    assert_eq!(clipper.clip_edge(graph.edge(e), &graph), None);
}

#[test]
fn boundary_without_sites() {
    let clipper = test_clipper();
    let graph = DiagramGraph::new(&[]);
    let diagram = clipper.clip(&graph);

    assert_eq!(diagram.edges().len(), 4);
    let expected = [
        (point(0.0, 0.0), point(1000.0, 0.0)),
        (point(1000.0, 0.0), point(1000.0, 1000.0)),
        (point(1000.0, 1000.0), point(0.0, 1000.0)),
        (point(0.0, 1000.0), point(0.0, 0.0)),
    ];
    for (edge, &(from, to)) in diagram.edges().iter().zip(expected.iter()) {
        assert_eq!(edge.from, from);
        assert_eq!(edge.to, to);
        assert_eq!(edge.left, None);
        assert_eq!(edge.right, None);
    }
}

#[test]
fn boundary_owners() {
    let clipper = test_clipper();
    let sites = [point(500.0, 600.0), point(500.0, 400.0)];
    let mut graph = DiagramGraph::new(&sites);
    graph.add_edge(SiteId(1), SiteId(0), None);

    let diagram = clipper.clip(&graph);
    assert_eq!(diagram.edges().len(), 7);

    let boundary: Vec<&Edge> = diagram.edges().iter().filter(|e| e.is_boundary()).collect();
    assert_eq!(boundary.len(), 6);
    for edge in boundary {
        let mid = edge.segment().mid_point();
        let expected = if mid.y < 500.0 { SiteId(1) } else { SiteId(0) };
        assert_eq!(edge.left, Some(expected));
    }
}

#[test]
fn nearest_with_ties() {
    let clipper = test_clipper();
    // Both sites are at the same distance from the bottom side, but only
    // one of them is inside.
    let sites = [point(500.0, -100.0), point(500.0, 100.0)];
    let candidates = [SiteId(0), SiteId(1)];

    let owner = clipper.nearest(&candidates, &sites, point(500.0, 0.0), vector(0.0, 10.0));
    assert_eq!(owner, Some(SiteId(1)));

    // A true tie goes to the smallest id.
    let sites = [point(400.0, 100.0), point(600.0, 100.0)];
    let owner = clipper.nearest(&candidates, &sites, point(500.0, 0.0), vector(0.0, 10.0));
    assert_eq!(owner, Some(SiteId(0)));

    assert_eq!(clipper.nearest(&[], &sites, point(500.0, 0.0), vector(0.0, 1.0)), None);
}
