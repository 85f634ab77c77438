use crate::beach_line::{ArcId, BeachLine, Location};
use crate::clip::BorderClipper;
use crate::diagram::VoronoiDiagram;
use crate::error::{InternalError, VoronoiError, VoronoiResult};
use crate::event_queue::{CircleEvent, Event, EventQueue};
use crate::geom::utils::{extent, is_normalized};
use crate::geom::{Parabola, Triangle};
use crate::graph::DiagramGraph;
use crate::math::{Box2D, Point, Tolerance};
use crate::{EdgeId, SiteId, VoronoiOptions};

#[cfg(debug_assertions)]
macro_rules! sweep_log {
    ($obj:ident, $fmt:expr) => (
        if $obj.log {
            log::debug!($fmt);
        }
    );
    ($obj:ident, $fmt:expr, $($arg:tt)*) => (
        if $obj.log {
            log::debug!($fmt, $($arg)*);
        }
    );
}

#[cfg(not(debug_assertions))]
macro_rules! sweep_log {
    ($obj:ident, $fmt:expr) => {};
    ($obj:ident, $fmt:expr, $($arg:tt)*) => {};
}

/// Computes Voronoi diagrams with Fortune's sweep-line algorithm.
///
/// The sweep keeps its internal buffers between constructions, reusing a
/// `FortuneSweep` avoids allocations when building many diagrams.
///
/// ## Example
///
/// ```
/// use fortune_voronoi::{FortuneSweep, VoronoiOptions};
/// use fortune_voronoi::math::{point, Box2D};
///
/// let sites = [
///     point(300.0, 700.0),
///     point(300.0, 300.0),
///     point(700.0, 300.0),
///     point(700.0, 700.0),
/// ];
/// let bounds = Box2D { min: point(0.0, 0.0), max: point(1000.0, 1000.0) };
///
/// let mut sweep = FortuneSweep::new();
/// let diagram = sweep.build(&sites, &bounds, &VoronoiOptions::DEFAULT).unwrap();
///
/// // Four spokes meeting at the center, and eight pieces of the rectangle.
/// assert_eq!(diagram.edges().iter().filter(|e| !e.is_boundary()).count(), 4);
/// assert_eq!(diagram.edges().len(), 12);
/// ```
pub struct FortuneSweep {
    events: EventQueue,
    beach: BeachLine,
    sweep_y: f64,
    tolerance: Tolerance,
    log: bool,
}

impl Default for FortuneSweep {
    fn default() -> Self {
        Self::new()
    }
}

impl FortuneSweep {
    /// Constructor.
    pub fn new() -> Self {
        #[cfg(all(debug_assertions, feature = "std"))]
        let log = std::env::var("FORTUNE_FORCE_LOGGING").is_ok();
        #[cfg(not(all(debug_assertions, feature = "std")))]
        let log = false;

        FortuneSweep {
            events: EventQueue::new(),
            beach: BeachLine::new(),
            sweep_y: f64::INFINITY,
            tolerance: Tolerance::new(VoronoiOptions::DEFAULT_TOLERANCE),
            log,
        }
    }

    /// Enable/disable some verbose logging during the sweep, for
    /// debugging purposes.
    pub fn set_logging(&mut self, is_enabled: bool) {
        #[cfg(all(debug_assertions, feature = "std"))]
        let forced = std::env::var("FORTUNE_FORCE_LOGGING").is_ok();

        #[cfg(not(all(debug_assertions, feature = "std")))]
        let forced = false;

        self.log = is_enabled || forced;
    }

    /// Builds the Voronoi diagram of `sites`, clipped to `bounds`.
    pub fn build(
        &mut self,
        sites: &[Point],
        bounds: &Box2D,
        options: &VoronoiOptions,
    ) -> VoronoiResult<VoronoiDiagram> {
        if !is_normalized(bounds) || !(bounds.min.is_finite() && bounds.max.is_finite()) {
            return Err(VoronoiError::InvalidBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }

        check_sites(sites)?;
        let corners = [bounds.min, bounds.max];
        let (span, magnitude) = extent(corners.iter().chain(sites.iter()).cloned());
        let tolerance = effective_tolerance(options, span, magnitude)?;

        let graph = self.sweep_impl(sites, tolerance)?;

        Ok(BorderClipper::new(*bounds, tolerance).clip(&graph))
    }

    /// Runs the sweep and returns the unclipped diagram.
    ///
    /// Edges that don't end at a Voronoi vertex extend to infinity.
    pub fn sweep(&mut self, sites: &[Point], options: &VoronoiOptions) -> VoronoiResult<DiagramGraph> {
        check_sites(sites)?;
        let (span, magnitude) = extent(sites.iter().cloned());
        let tolerance = effective_tolerance(options, span, magnitude)?;

        self.sweep_impl(sites, tolerance)
    }

    fn reset(&mut self, tolerance: Tolerance) {
        self.events.reset();
        self.beach.reset();
        self.sweep_y = f64::INFINITY;
        self.tolerance = tolerance;
    }

    fn sweep_impl(&mut self, sites: &[Point], tolerance: Tolerance) -> VoronoiResult<DiagramGraph> {
        self.reset(tolerance);
        let mut graph = DiagramGraph::new(sites);

        for (idx, position) in sites.iter().enumerate() {
            self.events.push_site(SiteId::from_usize(idx), *position);
        }

        sweep_log!(
            self,
            "sweep: {} sites, epsilon {:?}",
            sites.len(),
            tolerance.epsilon()
        );

        let result = self.sweep_loop(&mut graph);

        if let Err(e) = &result {
            sweep_log!(self, "Sweep failed with error: {}.", e);
            // Don't keep stale state around for the next construction.
            self.reset(tolerance);
        }
        result?;

        graph.remove_degenerate_edges(&self.tolerance);

        sweep_log!(
            self,
            "sweep done: {} vertices, {} edges",
            graph.vertices().len(),
            graph.edges().len()
        );

        self.events.reset();
        self.beach.reset();

        Ok(graph)
    }

    fn sweep_loop(&mut self, graph: &mut DiagramGraph) -> Result<(), InternalError> {
        while let Some(event) = self.events.pop_next() {
            // The sweep line only goes down, even if a circle event was computed
            // slightly above it.
            self.sweep_y = f64::min(self.sweep_y, event.position().y);

            match event {
                Event::Site { site, position } => {
                    self.handle_site_event(site, position, graph)?;
                }
                Event::Circle { arc, center, .. } => {
                    self.handle_circle_event(arc, center, graph)?;
                }
            }
        }

        Ok(())
    }

    fn handle_site_event(
        &mut self,
        site: SiteId,
        position: Point,
        graph: &mut DiagramGraph,
    ) -> Result<(), InternalError> {
        sweep_log!(self, "site event {:?} at {:?}", site, position);

        let location = match self
            .beach
            .locate(position.x, self.sweep_y, graph.sites(), &self.tolerance)
        {
            Some(location) => location,
            None => {
                self.beach.insert_first(site);
                return Ok(());
            }
        };

        // Coincident sites.
        let touched = match location {
            Location::Above(arc) => [Some(arc), None],
            Location::Breakpoint(left, right) => [Some(left), Some(right)],
        };
        for arc in touched.iter().flatten() {
            let other = self.beach.site(*arc);
            if self
                .tolerance
                .points_approx_eq(graph.site(other), position)
            {
                sweep_log!(self, " -> duplicate of {:?}", other);
                graph.set_duplicate(site, other);
                return Ok(());
            }
        }

        match location {
            Location::Above(arc) => {
                let arc_site = graph.site(self.beach.site(arc));
                if Parabola::new(arc_site, self.sweep_y).is_flat(&self.tolerance) {
                    // The arc is still a vertical half-line: the new site is on the
                    // same row as the arc's site.
                    if position.x < arc_site.x {
                        match self.beach.prev(arc) {
                            Some(prev) => self.site_on_breakpoint(site, position, prev, arc, graph),
                            None => {
                                self.insert_beside(site, arc, false, graph);
                                Ok(())
                            }
                        }
                    } else {
                        match self.beach.next(arc) {
                            Some(next) => self.site_on_breakpoint(site, position, arc, next, graph),
                            None => {
                                self.insert_beside(site, arc, true, graph);
                                Ok(())
                            }
                        }
                    }
                } else {
                    self.split_arc(site, arc, graph);
                    Ok(())
                }
            }
            Location::Breakpoint(left, right) => {
                self.site_on_breakpoint(site, position, left, right, graph)
            }
        }
    }

    /// The general case: the new site is strictly below an arc, which is split in
    /// two around a new, zero-width arc.
    fn split_arc(&mut self, site: SiteId, arc: ArcId, graph: &mut DiagramGraph) {
        sweep_log!(self, " -> split arc {:?}", arc);

        self.invalidate_circle(arc);

        let arc_site = self.beach.site(arc);
        let old_edge = self.beach.right_edge(arc);
        let middle = self.beach.insert_after(arc, site);
        let copy = self.beach.insert_after(middle, arc_site);

        // Both breakpoints start at the same point and trace the two halves of the
        // same bisector, away from each other.
        let edge = graph.add_edge(site, arc_site, None);
        self.beach.set_right_edge(arc, Some(edge));
        self.beach.set_right_edge(middle, Some(edge));
        self.beach.set_right_edge(copy, old_edge);

        self.check_circle(arc, graph);
        self.check_circle(copy, graph);
    }

    /// The new site is on the sweep line, next to a flat arc at the end of the
    /// beach line.
    fn insert_beside(&mut self, site: SiteId, arc: ArcId, after: bool, graph: &mut DiagramGraph) {
        sweep_log!(self, " -> insert beside flat arc {:?} (after: {})", arc, after);

        self.invalidate_circle(arc);

        // In both cases the edge comes down from infinity.
        let arc_site = self.beach.site(arc);
        if after {
            self.beach.insert_after(arc, site);
            let edge = graph.add_edge(site, arc_site, None);
            self.beach.set_right_edge(arc, Some(edge));
        } else {
            let new_arc = self.beach.insert_before(arc, site);
            let edge = graph.add_edge(arc_site, site, None);
            self.beach.set_right_edge(new_arc, Some(edge));
        }

        self.check_circle(arc, graph);
    }

    /// The new site is right below the breakpoint between `left` and `right`: a
    /// Voronoi vertex appears right away.
    fn site_on_breakpoint(
        &mut self,
        site: SiteId,
        position: Point,
        left: ArcId,
        right: ArcId,
        graph: &mut DiagramGraph,
    ) -> Result<(), InternalError> {
        sweep_log!(self, " -> on breakpoint {:?}|{:?}", left, right);

        self.invalidate_circle(left);
        self.invalidate_circle(right);

        let left_site = self.beach.site(left);
        let right_site = self.beach.site(right);
        let left_pos = graph.site(left_site);
        let right_pos = graph.site(right_site);
        let old_edge = self
            .beach
            .right_edge(left)
            .ok_or(InternalError::MissingBreakpointEdge)?;

        let left_flat = Parabola::new(left_pos, self.sweep_y).is_flat(&self.tolerance);
        let right_flat = Parabola::new(right_pos, self.sweep_y).is_flat(&self.tolerance);

        if left_flat && right_flat {
            // Three sites on the sweep line: the middle one separates the two others,
            // whose bisector isn't part of the diagram anymore.
            graph.discard(old_edge);
            let middle = self.beach.insert_after(left, site);
            let e1 = graph.add_edge(site, left_site, None);
            let e2 = graph.add_edge(right_site, site, None);
            self.beach.set_right_edge(left, Some(e1));
            self.beach.set_right_edge(middle, Some(e2));
            self.check_circle(left, graph);
            self.check_circle(right, graph);

            return Ok(());
        }

        let circumcenter = Triangle {
            a: left_pos,
            b: position,
            c: right_pos,
        }
        .circumcenter();
        let vertex_pos = match circumcenter {
            Some(p) => p,
            None => {
                let focus = if left_flat { right_pos } else { left_pos };
                Parabola::new(focus, self.sweep_y).sample(position.x)
            }
        };

        let vertex = graph.vertex_near(vertex_pos, &[Some(old_edge)], &self.tolerance);
        sweep_log!(self, " -> vertex {:?} at {:?}", vertex, vertex_pos);

        graph.close(old_edge, right_site, vertex)?;

        let middle = self.beach.insert_after(left, site);
        let e1 = graph.add_edge(site, left_site, Some(vertex));
        let e2 = graph.add_edge(right_site, site, Some(vertex));
        self.beach.set_right_edge(left, Some(e1));
        self.beach.set_right_edge(middle, Some(e2));

        self.check_circle(left, graph);
        self.check_circle(right, graph);

        Ok(())
    }

    fn handle_circle_event(
        &mut self,
        arc: ArcId,
        center: Point,
        graph: &mut DiagramGraph,
    ) -> Result<(), InternalError> {
        sweep_log!(self, "circle event {:?} at {:?}", arc, center);

        debug_assert!(self.beach.is_alive(arc));
        let (left, right) = match (self.beach.prev(arc), self.beach.next(arc)) {
            (Some(left), Some(right)) => (left, right),
            _ => return Err(InternalError::CircleEventWithoutNeighbors),
        };
        self.beach.set_circle(arc, None);

        let left_edge = self
            .beach
            .right_edge(left)
            .ok_or(InternalError::MissingBreakpointEdge)?;
        let right_edge = self
            .beach
            .right_edge(arc)
            .ok_or(InternalError::MissingBreakpointEdge)?;

        let vertex = graph.vertex_near(center, &[Some(left_edge), Some(right_edge)], &self.tolerance);
        sweep_log!(self, " -> vertex {:?}", vertex);

        let arc_site = self.beach.site(arc);
        let left_site = self.beach.site(left);
        let right_site = self.beach.site(right);

        graph.close(left_edge, arc_site, vertex)?;
        graph.close(right_edge, right_site, vertex)?;

        let edge: EdgeId = graph.add_edge(right_site, left_site, Some(vertex));
        self.beach.set_right_edge(left, Some(edge));
        self.beach.remove(arc);

        self.invalidate_circle(left);
        self.invalidate_circle(right);
        self.check_circle(left, graph);
        self.check_circle(right, graph);

        Ok(())
    }

    fn invalidate_circle(&mut self, arc: ArcId) {
        if let Some(circle) = self.beach.circle(arc) {
            sweep_log!(self, " -> false alarm {:?}", circle);
            self.events.invalidate(circle);
            self.beach.set_circle(arc, None);
        }
    }

    /// Schedules a circle event if the breakpoints on each side of `arc` converge.
    fn check_circle(&mut self, arc: ArcId, graph: &DiagramGraph) {
        let (left, right) = match (self.beach.prev(arc), self.beach.next(arc)) {
            (Some(left), Some(right)) => (left, right),
            _ => return,
        };

        let left_site = self.beach.site(left);
        let right_site = self.beach.site(right);
        if left_site == right_site {
            return;
        }

        let triangle = Triangle {
            a: graph.site(left_site),
            b: graph.site(self.beach.site(arc)),
            c: graph.site(right_site),
        };

        // The breakpoints only meet if the three sites turn right. Collinear sites
        // have parallel breakpoints.
        if !triangle.is_clockwise(&self.tolerance) {
            return;
        }

        let (center, radius) = match triangle.circumcircle() {
            Some(circle) => circle,
            None => return,
        };

        let y = f64::min(center.y - radius, self.sweep_y);
        let id = self.events.push_circle(CircleEvent { arc, center, y });
        self.beach.set_circle(arc, Some(id));

        sweep_log!(self, " -> schedule {:?} for arc {:?} at y={:?}", id, arc, y);
    }
}

fn check_sites(sites: &[Point]) -> VoronoiResult<()> {
    for (idx, p) in sites.iter().enumerate() {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(VoronoiError::PositionIsNaN(SiteId::from_usize(idx)));
        }
    }

    Ok(())
}

fn effective_tolerance(options: &VoronoiOptions, span: f64, magnitude: f64) -> VoronoiResult<Tolerance> {
    let t = options.tolerance;
    if !t.is_finite() || t <= 0.0 {
        return Err(VoronoiError::InvalidTolerance);
    }

    Ok(Tolerance::for_extent(t, span, magnitude))
}
