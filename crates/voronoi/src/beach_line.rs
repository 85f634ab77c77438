use crate::event_queue::CircleId;
use crate::geom::Parabola;
use crate::math::{Point, Tolerance};
use crate::{EdgeId, SiteId};

use alloc::vec::Vec;

/// Identifies an arc of the [BeachLine](struct.BeachLine.html).
///
/// Ids are never reused while the sweep runs: the slot of a removed arc stays in the
/// arena, marked dead, so that stale circle events can't point at a different arc.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArcId(pub u32);

impl ArcId {
    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Arc {
    site: SiteId,
    prev: Option<ArcId>,
    next: Option<ArcId>,
    /// The edge traced by the breakpoint between this arc and the next one.
    right_edge: Option<EdgeId>,
    circle: Option<CircleId>,
    alive: bool,
    // Search tree links.
    parent: Option<ArcId>,
    left: Option<ArcId>,
    right: Option<ArcId>,
    priority: u32,
}

/// Where a new site falls on the beach line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// Strictly below the arc.
    Above(ArcId),
    /// Below the breakpoint between two consecutive arcs, within tolerance.
    Breakpoint(ArcId, ArcId),
}

/// The sequence of parabolic arcs that separates the part of the plane that is
/// settled from the part that may still be claimed by sites below the sweep line.
///
/// Arcs live in an arena. They are doubly linked in increasing x order for constant
/// time access to the neighbors, and also form a treap ordered the same way so that
/// `locate` only evaluates O(log n) breakpoints.
///
/// Breakpoints move with the sweep line, so the tree can't store them as keys. It is
/// ordered implicitly by the positions at which arcs are inserted, and the keys are
/// computed while descending.
pub struct BeachLine {
    arcs: Vec<Arc>,
    first: Option<ArcId>,
    root: Option<ArcId>,
    len: usize,
}

impl Default for BeachLine {
    fn default() -> Self {
        Self::new()
    }
}

impl BeachLine {
    pub fn new() -> Self {
        BeachLine {
            arcs: Vec::new(),
            first: None,
            root: None,
            len: 0,
        }
    }

    pub fn reset(&mut self) {
        self.arcs.clear();
        self.first = None;
        self.root = None;
        self.len = 0;
    }

    /// Number of live arcs.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn first(&self) -> Option<ArcId> {
        self.first
    }

    #[inline]
    pub fn next(&self, arc: ArcId) -> Option<ArcId> {
        self.arcs[arc.to_usize()].next
    }

    #[inline]
    pub fn prev(&self, arc: ArcId) -> Option<ArcId> {
        self.arcs[arc.to_usize()].prev
    }

    #[inline]
    pub fn site(&self, arc: ArcId) -> SiteId {
        self.arcs[arc.to_usize()].site
    }

    #[inline]
    pub fn right_edge(&self, arc: ArcId) -> Option<EdgeId> {
        self.arcs[arc.to_usize()].right_edge
    }

    #[inline]
    pub fn set_right_edge(&mut self, arc: ArcId, edge: Option<EdgeId>) {
        self.arcs[arc.to_usize()].right_edge = edge;
    }

    #[inline]
    pub fn circle(&self, arc: ArcId) -> Option<CircleId> {
        self.arcs[arc.to_usize()].circle
    }

    #[inline]
    pub fn set_circle(&mut self, arc: ArcId, circle: Option<CircleId>) {
        self.arcs[arc.to_usize()].circle = circle;
    }

    #[inline]
    pub fn is_alive(&self, arc: ArcId) -> bool {
        self.arcs
            .get(arc.to_usize())
            .map(|arc| arc.alive)
            .unwrap_or(false)
    }

    fn add_arc(&mut self, site: SiteId, prev: Option<ArcId>, next: Option<ArcId>) -> ArcId {
        let idx = self.arcs.len() as u32;
        let id = ArcId(idx);
        self.arcs.push(Arc {
            site,
            prev,
            next,
            right_edge: None,
            circle: None,
            alive: true,
            parent: None,
            left: None,
            right: None,
            priority: priority(idx),
        });
        self.len += 1;

        id
    }

    /// Inserts the first arc of an empty beach line.
    pub fn insert_first(&mut self, site: SiteId) -> ArcId {
        debug_assert!(self.is_empty());
        let id = self.add_arc(site, None, None);
        self.first = Some(id);
        self.root = Some(id);

        id
    }

    /// Inserts a new arc on the right of `arc`.
    pub fn insert_after(&mut self, arc: ArcId, site: SiteId) -> ArcId {
        let next = self.next(arc);
        let id = self.add_arc(site, Some(arc), next);
        self.arcs[arc.to_usize()].next = Some(id);
        if let Some(next) = next {
            self.arcs[next.to_usize()].prev = Some(id);
        }

        // If `arc` has a right subtree, its successor is the leftmost node of it and has
        // no left child.
        match next {
            Some(next) if self.arcs[arc.to_usize()].right.is_some() => {
                self.attach(id, next, Side::Left)
            }
            _ => self.attach(id, arc, Side::Right),
        }

        id
    }

    /// Inserts a new arc on the left of `arc`.
    pub fn insert_before(&mut self, arc: ArcId, site: SiteId) -> ArcId {
        let prev = self.prev(arc);
        let id = self.add_arc(site, prev, Some(arc));
        self.arcs[arc.to_usize()].prev = Some(id);
        match prev {
            Some(prev) => self.arcs[prev.to_usize()].next = Some(id),
            None => self.first = Some(id),
        }

        match prev {
            Some(prev) if self.arcs[arc.to_usize()].left.is_some() => {
                self.attach(id, prev, Side::Right)
            }
            _ => self.attach(id, arc, Side::Left),
        }

        id
    }

    /// Unlinks an arc. Its slot stays in the arena, marked dead.
    pub fn remove(&mut self, arc: ArcId) {
        let (prev, next) = {
            let a = &mut self.arcs[arc.to_usize()];
            debug_assert!(a.alive);
            a.alive = false;
            (a.prev.take(), a.next.take())
        };

        match prev {
            Some(prev) => self.arcs[prev.to_usize()].next = next,
            None => self.first = next,
        }
        if let Some(next) = next {
            self.arcs[next.to_usize()].prev = prev;
        }

        self.detach(arc);
        self.len -= 1;
    }

    /// Iterates over the live arcs from left to right.
    pub fn iter(&self) -> Arcs<'_> {
        Arcs {
            beach: self,
            current: self.first,
        }
    }

    /// The x coordinate of the breakpoint between `left` and its right neighbor `right`
    /// when the sweep line is at `sweep_y`.
    #[inline]
    pub fn breakpoint_x(
        &self,
        left: ArcId,
        right: ArcId,
        sweep_y: f64,
        sites: &[Point],
        tolerance: &Tolerance,
    ) -> f64 {
        Parabola::breakpoint_x(
            sites[self.site(left).to_usize()],
            sites[self.site(right).to_usize()],
            sweep_y,
            tolerance,
        )
    }

    /// Finds the part of the beach line above `x`, with the sweep line at `sweep_y`.
    ///
    /// This is the leftmost arc whose right breakpoint is not definitely on the left of
    /// `x`. Returns `None` if the beach line is empty.
    pub fn locate(
        &self,
        x: f64,
        sweep_y: f64,
        sites: &[Point],
        tolerance: &Tolerance,
    ) -> Option<Location> {
        let mut node = self.root;
        let mut found = None;
        while let Some(arc) = node {
            let right_bp = self
                .next(arc)
                .map(|next| (next, self.breakpoint_x(arc, next, sweep_y, sites, tolerance)));

            let on_the_left = match right_bp {
                Some((_, bp)) => !tolerance.definitely_gt(x, bp),
                None => true,
            };

            let links = &self.arcs[arc.to_usize()];
            if on_the_left {
                found = Some((arc, right_bp));
                node = links.left;
            } else {
                node = links.right;
            }
        }

        let (arc, right_bp) = found?;
        Some(match right_bp {
            Some((next, bp)) if tolerance.approx_eq(x, bp) => Location::Breakpoint(arc, next),
            _ => Location::Above(arc),
        })
    }

    fn attach(&mut self, id: ArcId, parent: ArcId, side: Side) {
        match side {
            Side::Left => {
                debug_assert!(self.arcs[parent.to_usize()].left.is_none());
                self.arcs[parent.to_usize()].left = Some(id);
            }
            Side::Right => {
                debug_assert!(self.arcs[parent.to_usize()].right.is_none());
                self.arcs[parent.to_usize()].right = Some(id);
            }
        }
        self.arcs[id.to_usize()].parent = Some(parent);

        while let Some(parent) = self.arcs[id.to_usize()].parent {
            if self.arcs[parent.to_usize()].priority >= self.arcs[id.to_usize()].priority {
                break;
            }
            self.rotate_up(id);
        }
    }

    fn detach(&mut self, id: ArcId) {
        // Push the node down until it has at most one child.
        loop {
            let (left, right) = {
                let a = &self.arcs[id.to_usize()];
                (a.left, a.right)
            };
            let child = match (left, right) {
                (Some(l), Some(r)) => {
                    if self.arcs[l.to_usize()].priority > self.arcs[r.to_usize()].priority {
                        l
                    } else {
                        r
                    }
                }
                _ => break,
            };
            self.rotate_up(child);
        }

        let (parent, child) = {
            let a = &mut self.arcs[id.to_usize()];
            (a.parent.take(), a.left.take().or_else(|| a.right.take()))
        };
        if let Some(child) = child {
            self.arcs[child.to_usize()].parent = parent;
        }
        self.replace_child(parent, id, child);
    }

    /// Moves `id` one level up, keeping the in-order sequence.
    fn rotate_up(&mut self, id: ArcId) {
        let parent = match self.arcs[id.to_usize()].parent {
            Some(parent) => parent,
            None => return,
        };
        let grand_parent = self.arcs[parent.to_usize()].parent;

        if self.arcs[parent.to_usize()].left == Some(id) {
            let inner = self.arcs[id.to_usize()].right;
            self.arcs[parent.to_usize()].left = inner;
            if let Some(inner) = inner {
                self.arcs[inner.to_usize()].parent = Some(parent);
            }
            self.arcs[id.to_usize()].right = Some(parent);
        } else {
            let inner = self.arcs[id.to_usize()].left;
            self.arcs[parent.to_usize()].right = inner;
            if let Some(inner) = inner {
                self.arcs[inner.to_usize()].parent = Some(parent);
            }
            self.arcs[id.to_usize()].left = Some(parent);
        }

        self.arcs[parent.to_usize()].parent = Some(id);
        self.arcs[id.to_usize()].parent = grand_parent;
        self.replace_child(grand_parent, parent, Some(id));
    }

    fn replace_child(&mut self, parent: Option<ArcId>, old: ArcId, new: Option<ArcId>) {
        match parent {
            Some(parent) => {
                let p = &mut self.arcs[parent.to_usize()];
                if p.left == Some(old) {
                    p.left = new;
                } else {
                    debug_assert_eq!(p.right, Some(old));
                    p.right = new;
                }
            }
            None => self.root = new,
        }
    }

    #[cfg(test)]
    fn check_tree(&self) -> usize {
        fn visit(
            beach: &BeachLine,
            node: Option<ArcId>,
            parent: Option<ArcId>,
            order: &mut Vec<ArcId>,
        ) -> usize {
            let arc = match node {
                Some(arc) => arc,
                None => return 0,
            };
            let a = &beach.arcs[arc.to_usize()];
            assert!(a.alive);
            assert_eq!(a.parent, parent);
            if let Some(parent) = parent {
                assert!(beach.arcs[parent.to_usize()].priority >= a.priority);
            }
            let left = visit(beach, a.left, Some(arc), order);
            order.push(arc);
            let right = visit(beach, a.right, Some(arc), order);

            1 + left.max(right)
        }

        let mut order = Vec::new();
        let depth = visit(self, self.root, None, &mut order);
        assert_eq!(order, self.iter().collect::<Vec<_>>());
        assert_eq!(order.len(), self.len);

        depth
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Pseudo-random treap priorities, deterministic so that runs are reproducible.
///
/// This is a bijection, distinct arcs never have the same priority.
#[inline]
fn priority(idx: u32) -> u32 {
    let mut x = idx ^ 0x9e37_79b9;
    x = (x ^ (x >> 16)).wrapping_mul(0x85eb_ca6b);
    x = (x ^ (x >> 13)).wrapping_mul(0xc2b2_ae35);
    x ^ (x >> 16)
}

pub struct Arcs<'l> {
    beach: &'l BeachLine,
    current: Option<ArcId>,
}

impl<'l> Iterator for Arcs<'l> {
    type Item = ArcId;

    fn next(&mut self) -> Option<ArcId> {
        let current = self.current?;
        self.current = self.beach.next(current);

        Some(current)
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn linked_list() {
    let mut beach = BeachLine::new();
    assert!(beach.is_empty());
    assert_eq!(beach.first(), None);

    let a = beach.insert_first(SiteId(0));
    let c = beach.insert_after(a, SiteId(2));
    let b = beach.insert_before(c, SiteId(1));
    let z = beach.insert_before(a, SiteId(3));

    assert_eq!(beach.len(), 4);
    assert_eq!(beach.first(), Some(z));
    let order: Vec<ArcId> = beach.iter().collect();
    assert_eq!(order, [z, a, b, c]);
    assert_eq!(beach.prev(b), Some(a));
    assert_eq!(beach.next(b), Some(c));
    beach.check_tree();

    beach.remove(b);
    assert!(!beach.is_alive(b));
    assert!(beach.is_alive(a));
    assert_eq!(beach.next(a), Some(c));
    assert_eq!(beach.prev(c), Some(a));

    beach.remove(z);
    assert_eq!(beach.first(), Some(a));
    assert_eq!(beach.prev(a), None);
    assert_eq!(beach.len(), 2);

    let sites: Vec<SiteId> = beach.iter().map(|arc| beach.site(arc)).collect();
    assert_eq!(sites, [SiteId(0), SiteId(2)]);
    beach.check_tree();

    beach.reset();
    assert!(beach.is_empty());
    assert_eq!(beach.iter().count(), 0);
}

#[test]
fn locate_arcs() {
    let tolerance = Tolerance::new(1e-9);
    let sites = [point(500.0, 600.0), point(500.0, 400.0)];

    let mut beach = BeachLine::new();
    assert_eq!(beach.locate(10.0, 300.0, &sites, &tolerance), None);

    // The second site split the first arc in two.
    let left = beach.insert_first(SiteId(0));
    let middle = beach.insert_after(left, SiteId(1));
    let right = beach.insert_after(middle, SiteId(0));

    let sweep_y = 300.0;
    assert_eq!(
        beach.locate(100.0, sweep_y, &sites, &tolerance),
        Some(Location::Above(left))
    );
    assert_eq!(
        beach.locate(500.0, sweep_y, &sites, &tolerance),
        Some(Location::Above(middle))
    );
    assert_eq!(
        beach.locate(900.0, sweep_y, &sites, &tolerance),
        Some(Location::Above(right))
    );

    let bp = beach.breakpoint_x(left, middle, sweep_y, &sites, &tolerance);
    assert!((bp - 326.794919).abs() < 1e-5);
    assert_eq!(
        beach.locate(bp, sweep_y, &sites, &tolerance),
        Some(Location::Breakpoint(left, middle))
    );
}

#[test]
fn locate_on_flat_arcs() {
    let tolerance = Tolerance::new(1e-9);
    let sites = [point(100.0, 500.0), point(300.0, 500.0)];

    let mut beach = BeachLine::new();
    let a = beach.insert_first(SiteId(0));
    let b = beach.insert_after(a, SiteId(1));

    // Both sites are on the sweep line, the breakpoint is halfway.
    assert_eq!(
        beach.locate(200.0, 500.0, &sites, &tolerance),
        Some(Location::Breakpoint(a, b))
    );
    assert_eq!(
        beach.locate(150.0, 100.0, &sites, &tolerance),
        Some(Location::Above(a))
    );
    assert_eq!(
        beach.locate(400.0, 100.0, &sites, &tolerance),
        Some(Location::Above(b))
    );
}

#[test]
fn search_tree() {
    // Sites on the sweep line: each breakpoint is halfway between its two sites.
    let sites: Vec<Point> = (0..300).map(|i| point(i as f64 * 10.0, 500.0)).collect();
    let sweep_y = 500.0;
    let tolerance = Tolerance::new(1e-9);

    // Growing from the middle in both directions, the worst case for an unbalanced tree.
    let mut beach = BeachLine::new();
    let middle = beach.insert_first(SiteId(150));
    let mut last = middle;
    for i in 151..300 {
        last = beach.insert_after(last, SiteId(i));
    }
    let mut first = middle;
    for i in (0..150).rev() {
        first = beach.insert_before(first, SiteId(i));
    }
    assert_eq!(beach.len(), 300);
    assert!(beach.check_tree() < 64);

    let removed: Vec<ArcId> = beach.iter().filter(|arc| arc.0 % 3 == 1).collect();
    for arc in removed {
        beach.remove(arc);
    }
    assert!(beach.check_tree() < 64);

    // Same answers as walking the arcs in order.
    let linear = |x: f64| -> Location {
        let mut arc = beach.first().unwrap();
        loop {
            let next = match beach.next(arc) {
                Some(next) => next,
                None => return Location::Above(arc),
            };
            let bp = beach.breakpoint_x(arc, next, sweep_y, &sites, &tolerance);
            if tolerance.approx_eq(x, bp) {
                return Location::Breakpoint(arc, next);
            }
            if x < bp {
                return Location::Above(arc);
            }
            arc = next;
        }
    };

    let mut breakpoints = 0;
    for i in -10..3010 {
        let x = i as f64 * 2.5 - 1.0;
        for &x in &[x, x + 1.0] {
            let location = beach.locate(x, sweep_y, &sites, &tolerance);
            assert_eq!(location, Some(linear(x)), "at {}", x);
            if let Some(Location::Breakpoint(..)) = location {
                breakpoints += 1;
            }
        }
    }
    assert!(breakpoints > 0);
}
