use crate::beach_line::ArcId;
use crate::math::{point, Point};
use crate::SiteId;

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Ordering;

/// Identifies a circle event in the [EventQueue](struct.EventQueue.html).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CircleId(pub u32);

impl CircleId {
    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
}

/// The prediction that an arc of the beach line will shrink to nothing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CircleEvent {
    /// The arc that disappears.
    pub arc: ArcId,
    /// The center of the circle through the sites of the arc and its two neighbors.
    pub center: Point,
    /// The lowest point of the circle, where the event fires.
    pub y: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event {
    Site {
        site: SiteId,
        position: Point,
    },
    Circle {
        id: CircleId,
        arc: ArcId,
        center: Point,
        y: f64,
    },
}

impl Event {
    /// The position of the sweep line's intersection with the event.
    #[inline]
    pub fn position(&self) -> Point {
        match *self {
            Event::Site { position, .. } => position,
            Event::Circle { center, y, .. } => point(center.x, y),
        }
    }

    #[inline]
    pub fn is_circle(&self) -> bool {
        match self {
            Event::Circle { .. } => true,
            Event::Site { .. } => false,
        }
    }
}

struct QueuedEvent {
    event: Event,
    order: u32,
}

impl QueuedEvent {
    // Circle events go first when two events have the same position.
    #[inline]
    fn kind(&self) -> u8 {
        if self.event.is_circle() {
            1
        } else {
            0
        }
    }
}

/// The order in which events are processed: larger y first, then smaller x, then
/// circle events before site events, then insertion order.
///
/// `BinaryHeap` pops the greatest element, so "comes first" means "is greater".
impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.event.position();
        let b = other.event.position();

        compare_f64(a.y, b.y)
            .then_with(|| compare_f64(b.x, a.x))
            .then_with(|| self.kind().cmp(&other.kind()))
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedEvent {}

// Positive and negative zeros compare equal. Positions are validated before they
// are queued so NaNs don't show up here.
#[inline]
fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// A priority queue of site and circle events for the sweep.
///
/// Circle events are not removed when they become stale: they are flagged as invalid
/// and skipped by `pop_next`.
pub struct EventQueue {
    heap: BinaryHeap<QueuedEvent>,
    circles: Vec<bool>,
    next_order: u32,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue {
            heap: BinaryHeap::new(),
            circles: Vec::new(),
            next_order: 0,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        EventQueue {
            heap: BinaryHeap::with_capacity(cap),
            circles: Vec::with_capacity(cap),
            next_order: 0,
        }
    }

    pub fn reset(&mut self) {
        self.heap.clear();
        self.circles.clear();
        self.next_order = 0;
    }

    fn push(&mut self, event: Event) {
        let order = self.next_order;
        self.next_order += 1;
        self.heap.push(QueuedEvent { event, order });
    }

    pub fn push_site(&mut self, site: SiteId, position: Point) {
        self.push(Event::Site { site, position });
    }

    pub fn push_circle(&mut self, circle: CircleEvent) -> CircleId {
        let id = CircleId(self.circles.len() as u32);
        self.circles.push(true);
        self.push(Event::Circle {
            id,
            arc: circle.arc,
            center: circle.center,
            y: circle.y,
        });

        id
    }

    /// Marks a circle event as a false alarm.
    #[inline]
    pub fn invalidate(&mut self, id: CircleId) {
        if let Some(valid) = self.circles.get_mut(id.to_usize()) {
            *valid = false;
        }
    }

    #[inline]
    pub fn is_valid(&self, id: CircleId) -> bool {
        self.circles.get(id.to_usize()).cloned().unwrap_or(false)
    }

    /// Removes and returns the next valid event.
    pub fn pop_next(&mut self) -> Option<Event> {
        while let Some(queued) = self.heap.pop() {
            if let Event::Circle { id, .. } = queued.event {
                if !self.is_valid(id) {
                    continue;
                }
                // A circle event fires at most once.
                self.circles[id.to_usize()] = false;
            }

            return Some(queued.event);
        }

        None
    }

    /// Number of queued events, including stale circle events.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
fn site_of(event: Option<Event>) -> Option<SiteId> {
    match event {
        Some(Event::Site { site, .. }) => Some(site),
        _ => None,
    }
}

#[test]
fn site_order() {
    let mut queue = EventQueue::new();
    queue.push_site(SiteId(0), point(0.0, 0.0));
    queue.push_site(SiteId(1), point(5.0, 10.0));
    queue.push_site(SiteId(2), point(-5.0, 10.0));
    queue.push_site(SiteId(3), point(3.0, -2.0));
    queue.push_site(SiteId(4), point(-5.0, 10.0));

    assert_eq!(queue.len(), 5);
    // Top to bottom, then left to right, then insertion order.
    assert_eq!(site_of(queue.pop_next()), Some(SiteId(2)));
    assert_eq!(site_of(queue.pop_next()), Some(SiteId(4)));
    assert_eq!(site_of(queue.pop_next()), Some(SiteId(1)));
    assert_eq!(site_of(queue.pop_next()), Some(SiteId(0)));
    assert_eq!(site_of(queue.pop_next()), Some(SiteId(3)));
    assert_eq!(queue.pop_next(), None);
    assert!(queue.is_empty());
}

#[test]
fn circle_before_site() {
    let mut queue = EventQueue::new();
    queue.push_site(SiteId(0), point(500.0, 300.0));
    let id = queue.push_circle(CircleEvent {
        arc: ArcId(3),
        center: point(500.0, 500.0),
        y: 300.0,
    });

    match queue.pop_next() {
        Some(Event::Circle { id: popped, arc, .. }) => {
            assert_eq!(popped, id);
            assert_eq!(arc, ArcId(3));
        }
        other => panic!("expected a circle event, got {:?}", other),
    }
    assert_eq!(site_of(queue.pop_next()), Some(SiteId(0)));
}

#[test]
fn stale_circle_events() {
    let mut queue = EventQueue::new();
    let a = queue.push_circle(CircleEvent {
        arc: ArcId(0),
        center: point(0.0, 10.0),
        y: 5.0,
    });
    let b = queue.push_circle(CircleEvent {
        arc: ArcId(1),
        center: point(0.0, 10.0),
        y: 4.0,
    });
    queue.push_site(SiteId(0), point(1.0, 1.0));

    assert!(queue.is_valid(a));
    queue.invalidate(a);
    assert!(!queue.is_valid(a));

    match queue.pop_next() {
        Some(Event::Circle { id, .. }) => assert_eq!(id, b),
        other => panic!("expected a circle event, got {:?}", other),
    }
    assert!(!queue.is_valid(b));
    assert_eq!(site_of(queue.pop_next()), Some(SiteId(0)));
    assert_eq!(queue.pop_next(), None);

    queue.reset();
    assert!(queue.is_empty());
    assert!(!queue.is_valid(b));
}

#[test]
fn signed_zeros_are_equal() {
    let mut queue = EventQueue::new();
    queue.push_site(SiteId(0), point(1.0, 0.0));
    queue.push_site(SiteId(1), point(0.0, -0.0));

    // Same y: sorted by x.
    assert_eq!(site_of(queue.pop_next()), Some(SiteId(1)));
    assert_eq!(site_of(queue.pop_next()), Some(SiteId(0)));
}
