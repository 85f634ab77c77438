use crate::math::*;
use crate::{Edge, FortuneSweep, SiteId, VoronoiDiagram, VoronoiError, VoronoiOptions};

use alloc::vec::Vec;
use core::f64::consts::PI;

const SIZE: f64 = 1000.0;
const EPSILON: f64 = 1e-6;

fn bounds() -> Box2D {
    Box2D {
        min: point(0.0, 0.0),
        max: point(SIZE, SIZE),
    }
}

fn build(sites: &[Point], log: bool) -> VoronoiDiagram {
    if log {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    let mut sweep = FortuneSweep::new();
    sweep.set_logging(log);
    sweep
        .build(sites, &bounds(), &VoronoiOptions::DEFAULT)
        .unwrap()
}

/// Builds the diagram, checks its invariants and, if provided, its number of edges.
///
/// Set `FORTUNE_ENABLE_LOGGING` to get the sweep's log for a failing case.
fn test_sites(sites: &[Point], expected_edges: Option<usize>) -> VoronoiDiagram {
    let add_logging = std::env::var("FORTUNE_ENABLE_LOGGING").is_ok();

    let diagram = build(sites, false);
    if let Some(expected) = expected_edges {
        if diagram.edges().len() != expected {
            if add_logging {
                build(sites, true);
            }
            panic!(
                "expected {} edges, got {}: {:#?}",
                expected,
                diagram.edges().len(),
                diagram.edges()
            );
        }
    }

    check_diagram(&diagram);

    diagram
}

fn distance(a: Point, b: Point) -> f64 {
    (a - b).length()
}

fn is_duplicate(diagram: &VoronoiDiagram, site: SiteId) -> bool {
    diagram.duplicate_of(site).is_some()
}

/// Even-odd test against the edges of a cell.
fn cell_contains(diagram: &VoronoiDiagram, site: SiteId, p: Point) -> bool {
    let mut inside = false;
    for edge in diagram.cell_edges(site) {
        let (a, b) = (edge.from, edge.to);
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if x > p.x {
                inside = !inside;
            }
        }
    }

    inside
}

pub(crate) fn check_diagram(diagram: &VoronoiDiagram) {
    let rect = *diagram.bounds();
    let center = rect.center();
    let sites = diagram.sites();

    // Rounding errors grow with the size of the rectangle and with its distance to the origin.
    let magnitude = [rect.min.x, rect.min.y, rect.max.x, rect.max.y]
        .iter()
        .fold(0.0f64, |m, v| m.max(v.abs()));
    let epsilon = EPSILON * rect.width().max(rect.height()) / SIZE + 1e-13 * magnitude;

    for edge in diagram.edges() {
        // Containment.
        for p in &[edge.from, edge.to] {
            assert!(
                p.x >= rect.min.x && p.x <= rect.max.x && p.y >= rect.min.y && p.y <= rect.max.y,
                "{:?} is outside of the rectangle",
                edge
            );
        }
        assert!(distance(edge.from, edge.to) > epsilon, "zero length edge {:?}", edge);

        let direction = edge.to - edge.from;
        match (edge.left, edge.right) {
            (Some(left), Some(right)) => {
                assert_ne!(left, right);
                assert!(!is_duplicate(diagram, left) && !is_duplicate(diagram, right));

                let l = sites[left.to_usize()];
                let r = sites[right.to_usize()];
                assert!(direction.cross(l - edge.from) > 0.0, "left site on the right of {:?}", edge);
                assert!(direction.cross(r - edge.from) < 0.0, "right site on the left of {:?}", edge);

                // Every point of the edge is equidistant from both sites and no other site is closer.
                for &t in &[0.0, 0.25, 0.5, 0.75, 1.0] {
                    let p = edge.from.lerp(edge.to, t);
                    let dl = distance(p, l);
                    let dr = distance(p, r);
                    assert!((dl - dr).abs() < epsilon, "{:?} is not on a bisector ({} {})", edge, dl, dr);
                    for (idx, s) in sites.iter().enumerate() {
                        if is_duplicate(diagram, SiteId::from_usize(idx)) {
                            continue;
                        }
                        assert!(distance(p, *s) > dl - epsilon, "site {} is closer to {:?}", idx, edge);
                    }
                }
            }
            (owner, None) => {
                // Boundary edges run counter-clockwise.
                assert!(direction.cross(center - edge.from) > 0.0, "{:?} is not counter-clockwise", edge);
                let on_side = (edge.from.x == edge.to.x
                    && (edge.from.x == rect.min.x || edge.from.x == rect.max.x))
                    || (edge.from.y == edge.to.y
                        && (edge.from.y == rect.min.y || edge.from.y == rect.max.y));
                assert!(on_side, "{:?} is not on the rectangle", edge);

                match owner {
                    Some(owner) => {
                        let mid = edge.segment().mid_point();
                        let d = distance(mid, sites[owner.to_usize()]);
                        for s in sites {
                            assert!(distance(mid, *s) > d - epsilon, "wrong owner for {:?}", edge);
                        }
                    }
                    None => assert!(sites.is_empty()),
                }
            }
            (None, Some(_)) => panic!("boundary edge with a site on its right {:?}", edge),
        }
    }

    // The perimeter is entirely covered, once.
    let boundary_length: f64 = diagram
        .edges()
        .iter()
        .filter(|e| e.is_boundary())
        .map(|e| distance(e.from, e.to))
        .sum();
    let perimeter = 2.0 * (rect.width() + rect.height());
    assert!((boundary_length - perimeter).abs() < epsilon * 10.0);

    // Partition: points away from the cell boundaries are in the cell of their nearest
    // site and in no other.
    if sites.is_empty() {
        return;
    }
    let n = 23;
    for i in 0..n {
        for j in 0..n {
            let p = point(
                rect.min.x + (i as f64 + 0.37) * rect.width() / n as f64,
                rect.min.y + (j as f64 + 0.61) * rect.height() / n as f64,
            );

            let mut distances: Vec<(f64, usize)> = sites
                .iter()
                .enumerate()
                .filter(|(idx, _)| !is_duplicate(diagram, SiteId::from_usize(*idx)))
                .map(|(idx, s)| (distance(p, *s), idx))
                .collect();
            distances.sort_by(|a, b| a.partial_cmp(b).unwrap());
            if distances.len() > 1 && distances[1].0 - distances[0].0 < epsilon * 1000.0 {
                continue;
            }
            let nearest = SiteId::from_usize(distances[0].1);

            for idx in 0..sites.len() {
                let site = SiteId::from_usize(idx);
                assert_eq!(
                    cell_contains(diagram, site, p),
                    site == nearest,
                    "{:?} and the cell of {:?}",
                    p,
                    site
                );
            }
        }
    }
}

fn edge_matches(a: &Edge, b: &Edge) -> bool {
    let close = |p: Point, q: Point| distance(p, q) < EPSILON * 10.0;
    let same_direction = close(a.from, b.from) && close(a.to, b.to);
    let reversed = close(a.from, b.to) && close(a.to, b.from);

    let mut sa = [a.left, a.right];
    let mut sb = [b.left, b.right];
    sa.sort();
    sb.sort();

    (same_direction || reversed) && sa == sb
}

fn assert_same_edges(actual: &[Edge], expected: &[Edge]) {
    assert_eq!(actual.len(), expected.len(), "{:#?}\n{:#?}", actual, expected);

    let mut used = alloc::vec![false; actual.len()];
    for e in expected {
        let found = actual
            .iter()
            .enumerate()
            .position(|(idx, a)| !used[idx] && edge_matches(a, e));
        match found {
            Some(idx) => used[idx] = true,
            None => panic!("missing edge {:?} in {:#?}", e, actual),
        }
    }
}

fn rotate_90(p: Point) -> Point {
    point(SIZE - p.y, p.x)
}

fn rotate_180(p: Point) -> Point {
    point(SIZE - p.x, SIZE - p.y)
}

fn rotate_270(p: Point) -> Point {
    point(p.y, SIZE - p.x)
}

fn mirror(p: Point) -> Point {
    point(SIZE - p.x, p.y)
}

/// Checks that transforming the sites transforms the diagram the same way.
fn test_with_rotations(sites: &[Point], expected_edges: usize) {
    let reference = test_sites(sites, Some(expected_edges));

    let transforms: [fn(Point) -> Point; 4] = [rotate_90, rotate_180, rotate_270, mirror];
    for transform in &transforms {
        let transformed_sites: Vec<Point> = sites.iter().map(|p| transform(*p)).collect();
        let diagram = test_sites(&transformed_sites, Some(expected_edges));

        let expected: Vec<Edge> = reference
            .edges()
            .iter()
            .map(|e| Edge {
                from: transform(e.from),
                to: transform(e.to),
                ..*e
            })
            .collect();

        assert_same_edges(diagram.edges(), &expected);
    }
}

#[test]
fn no_sites() {
    let diagram = test_sites(&[], Some(4));
    for edge in diagram.edges() {
        assert_eq!(edge.left, None);
        assert_eq!(edge.right, None);
    }
}

#[test]
fn one_site() {
    for &site in &[
        point(500.0, 500.0),
        point(123.0, 871.0),
        point(0.0, 0.0),
        point(1000.0, 350.0),
        point(2000.0, -50.0),
    ] {
        let diagram = test_sites(&[site], Some(4));
        for edge in diagram.edges() {
            assert_eq!(edge.left, Some(SiteId(0)));
            assert_eq!(edge.right, None);
        }
    }

    test_with_rotations(&[point(200.0, 700.0)], 4);
}

#[test]
fn two_sites_stacked() {
    let sites = [point(500.0, 600.0), point(500.0, 400.0)];
    let diagram = test_sites(&sites, Some(7));

    let internal: Vec<&Edge> = diagram.edges().iter().filter(|e| !e.is_boundary()).collect();
    assert_eq!(internal.len(), 1);
    let bisector = internal[0];
    assert!(edge_matches(
        bisector,
        &Edge {
            from: point(0.0, 500.0),
            to: point(1000.0, 500.0),
            left: Some(SiteId(0)),
            right: Some(SiteId(1)),
        }
    ));
    assert_eq!(diagram.cell_edges(SiteId(0)).count(), 4);
    assert_eq!(diagram.cell_edges(SiteId(1)).count(), 4);

    test_with_rotations(&sites, 7);
}

#[test]
fn two_sites() {
    test_with_rotations(&[point(400.0, 500.0), point(600.0, 500.0)], 7);
    test_with_rotations(&[point(100.0, 200.0), point(700.0, 900.0)], 7);
    // On the rectangle.
    test_with_rotations(&[point(0.0, 500.0), point(1000.0, 500.0)], 7);
    // The bisector goes through two corners.
    test_with_rotations(&[point(0.0, 0.0), point(1000.0, 1000.0)], 5);
    test_with_rotations(&[point(300.0, 300.0), point(700.0, 700.0)], 5);
}

#[test]
fn two_sites_with_bisector_on_the_rectangle() {
    // The bisector is the top side.
    let diagram = test_sites(&[point(500.0, 500.0), point(500.0, 1500.0)], Some(4));
    for edge in diagram.edges() {
        assert_eq!(edge.left, Some(SiteId(0)));
    }

    // The bisector is outside.
    let diagram = test_sites(&[point(500.0, 500.0), point(500.0, 2000.0)], Some(4));
    for edge in diagram.edges() {
        assert_eq!(edge.left, Some(SiteId(0)));
    }
    assert_eq!(diagram.cell_edges(SiteId(1)).count(), 0);

    test_with_rotations(&[point(500.0, 500.0), point(500.0, 1500.0)], 4);
}

#[test]
fn square() {
    let sites = [
        point(300.0, 700.0),
        point(300.0, 300.0),
        point(700.0, 300.0),
        point(700.0, 700.0),
    ];
    let diagram = test_sites(&sites, Some(12));

    let spokes: Vec<&Edge> = diagram.edges().iter().filter(|e| !e.is_boundary()).collect();
    assert_eq!(spokes.len(), 4);
    for spoke in spokes {
        let at_center = distance(spoke.from, point(500.0, 500.0)) < EPSILON
            || distance(spoke.to, point(500.0, 500.0)) < EPSILON;
        assert!(at_center, "{:?}", spoke);
    }

    test_with_rotations(&sites, 12);
}

#[test]
fn diamond() {
    // The spokes end at the corners.
    test_with_rotations(
        &[
            point(500.0, 700.0),
            point(300.0, 500.0),
            point(700.0, 500.0),
            point(500.0, 300.0),
        ],
        8,
    );
}

#[test]
fn sites_in_corners() {
    test_with_rotations(
        &[
            point(0.0, 0.0),
            point(1000.0, 0.0),
            point(1000.0, 1000.0),
            point(0.0, 1000.0),
        ],
        12,
    );
}

#[test]
fn collinear_sites() {
    test_with_rotations(
        &[point(500.0, 800.0), point(500.0, 500.0), point(500.0, 200.0)],
        10,
    );
    test_with_rotations(
        &[point(200.0, 500.0), point(500.0, 500.0), point(800.0, 500.0)],
        10,
    );
    test_with_rotations(
        &[point(200.0, 200.0), point(500.0, 500.0), point(800.0, 800.0)],
        10,
    );
    // Input order doesn't matter.
    test_with_rotations(
        &[point(800.0, 500.0), point(200.0, 500.0), point(500.0, 500.0)],
        10,
    );
}

#[test]
fn grid() {
    let mut sites = Vec::new();
    for &y in &[250.0, 500.0, 750.0] {
        for &x in &[250.0, 500.0, 750.0] {
            sites.push(point(x, y));
        }
    }

    test_with_rotations(&sites, 24);
}

#[test]
fn cocircular_sites() {
    let sites: Vec<Point> = (0..8)
        .map(|i| {
            let angle = i as f64 * PI / 4.0;
            point(500.0 + 300.0 * angle.cos(), 500.0 + 300.0 * angle.sin())
        })
        .collect();

    let diagram = test_sites(&sites, Some(20));
    // All the cells meet at the center.
    for edge in diagram.edges().iter().filter(|e| !e.is_boundary()) {
        let at_center = distance(edge.from, point(500.0, 500.0)) < EPSILON
            || distance(edge.to, point(500.0, 500.0)) < EPSILON;
        assert!(at_center, "{:?}", edge);
    }

    test_with_rotations(&sites, 20);
}

#[test]
fn circle_event_on_the_rectangle() {
    // The three sites are on a circle centered at (500, 100) that touches the bottom side.
    let sites = [point(400.0, 100.0), point(600.0, 100.0), point(500.0, 200.0)];

    let diagram = test_sites(&sites, Some(10));
    let vertex = point(500.0, 100.0);
    for edge in diagram.edges().iter().filter(|e| !e.is_boundary()) {
        assert!(distance(edge.from, vertex) < EPSILON || distance(edge.to, vertex) < EPSILON);
    }

    test_with_rotations(&sites, 10);
}

#[test]
fn vertex_on_the_rectangle() {
    // Cocircular around (500, 0): the cells meet on the bottom side and the bisector of
    // the two lower sites is entirely outside.
    let sites = [point(400.0, 75.0), point(600.0, 75.0), point(500.0, 125.0)];

    let diagram = test_sites(&sites, Some(7));
    let internal: Vec<&Edge> = diagram.edges().iter().filter(|e| !e.is_boundary()).collect();
    assert_eq!(internal.len(), 2);
    for edge in internal {
        let vertex = point(500.0, 0.0);
        assert!(edge.has_site(SiteId(2)));
        assert!(distance(edge.from, vertex) < EPSILON || distance(edge.to, vertex) < EPSILON);
    }

    test_with_rotations(&sites, 7);
}

#[test]
fn duplicated_sites() {
    let sites = [point(500.0, 600.0), point(500.0, 400.0), point(500.0, 600.0)];
    let diagram = test_sites(&sites, Some(7));

    assert_eq!(diagram.duplicate_of(SiteId(2)), Some(SiteId(0)));
    assert_eq!(diagram.duplicate_of(SiteId(0)), None);
    assert_eq!(diagram.duplicate_of(SiteId(1)), None);
    assert_eq!(diagram.cell_edges(SiteId(2)).count(), 0);

    // Within tolerance.
    let sites = [point(500.0, 600.0), point(500.0 + 1e-9, 600.0), point(500.0, 400.0)];
    let diagram = test_sites(&sites, Some(7));
    assert_eq!(diagram.duplicate_of(SiteId(1)), Some(SiteId(0)));

    test_with_rotations(
        &[point(500.0, 600.0), point(500.0, 400.0), point(500.0, 600.0)],
        7,
    );
}

#[test]
fn idempotence() {
    let sites = [
        point(123.0, 456.0),
        point(789.0, 12.0),
        point(345.0, 678.0),
        point(901.0, 234.0),
        point(567.0, 890.0),
        point(500.0, 500.0),
        point(300.0, 300.0),
        point(700.0, 300.0),
    ];

    let mut sweep = FortuneSweep::new();
    let a = sweep.build(&sites, &bounds(), &VoronoiOptions::DEFAULT).unwrap();
    let b = sweep.build(&sites, &bounds(), &VoronoiOptions::DEFAULT).unwrap();
    let c = FortuneSweep::new()
        .build(&sites, &bounds(), &VoronoiOptions::DEFAULT)
        .unwrap();

    assert_eq!(a.edges(), b.edges());
    assert_eq!(a.edges(), c.edges());
    check_diagram(&a);
}

#[test]
fn unclipped_graph() {
    let mut sweep = FortuneSweep::new();
    let graph = sweep
        .sweep(&[point(500.0, 600.0), point(500.0, 400.0)], &VoronoiOptions::DEFAULT)
        .unwrap();

    assert_eq!(graph.edges().len(), 1);
    assert!(graph.vertices().is_empty());
    let edge = graph.edges()[0];
    assert_eq!(edge.from, None);
    assert_eq!(edge.to, None);
    assert_eq!(edge.left, SiteId(1));
    assert_eq!(edge.right, SiteId(0));

    let graph = sweep
        .sweep(
            &[point(300.0, 700.0), point(300.0, 300.0), point(700.0, 300.0), point(700.0, 700.0)],
            &VoronoiOptions::DEFAULT,
        )
        .unwrap();
    assert_eq!(graph.edges().len(), 4);
    assert_eq!(graph.vertices().len(), 1);
    for edge in graph.edges() {
        assert!(edge.is_unbounded());
        assert!(edge.from.is_some() || edge.to.is_some());
    }
}

#[test]
fn logging() {
    let _ = env_logger::builder().is_test(true).try_init();
    let diagram = build(&[point(100.0, 100.0), point(900.0, 150.0), point(500.0, 800.0)], true);
    check_diagram(&diagram);
}

#[test]
fn invalid_input() {
    let mut sweep = FortuneSweep::new();
    let options = VoronoiOptions::DEFAULT;
    let sites = [point(1.0, 1.0)];

    let flat = Box2D {
        min: point(0.0, 0.0),
        max: point(10.0, 0.0),
    };
    assert_eq!(
        sweep.build(&sites, &flat, &options).unwrap_err(),
        VoronoiError::InvalidBounds {
            min: flat.min,
            max: flat.max
        }
    );

    let inverted = Box2D {
        min: point(10.0, 0.0),
        max: point(0.0, 10.0),
    };
    assert!(matches!(
        sweep.build(&sites, &inverted, &options),
        Err(VoronoiError::InvalidBounds { .. })
    ));

    for &(min, max) in &[
        (point(0.0, 0.0), point(f64::INFINITY, 10.0)),
        (point(f64::NEG_INFINITY, 0.0), point(10.0, 10.0)),
        (point(0.0, f64::NEG_INFINITY), point(10.0, 10.0)),
        (point(0.0, 0.0), point(10.0, f64::INFINITY)),
    ] {
        assert!(matches!(
            sweep.build(&sites, &Box2D { min, max }, &options),
            Err(VoronoiError::InvalidBounds { .. })
        ));
    }

    assert_eq!(
        sweep
            .build(&[point(1.0, 1.0), point(f64::NAN, 2.0)], &bounds(), &options)
            .unwrap_err(),
        VoronoiError::PositionIsNaN(SiteId(1))
    );

    for &tolerance in &[0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert_eq!(
            sweep
                .build(&sites, &bounds(), &VoronoiOptions::tolerance(tolerance))
                .unwrap_err(),
            VoronoiError::InvalidTolerance
        );
    }

    // The sweep is still usable after errors.
    assert_eq!(
        sweep.build(&sites, &bounds(), &options).unwrap().edges().len(),
        4
    );
}

#[test]
fn rotated_by_arbitrary_angles() {
    // Non-axis aligned rotations are not exact, the diagram must still be valid.
    let sites = [
        point(300.0, 700.0),
        point(300.0, 300.0),
        point(700.0, 300.0),
        point(700.0, 700.0),
        point(500.0, 500.0),
    ];
    let center = point(500.0, 500.0);

    let mut angle = 0.0;
    while angle < 2.0 * PI {
        let rotation = Rotation::new(Angle::radians(angle));
        let rotated: Vec<Point> = sites
            .iter()
            .map(|p| center + rotation.transform_vector(*p - center))
            .collect();

        test_sites(&rotated, None);
        angle += 0.13;
    }
}
