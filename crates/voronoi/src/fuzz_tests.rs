use crate::diagram_tests::check_diagram;
use crate::math::*;
use crate::{FortuneSweep, SiteId, VoronoiDiagram, VoronoiOptions};

use alloc::vec::Vec;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_sites(rng: &mut StdRng, count: usize, min: Point, max: Point) -> Vec<Point> {
    (0..count)
        .map(|_| point(rng.gen_range(min.x..max.x), rng.gen_range(min.y..max.y)))
        .collect()
}

fn run(sites: &[Point], bounds: &Box2D) -> VoronoiDiagram {
    let mut sweep = FortuneSweep::new();
    if std::env::var("FORTUNE_ENABLE_LOGGING").is_ok() {
        let _ = env_logger::builder().is_test(true).try_init();
        sweep.set_logging(true);
    }

    match sweep.build(sites, bounds, &VoronoiOptions::DEFAULT) {
        Ok(diagram) => diagram,
        Err(e) => panic!("{} with sites {:?}", e, sites),
    }
}

fn check_cells(diagram: &VoronoiDiagram) {
    let rect = diagram.bounds();
    for (idx, site) in diagram.sites().iter().enumerate() {
        let id = SiteId::from_usize(idx);
        if diagram.duplicate_of(id).is_some() {
            continue;
        }

        let inside = site.x > rect.min.x && site.x < rect.max.x && site.y > rect.min.y && site.y < rect.max.y;
        if inside {
            // A closed cell has at least three sides.
            assert!(diagram.cell_edges(id).count() >= 3, "open cell for {:?}", site);
            assert_eq!(diagram.nearest_site(*site), Some(id));
        }
    }
}

#[test]
fn random_sites_in_rectangle() {
    let bounds = Box2D {
        min: point(0.0, 0.0),
        max: point(1000.0, 1000.0),
    };

    for &count in &[2, 3, 4, 5, 8, 13, 30] {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sites = random_sites(&mut rng, count, bounds.min, bounds.max);
            let diagram = run(&sites, &bounds);
            check_diagram(&diagram);
            check_cells(&diagram);
        }
    }
}

#[test]
fn many_random_sites() {
    let bounds = Box2D {
        min: point(0.0, 0.0),
        max: point(1000.0, 1000.0),
    };

    for seed in 0..3 {
        let mut rng = StdRng::seed_from_u64(100 + seed);
        let sites = random_sites(&mut rng, 150, bounds.min, bounds.max);
        let diagram = run(&sites, &bounds);
        check_diagram(&diagram);
        check_cells(&diagram);

        // Each internal edge borders two cells, each boundary edge one.
        let cell_sides: usize = (0..sites.len())
            .map(|idx| diagram.cell_edges(SiteId::from_usize(idx)).count())
            .sum();
        let internal = diagram.edges().iter().filter(|e| !e.is_boundary()).count();
        assert_eq!(cell_sides, diagram.edges().len() + internal);
    }
}

#[test]
fn random_sites_around_rectangle() {
    let bounds = Box2D {
        min: point(0.0, 0.0),
        max: point(1000.0, 1000.0),
    };

    for seed in 0..30 {
        let mut rng = StdRng::seed_from_u64(1000 + seed);
        let sites = random_sites(&mut rng, 12, point(-500.0, -500.0), point(1500.0, 1500.0));
        check_diagram(&run(&sites, &bounds));
    }
}

#[test]
fn random_rectangles() {
    for seed in 0..30 {
        let mut rng = StdRng::seed_from_u64(2000 + seed);
        let min = point(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0));
        let max = point(
            min.x + rng.gen_range(1.0..200.0),
            min.y + rng.gen_range(1.0..200.0),
        );
        let bounds = Box2D { min, max };

        let sites = random_sites(&mut rng, 10, min, max);
        check_diagram(&run(&sites, &bounds));
    }
}

#[test]
fn offset_rectangles() {
    // The same sites in a unit square at the origin and far from it.
    let unit = Box2D {
        min: point(0.0, 0.0),
        max: point(1.0, 1.0),
    };

    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(5000 + seed);
        let sites = random_sites(&mut rng, 60, unit.min, unit.max);

        for &offset in &[1e3, 1e6] {
            let offset = vector(offset, offset);
            let far_sites: Vec<Point> = sites.iter().map(|p| *p + offset).collect();
            // Exact, so both diagrams have exactly the same input.
            let near_sites: Vec<Point> = far_sites.iter().map(|p| *p - offset).collect();
            let far_bounds = Box2D {
                min: unit.min + offset,
                max: unit.max + offset,
            };

            let near = run(&near_sites, &unit);
            let far = run(&far_sites, &far_bounds);
            check_diagram(&near);
            check_diagram(&far);
            check_cells(&near);
            check_cells(&far);

            assert_eq!(near.edges().len(), far.edges().len(), "offset {:?}", offset);
            for idx in 0..sites.len() {
                let id = SiteId::from_usize(idx);
                assert_eq!(near.cell_edges(id).count(), far.cell_edges(id).count());
            }
        }
    }
}

#[test]
fn sites_on_a_lattice() {
    // Plenty of collinear and cocircular sites, and some duplicates.
    let bounds = Box2D {
        min: point(0.0, 0.0),
        max: point(1000.0, 1000.0),
    };

    for seed in 0..40 {
        let mut rng = StdRng::seed_from_u64(3000 + seed);
        let sites: Vec<Point> = (0..10)
            .map(|_| {
                point(
                    rng.gen_range(0..11) as f64 * 100.0,
                    rng.gen_range(0..11) as f64 * 100.0,
                )
            })
            .collect();

        let diagram = run(&sites, &bounds);
        check_diagram(&diagram);
        check_cells(&diagram);

        for (idx, site) in sites.iter().enumerate() {
            let id = SiteId::from_usize(idx);
            let first = sites.iter().position(|p| p == site).map(SiteId::from_usize);
            if first == Some(id) {
                assert_eq!(diagram.duplicate_of(id), None);
            } else {
                assert_eq!(diagram.duplicate_of(id), first);
            }
        }
    }
}

#[test]
fn reusing_the_sweep() {
    let bounds = Box2D {
        min: point(0.0, 0.0),
        max: point(1000.0, 1000.0),
    };

    let mut sweep = FortuneSweep::new();
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(4000 + seed);
        let sites = random_sites(&mut rng, 20, bounds.min, bounds.max);

        let reused = sweep.build(&sites, &bounds, &VoronoiOptions::DEFAULT).unwrap();
        let fresh = run(&sites, &bounds);

        assert_eq!(reused.edges(), fresh.edges());
    }
}
