extern crate fortune;
#[macro_use]
extern crate bencher;

use fortune::math::{point, Box2D, Point, Tolerance};
use fortune::voronoi::{BorderClipper, FortuneSweep, VoronoiOptions};

use bencher::Bencher;

const N: usize = 10;

fn bounds() -> Box2D {
    Box2D {
        min: point(0.0, 0.0),
        max: point(1000.0, 1000.0),
    }
}

/// Sites scattered along a sunflower spiral, in general position.
fn spiral_sites(count: usize) -> Vec<Point> {
    let golden_angle = std::f64::consts::PI * (3.0 - 5.0f64.sqrt());
    (0..count)
        .map(|i| {
            let r = 480.0 * ((i as f64 + 0.5) / count as f64).sqrt();
            let a = i as f64 * golden_angle;
            point(500.0 + r * a.cos(), 500.0 + r * a.sin())
        })
        .collect()
}

/// Sites on a regular grid: every row is collinear and every cell has four cocircular sites.
fn grid_sites(side: usize) -> Vec<Point> {
    let step = 1000.0 / (side + 1) as f64;
    let mut sites = Vec::with_capacity(side * side);
    for y in 1..=side {
        for x in 1..=side {
            sites.push(point(x as f64 * step, y as f64 * step));
        }
    }

    sites
}

fn build_spiral_1k(bench: &mut Bencher) {
    let sites = spiral_sites(1000);
    let mut sweep = FortuneSweep::new();
    let options = VoronoiOptions::default();

    bench.iter(|| {
        for _ in 0..N {
            let diagram = sweep.build(&sites, &bounds(), &options).unwrap();
            bencher::black_box(diagram);
        }
    })
}

fn build_spiral_10k(bench: &mut Bencher) {
    let sites = spiral_sites(10_000);
    let mut sweep = FortuneSweep::new();
    let options = VoronoiOptions::default();

    bench.iter(|| {
        let diagram = sweep.build(&sites, &bounds(), &options).unwrap();
        bencher::black_box(diagram);
    })
}

fn build_grid(bench: &mut Bencher) {
    let sites = grid_sites(30);
    let mut sweep = FortuneSweep::new();
    let options = VoronoiOptions::default();

    bench.iter(|| {
        for _ in 0..N {
            let diagram = sweep.build(&sites, &bounds(), &options).unwrap();
            bencher::black_box(diagram);
        }
    })
}

fn sweep_only(bench: &mut Bencher) {
    let sites = spiral_sites(1000);
    let mut sweep = FortuneSweep::new();
    let options = VoronoiOptions::default();

    bench.iter(|| {
        for _ in 0..N {
            let graph = sweep.sweep(&sites, &options).unwrap();
            bencher::black_box(graph);
        }
    })
}

fn clip_only(bench: &mut Bencher) {
    let sites = spiral_sites(1000);
    let graph = FortuneSweep::new()
        .sweep(&sites, &VoronoiOptions::default())
        .unwrap();
    let clipper = BorderClipper::new(bounds(), Tolerance::for_extent(1e-9, 1000.0, 1000.0));

    bench.iter(|| {
        for _ in 0..N {
            bencher::black_box(clipper.clip(&graph));
        }
    })
}

benchmark_group!(build,
  build_spiral_1k,
  build_spiral_10k,
  build_grid
);

benchmark_group!(stages,
  sweep_only,
  clip_only
);

benchmark_main!(build, stages);
