/*
 * Flock Benchmark
 *
 * Measures the pieces of a simulation tick: neighbor lookup with and without
 * the spatial grid, the per-fish steering sum, and the full tick.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

use koi_aquarium::{BoidState, BruteForce, Flock, NeighborQuery, SimulationParams, SpatialGrid};

fn stocked(num_fish: usize, spatial_grid: bool) -> (Flock, ChaCha8Rng) {
    let mut params = SimulationParams::default();
    params.num_fish = num_fish;
    params.enable_spatial_grid = spatial_grid;
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let flock = Flock::stocked(params, &mut rng).expect("default params are valid");
    (flock, rng)
}

// Neighbor queries for every fish, brute force vs grid
fn bench_neighbor_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_queries");

    for num_fish in [40, 200, 800].iter() {
        let (flock, _) = stocked(*num_fish, false);
        let states: Vec<BoidState> = flock.states();
        let radius = flock.params().max_radius();
        let mut grid = SpatialGrid::new(radius / 2.0, &flock.bounds);
        grid.rebuild(&states);

        group.bench_with_input(BenchmarkId::new("brute_force", num_fish), &states, |b, states| {
            let mut out = Vec::new();
            b.iter(|| {
                for i in 0..states.len() {
                    BruteForce.neighbors_within(states, i, radius, &mut out);
                    black_box(&out);
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("grid", num_fish), &states, |b, states| {
            let mut out = Vec::new();
            b.iter(|| {
                for i in 0..states.len() {
                    grid.neighbors_within(states, i, radius, &mut out);
                    black_box(&out);
                }
            });
        });
    }

    group.finish();
}

// Separation, alignment and cohesion for one fish against its neighbors
fn bench_force_calculations(c: &mut Criterion) {
    let mut group = c.benchmark_group("force_calculations");

    for num_fish in [40, 200, 800].iter() {
        let (flock, _) = stocked(*num_fish, false);
        let states = flock.states();
        let params = flock.params().clone();
        let mut neighbors = Vec::new();
        BruteForce.neighbors_within(&states, 0, params.max_radius(), &mut neighbors);
        let fish = &flock.fish[0];

        group.bench_with_input(BenchmarkId::from_parameter(num_fish), &states, |b, states| {
            b.iter(|| {
                black_box(fish.separation(states, &neighbors, params.separation_radius));
                black_box(fish.alignment(states, &neighbors, params.alignment_radius));
                black_box(fish.cohesion(states, &neighbors, params.cohesion_radius));
            });
        });
    }

    group.finish();
}

// Full tick including the predator
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for num_fish in [40, 200, 800].iter() {
        for spatial_grid in [false, true] {
            let label = if spatial_grid { "grid" } else { "brute_force" };
            group.bench_function(BenchmarkId::new(label, num_fish), |b| {
                let (mut flock, mut rng) = stocked(*num_fish, spatial_grid);
                let mut elapsed = 0.0;
                b.iter(|| {
                    flock.tick(elapsed, &mut rng);
                    elapsed += 1.0 / 60.0;
                });
            });
        }
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_neighbor_queries, bench_force_calculations, bench_tick
}

criterion_main!(benches);
