//! Benchmarks for contour extraction and labeling.
//!
//! Run with: cargo bench --package contour --bench contour_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use contour::{
    extract_levels, generate_contour_levels, place_labels, smooth_path, ContourConfig,
    ContourScanner, Grid, GridSpec, LabelConfig, Method, PathInfo, SmoothingConfig, TraceConfig,
};

/// Smooth temperature-like field with hills and valleys.
fn generate_smooth_field(width: usize, height: usize) -> Grid {
    let mut data = vec![0.0f32; width * height];
    for y in 0..height {
        for x in 0..width {
            let fx = x as f32 / width as f32;
            let fy = y as f32 / height as f32;

            let v1 = (fx * std::f32::consts::PI * 4.0).sin() * 20.0;
            let v2 = (fy * std::f32::consts::PI * 4.0).sin() * 20.0;
            let v3 = ((fx + fy) * std::f32::consts::PI * 2.0).sin() * 10.0;

            data[y * width + x] = 50.0 + v1 + v2 + v3;
        }
    }
    Grid::new(GridSpec::unit(width, height), data).unwrap()
}

/// Field with random noise (many short contours and saddles).
fn generate_noisy_field(width: usize, height: usize) -> Grid {
    let mut rng = rand::thread_rng();
    let mut grid = generate_smooth_field(width, height);
    for v in grid.data.iter_mut() {
        *v += rng.gen_range(-5.0..5.0);
    }
    grid
}

/// The longest contour of `level` on `grid`.
fn longest_path(grid: &Grid, level: f64) -> Vec<contour::Point> {
    ContourScanner::new(grid, level, &TraceConfig::default())
        .unwrap()
        .map(|p| p.unwrap().points)
        .max_by_key(|p| p.len())
        .unwrap_or_default()
}

// =============================================================================
// CONTOUR LEVEL GENERATION BENCHMARKS
// =============================================================================

fn bench_generate_contour_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_contour_levels");

    let ranges = [
        (0.0, 100.0, 10.0, "0-100_by_10"),
        (0.0, 100.0, 2.0, "0-100_by_2"),
        (-50.0, 50.0, 5.0, "neg50-50_by_5"),
        (900.0, 1100.0, 4.0, "pressure_4hPa"),
    ];

    for (min, max, interval, name) in ranges {
        group.bench_with_input(
            BenchmarkId::new("levels", name),
            &(min, max, interval),
            |b, &(min, max, interval)| {
                b.iter(|| {
                    generate_contour_levels(black_box(min), black_box(max), black_box(interval))
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// SINGLE LEVEL SCAN BENCHMARKS
// =============================================================================

fn bench_scan_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_level");
    let config = TraceConfig::default();

    let sizes = [(64, 64), (128, 128), (256, 256), (512, 512)];

    for (width, height) in sizes {
        let smooth = generate_smooth_field(width, height);
        let noisy = generate_noisy_field(width, height);

        group.throughput(Throughput::Elements((width * height) as u64));

        group.bench_with_input(
            BenchmarkId::new("smooth_single_level", format!("{}x{}", width, height)),
            &smooth,
            |b, grid| {
                b.iter(|| {
                    ContourScanner::new(black_box(grid), black_box(50.0), &config)
                        .unwrap()
                        .count()
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("noisy_single_level", format!("{}x{}", width, height)),
            &noisy,
            |b, grid| {
                b.iter(|| {
                    ContourScanner::new(black_box(grid), black_box(50.0), &config)
                        .unwrap()
                        .count()
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// SMOOTHING BENCHMARKS
// =============================================================================

fn bench_smooth_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("smooth_path");

    let grid = generate_smooth_field(256, 256);
    let path = longest_path(&grid, 50.0);
    group.throughput(Throughput::Elements(path.len() as u64));

    for method in [Method::Linear, Method::Akima, Method::NaturalCubic] {
        for factor in [2, 4] {
            let config = SmoothingConfig::new(factor, method);
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", method), format!("x{}", factor)),
                &path,
                |b, path| {
                    b.iter(|| smooth_path(black_box(path), black_box(&config)).unwrap());
                },
            );
        }
    }

    group.finish();
}

// =============================================================================
// LABEL PLACEMENT BENCHMARKS
// =============================================================================

fn bench_place_labels(c: &mut Criterion) {
    let mut group = c.benchmark_group("place_labels");

    let grid = generate_smooth_field(256, 256);
    let path = longest_path(&grid, 50.0);
    let info = PathInfo {
        text: "50",
        ..Default::default()
    };
    group.throughput(Throughput::Elements(path.len() as u64));

    for spacing in [10.0, 40.0] {
        let config = LabelConfig::spacing(spacing);
        group.bench_with_input(
            BenchmarkId::new("spacing", spacing),
            &path,
            |b, path| {
                b.iter(|| {
                    let mut path = path.clone();
                    place_labels(black_box(&mut path), &config, &info).unwrap()
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// FULL EXTRACTION BENCHMARKS
// =============================================================================

fn bench_extract_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_levels");
    group.sample_size(20); // Slower benchmark

    let sizes = [(128, 128), (256, 256)];

    for (width, height) in sizes {
        let grid = generate_smooth_field(width, height);
        group.throughput(Throughput::Elements((width * height) as u64));

        let plain = ContourConfig {
            interval: Some(5.0),
            ..Default::default()
        };
        group.bench_with_input(
            BenchmarkId::new("interval_5", format!("{}x{}", width, height)),
            &grid,
            |b, grid| {
                b.iter(|| extract_levels(black_box(grid), &plain, None).unwrap());
            },
        );

        let labeled = ContourConfig {
            interval: Some(5.0),
            labels: Some(LabelConfig::spacing(40.0)),
            ..Default::default()
        };
        group.bench_with_input(
            BenchmarkId::new("interval_5_labeled", format!("{}x{}", width, height)),
            &grid,
            |b, grid| {
                b.iter(|| extract_levels(black_box(grid), &labeled, None).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_generate_contour_levels,
    bench_scan_level,
    bench_smooth_path,
    bench_place_labels,
    bench_extract_levels,
);

criterion_main!(benches);
