use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fiducials_locate::{process_frame, Frame, LocationAggregator, MarkerSighting};

fn synthetic_frames(frames: usize, markers: u32) -> Vec<Frame> {
    (0..frames)
        .map(|seq| Frame {
            sequence: seq as u64,
            sightings: (0..markers)
                .map(|id| {
                    let t = seq as f64 * 0.1 + f64::from(id);
                    MarkerSighting {
                        id,
                        x: t.cos() * 20.0,
                        y: t.sin() * 20.0,
                        bearing: t,
                        goodness: ((seq as u32 + id * 31) % 97) as f64 / 97.0,
                    }
                })
                .collect(),
        })
        .collect()
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_frames");
    for markers in [8u32, 64, 512] {
        let frames = synthetic_frames(100, markers);
        group.bench_with_input(BenchmarkId::from_parameter(markers), &frames, |b, frames| {
            b.iter(|| {
                let mut agg = LocationAggregator::new();
                for frame in frames {
                    black_box(process_frame(&mut agg, frame));
                }
                agg.len()
            })
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut agg = LocationAggregator::new();
    for frame in &synthetic_frames(10, 512) {
        process_frame(&mut agg, frame);
    }
    c.bench_function("ranked_512", |b| b.iter(|| agg.ranked().count()));
    c.bench_function("nearest_8_of_512", |b| {
        b.iter(|| agg.nearest(black_box(1.0), black_box(-2.0), 8).len())
    });
}

criterion_group!(benches, bench_ingest, bench_queries);
criterion_main!(benches);
