use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gesture_scroll::event::{wire, EventRecord, GestureRecord, ScrollRecord};
use gesture_scroll::momentum::{DragCurve, MomentumAnimator, MomentumRequest};
use gesture_scroll::{
    DragParameters, EngineBuilder, GesturePhase, MomentumPhase, RecordingSink, RoundingBias,
    ScrollSettings, Vector,
};
use std::time::Duration;
use tokio::runtime::Runtime;

const FRAME: Duration = Duration::from_micros(16_667);

fn bench_drag_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_curve");

    for (name, drag) in [
        ("trackpad", DragParameters::TRACKPAD),
        ("precise", DragParameters::PRECISE),
        (
            "linear",
            DragParameters {
                drag_coefficient: 4.0,
                drag_exponent: 1.0,
                stop_speed: 20.0,
            },
        ),
    ] {
        group.bench_with_input(BenchmarkId::new("construct", name), &drag, |b, drag| {
            b.iter(|| DragCurve::new(black_box(*drag), black_box(2400.0)))
        });

        let curve = DragCurve::new(drag, 2400.0);
        group.bench_with_input(BenchmarkId::new("sample_run", name), &curve, |b, curve| {
            b.iter(|| {
                let step = FRAME.as_secs_f64();
                let mut t = 0.0;
                let mut total = 0.0;
                while t < curve.duration() {
                    t += step;
                    total += curve.distance_at(black_box(t));
                }
                total
            })
        });
    }

    group.finish();
}

fn bench_animator(c: &mut Criterion) {
    let mut group = c.benchmark_group("animator");

    for speed in [300.0, 1500.0, 6000.0] {
        group.bench_with_input(BenchmarkId::new("full_run", speed), &speed, |b, &speed| {
            b.iter(|| {
                let mut animator =
                    MomentumAnimator::new(10.0, Duration::from_millis(100), RoundingBias::default());
                let start = tokio::time::Instant::now();
                let request = MomentumRequest {
                    exit_velocity: Vector::new(speed * 0.6, speed * 0.8),
                    drag: DragParameters::TRACKPAD,
                    time_since_last_input: Some(Duration::from_millis(8)),
                };
                let mut frames = 0u32;
                let _ = animator.start(request, start, Vec::new(), |_| frames += 1);
                let mut tick = 0;
                while animator.is_running() {
                    tick += 1;
                    animator.tick(start + FRAME * tick, |frame| {
                        black_box(frame);
                        frames += 1;
                    });
                }
                frames
            })
        });
    }

    group.finish();
}

fn sample_records(count: usize) -> Vec<EventRecord> {
    (0..count)
        .flat_map(|i| {
            let timestamp = FRAME * i as u32;
            let location = Vector::new(640.0, 480.0);
            [
                EventRecord::Scroll(ScrollRecord {
                    timestamp,
                    location,
                    line_x: 0,
                    line_y: (i % 3) as i64,
                    point_delta: Vector::new(0.0, 12.5),
                    gesture_phase: GesturePhase::Changed,
                    momentum_phase: MomentumPhase::None,
                    continuous: true,
                    direction_inverted: false,
                }),
                EventRecord::Gesture(GestureRecord {
                    timestamp,
                    location,
                    delta: Vector::new(-0.0, 7.5),
                    phase: GesturePhase::Changed,
                }),
            ]
        })
        .collect()
}

fn bench_wire_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("wire_encoding");

    for count in [1, 64, 1024] {
        let records = sample_records(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| wire::encode_records(black_box(records)).len())
        });
    }

    group.finish();
}

fn bench_engine_samples(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("engine");
    group.sample_size(20);

    group.bench_function("gesture_of_100_samples", |b| {
        b.to_async(&rt).iter(|| async {
            let sink = RecordingSink::new();
            let engine = EngineBuilder::new(ScrollSettings::default(), sink.clone())
                .spawn()
                .unwrap();
            let scroll = engine.handle();
            scroll.report_sample(0, 3, GesturePhase::Began).unwrap();
            for i in 0..99 {
                scroll
                    .report_sample(i % 5 - 2, 7, GesturePhase::Changed)
                    .unwrap();
            }
            scroll.report_sample_with(0, 0, GesturePhase::Ended, false).unwrap();
            scroll.flush().await.unwrap();
            engine.shutdown().await.unwrap();
            sink.len()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_drag_curve,
    bench_animator,
    bench_wire_encoding,
    bench_engine_samples
);
criterion_main!(benches);
