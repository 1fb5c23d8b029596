// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_viewport`: per-frame plugin updates and
//! input dispatch through a fully loaded pipeline.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_viewport::{
    BounceOptions, ClampOptions, ClampZoomOptions, DecelerateOptions, DragOptions,
    MouseEdgesOptions, PinchOptions, PointerEvent, Viewport, ViewportOptions,
    WheelEvent, WheelOptions,
};

fn loaded_viewport() -> Viewport {
    let mut viewport = Viewport::new(ViewportOptions {
        world_width: Some(10_000.0),
        world_height: Some(10_000.0),
        ..ViewportOptions::default()
    });
    viewport
        .drag(DragOptions::default())
        .pinch(PinchOptions::default())
        .wheel_zoom(WheelOptions::default())
        .mouse_edges(MouseEdgesOptions {
            distance: Some(20.0),
            ..MouseEdgesOptions::default()
        })
        .decelerate(DecelerateOptions::default())
        .bounce(BounceOptions::default())
        .clamp_zoom(ClampZoomOptions {
            min_width: Some(100.0),
            max_width: Some(20_000.0),
            ..ClampZoomOptions::default()
        })
        .clamp(ClampOptions::default());
    viewport.move_center(Point::new(5_000.0, 5_000.0));
    viewport
}

/// A viewport that is gliding after a fast flick.
fn flung_viewport() -> Viewport {
    let mut viewport = loaded_viewport();
    let press = PointerEvent::mouse(Point::new(400.0, 300.0));
    viewport.pointer_down(&press);
    viewport.update(16.0);
    viewport.pointer_move(&press.at(Point::new(300.0, 250.0)));
    viewport.update(16.0);
    viewport.pointer_move(&press.at(Point::new(200.0, 200.0)));
    viewport.pointer_up(&press.at(Point::new(200.0, 200.0)));
    viewport
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport/frame");

    group.bench_function("idle", |b| {
        let mut viewport = loaded_viewport();
        b.iter(|| {
            viewport.update(black_box(16.0));
            black_box(viewport.is_dirty())
        });
    });

    group.bench_function("decelerating", |b| {
        b.iter_batched(
            flung_viewport,
            |mut viewport| {
                for _ in 0..8 {
                    viewport.update(16.0);
                }
                black_box(viewport.left())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_input(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport/input");

    group.bench_function("drag_move", |b| {
        let mut viewport = loaded_viewport();
        let press = PointerEvent::mouse(Point::new(400.0, 300.0));
        viewport.pointer_down(&press);
        let mut x = 400.0;
        b.iter(|| {
            x = if x > 600.0 { 200.0 } else { x + 7.0 };
            black_box(viewport.pointer_move(&press.at(Point::new(x, 300.0))))
        });
    });

    group.bench_function("pinch_move", |b| {
        let mut viewport = loaded_viewport();
        let a = PointerEvent::touch(2, Point::new(300.0, 300.0));
        let bt = PointerEvent::touch(3, Point::new(500.0, 300.0));
        viewport.pointer_down(&a);
        viewport.pointer_down(&bt);
        let mut spread = 0.0;
        b.iter(|| {
            spread = if spread > 100.0 { 0.0 } else { spread + 3.0 };
            viewport.pointer_move(&a.at(Point::new(300.0 - spread, 300.0)));
            black_box(viewport.pointer_move(&bt.at(Point::new(500.0 + spread, 300.0))))
        });
    });

    group.bench_function("wheel_zoom", |b| {
        let mut viewport = loaded_viewport();
        let mut delta = -40.0;
        b.iter(|| {
            delta = -delta;
            black_box(viewport.wheel(&WheelEvent::new(Point::new(400.0, 300.0), delta)))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_frame, bench_input);
criterion_main!(benches);
