// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_scrollbox`: scrollbar layout and input routing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use understory_scrollbox::{Scrollbox, ScrollboxOptions};
use understory_viewport::PointerEvent;

fn list_box() -> Scrollbox {
    let mut scrollbox = Scrollbox::new(ScrollboxOptions {
        box_width: 300.0,
        box_height: 600.0,
        fade: true,
        ..ScrollboxOptions::default()
    });
    scrollbox.set_content_size(Size::new(300.0, 50_000.0));
    scrollbox
}

fn bench_scrollbox(c: &mut Criterion) {
    let mut group = c.benchmark_group("scrollbox");

    group.bench_function("refresh", |b| {
        let mut scrollbox = list_box();
        b.iter(|| {
            scrollbox.refresh();
            black_box(scrollbox.vertical_scrollbar())
        });
    });

    group.bench_function("content_drag", |b| {
        let mut scrollbox = list_box();
        let press = PointerEvent::mouse(Point::new(100.0, 300.0));
        scrollbox.pointer_down(&press);
        let mut y = 300.0;
        b.iter(|| {
            y = if y < 50.0 { 550.0 } else { y - 9.0 };
            black_box(scrollbox.pointer_move(&press.at(Point::new(100.0, y))))
        });
    });

    group.bench_function("thumb_drag", |b| {
        let mut scrollbox = list_box();
        let press = PointerEvent::mouse(Point::new(295.0, 2.0));
        scrollbox.pointer_down(&press);
        let mut y = 2.0;
        b.iter(|| {
            y = if y > 500.0 { 2.0 } else { y + 5.0 };
            black_box(scrollbox.pointer_move(&press.at(Point::new(295.0, y))))
        });
    });

    group.bench_function("frame_with_fade", |b| {
        let mut scrollbox = list_box();
        b.iter(|| {
            scrollbox.update(black_box(16.0));
            black_box(scrollbox.scrollbar_alpha())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_scrollbox);
criterion_main!(benches);
