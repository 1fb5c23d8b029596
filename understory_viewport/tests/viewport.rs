// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scenario tests for `understory_viewport`.
//!
//! These drive a [`Viewport`] the way a host would: pointer and wheel events
//! followed by frame updates, observing the transform and the emitted events.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_viewport::{
    BounceOptions, ClampOptions, ClampZoomOptions, DecelerateOptions, Direction, DragOptions,
    FollowOptions, MoveKind, PinchOptions, PluginName, PointerEvent, SnapOptions, SnapZoomOptions, Viewport,
    ViewportEvent, ViewportOptions, WheelEvent, WheelOptions,
};

const FRAME: f64 = 16.0;

fn world(width: f64, height: f64) -> Viewport {
    Viewport::new(ViewportOptions {
        world_width: Some(width),
        world_height: Some(height),
        ..ViewportOptions::default()
    })
}

/// Records every event name in order.
fn record(viewport: &mut Viewport) -> Rc<RefCell<Vec<String>>> {
    let names = Rc::new(RefCell::new(Vec::new()));
    let sink = names.clone();
    viewport.subscribe(move |event| sink.borrow_mut().push(event.to_string()));
    names
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn fling_decays_by_friction_each_frame() {
    let mut viewport = world(4000.0, 4000.0);
    viewport
        .drag(DragOptions::default())
        .decelerate(DecelerateOptions::default());

    let start = PointerEvent::mouse(Point::new(600.0, 300.0));
    viewport.pointer_down(&start);
    viewport.update(FRAME);
    viewport.pointer_move(&start.at(Point::new(550.0, 300.0)));
    viewport.update(FRAME);
    viewport.pointer_move(&start.at(Point::new(500.0, 300.0)));
    viewport.pointer_up(&start.at(Point::new(500.0, 300.0)));

    let v0 = viewport
        .plugins()
        .decelerate()
        .map(|d| d.velocity().x)
        .unwrap_or_default();
    assert!(close(v0, -50.0 / 16.0), "velocity is the last 100ms of travel");

    let mut x = viewport.node().x();
    for n in 1..=5 {
        viewport.update(FRAME);
        let expected_v = v0 * 0.95_f64.powi(n);
        let velocity = viewport.plugins().decelerate().map(|d| d.velocity().x);
        assert!(velocity.is_some_and(|v| close(v, expected_v)), "frame {n}");
        // Position advanced by the velocity before this frame's friction.
        assert!(close(viewport.node().x(), x + v0 * 0.95_f64.powi(n - 1) * FRAME));
        x = viewport.node().x();
    }
}

#[test]
fn fling_stops_below_min_speed() {
    let mut viewport = world(100_000.0, 4000.0);
    viewport
        .drag(DragOptions::default())
        .decelerate(DecelerateOptions::default());
    if let Some(decelerate) = viewport.plugins_mut().decelerate_mut() {
        decelerate.activate(Some(1.0), None);
    }
    for _ in 0..200 {
        viewport.update(FRAME);
    }
    assert!(
        !viewport
            .plugins()
            .decelerate()
            .is_some_and(|d| d.is_active()),
        "0.95^n falls under 0.01 well within 200 frames"
    );
}

#[test]
fn drag_then_release_keeps_gliding_until_min_speed() {
    let mut viewport = Viewport::new(ViewportOptions {
        screen_width: 800.0,
        world_width: Some(2000.0),
        ..ViewportOptions::default()
    });
    viewport
        .drag(DragOptions::default())
        .decelerate(DecelerateOptions::default());
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    viewport.subscribe(move |event| sink.borrow_mut().push(*event));
    let gliding = |events: &Rc<RefCell<Vec<ViewportEvent>>>| {
        events
            .borrow()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    ViewportEvent::Moved {
                        kind: MoveKind::Decelerate,
                        ..
                    }
                )
            })
            .count()
    };

    let press = PointerEvent::mouse(Point::new(400.0, 300.0));
    viewport.pointer_down(&press);
    for x in [450.0, 500.0, 550.0] {
        viewport.update(FRAME);
        viewport.pointer_move(&press.at(Point::new(x, 300.0)));
    }
    viewport.pointer_up(&press.at(Point::new(550.0, 300.0)));

    assert_eq!(viewport.node().x(), 150.0, "x follows the cumulative drag");
    let drag_starts = events
        .borrow()
        .iter()
        .filter(|e| matches!(e, ViewportEvent::DragStart { .. }))
        .count();
    assert_eq!(drag_starts, 1);
    assert_eq!(gliding(&events), 0);

    let mut x = viewport.node().x();
    let mut step = f64::INFINITY;
    let mut frames = 0_usize;
    while viewport.plugins().decelerate().is_some_and(|d| d.is_active()) {
        viewport.update(FRAME);
        let next = viewport.node().x() - x;
        assert!(next > 0.0 && next < step, "frame {frames} moves less than the last");
        step = next;
        x = viewport.node().x();
        frames += 1;
        assert!(frames < 1000, "fling never stopped");
    }
    assert_eq!(gliding(&events), frames);

    for _ in 0..20 {
        viewport.update(FRAME);
    }
    assert_eq!(gliding(&events), frames, "no gliding once under min speed");
    assert_eq!(viewport.node().x(), x);
}

#[test]
fn click_eligibility_is_revoked_at_the_threshold() {
    let anchor = Point::new(200.0, 200.0);
    let offsets = [
        kurbo::Vec2::new(1.0, 0.0),
        kurbo::Vec2::new(-1.0, 0.0),
        kurbo::Vec2::new(0.0, 1.0),
        kurbo::Vec2::new(0.0, -1.0),
    ];
    for direction in offsets {
        let mut viewport = world(2000.0, 2000.0);
        viewport.drag(DragOptions::default());
        let press = PointerEvent::mouse(anchor);
        viewport.pointer_down(&press);

        for distance in [1.0, 4.0, 4.99] {
            viewport.pointer_move(&press.at(anchor + direction * distance));
            assert!(viewport.input().is_click_eligible(), "{distance} along {direction:?}");
        }
        // Both axes just under the threshold at once.
        viewport.pointer_move(&press.at(anchor + kurbo::Vec2::new(4.99, 4.99)));
        assert!(viewport.input().is_click_eligible());

        viewport.pointer_move(&press.at(anchor + direction * 5.0));
        assert!(!viewport.input().is_click_eligible(), "5 along {direction:?}");
        viewport.pointer_move(&press);
        assert!(!viewport.input().is_click_eligible(), "revoked until the next press");

        let names = record(&mut viewport);
        viewport.pointer_up(&press);
        assert!(!names.borrow().iter().any(|n| n == "clicked"));

        viewport.pointer_down(&press);
        assert!(viewport.input().is_click_eligible(), "a new press is eligible again");
        viewport.pointer_up(&press);
        assert!(names.borrow().iter().any(|n| n == "clicked"));
    }
}

#[test]
fn tap_clicks_and_drag_does_not() {
    let mut viewport = world(2000.0, 2000.0);
    viewport.drag(DragOptions::default());
    let clicks = Rc::new(RefCell::new(Vec::new()));
    let sink = clicks.clone();
    viewport.subscribe(move |event| {
        if let ViewportEvent::Clicked { screen, world } = *event {
            sink.borrow_mut().push((screen, world));
        }
    });
    let names = record(&mut viewport);

    let tap = PointerEvent::mouse(Point::new(100.0, 100.0));
    viewport.pointer_down(&tap);
    viewport.pointer_move(&tap.at(Point::new(102.0, 101.0)));
    viewport.pointer_up(&tap.at(Point::new(102.0, 101.0)));
    assert_eq!(
        clicks.borrow().as_slice(),
        [(Point::new(100.0, 100.0), Point::new(100.0, 100.0))]
    );

    names.borrow_mut().clear();
    let press = PointerEvent::mouse(Point::new(300.0, 300.0));
    viewport.pointer_down(&press);
    viewport.pointer_move(&press.at(Point::new(280.0, 300.0)));
    viewport.pointer_up(&press.at(Point::new(280.0, 300.0)));
    assert_eq!(clicks.borrow().len(), 1);
    assert_eq!(
        names.borrow().as_slice(),
        ["drag-start", "moved", "drag-end"]
    );
}

#[test]
fn press_during_fling_is_not_a_click() {
    let mut viewport = world(100_000.0, 4000.0);
    viewport
        .drag(DragOptions::default())
        .decelerate(DecelerateOptions::default());
    if let Some(decelerate) = viewport.plugins_mut().decelerate_mut() {
        decelerate.activate(Some(2.0), None);
    }
    let names = record(&mut viewport);

    let tap = PointerEvent::mouse(Point::new(100.0, 100.0));
    viewport.pointer_down(&tap);
    viewport.pointer_up(&tap);
    assert!(!names.borrow().iter().any(|n| n == "clicked"));
    assert!(
        !viewport
            .plugins()
            .decelerate()
            .is_some_and(|d| d.is_active()),
        "the press stops the fling"
    );
}

#[test]
fn clamp_centers_small_world() {
    let mut viewport = world(100.0, 100.0);
    viewport.clamp(ClampOptions {
        direction: Some(Direction::All),
        ..ClampOptions::default()
    });
    assert_eq!(viewport.node().x(), 350.0);
    assert_eq!(viewport.node().y(), 250.0);

    viewport.set_zoom(2.0, false);
    viewport.update(FRAME);
    assert_eq!(viewport.node().x(), 300.0);
    assert_eq!(viewport.node().y(), 200.0);
}

#[test]
fn clamp_is_idempotent() {
    let mut viewport = world(2000.0, 2000.0);
    viewport.clamp(ClampOptions {
        direction: Some(Direction::All),
        ..ClampOptions::default()
    });
    viewport.move_corner(Point::new(-500.0, 1800.0));
    assert_eq!(viewport.corner(), Point::new(0.0, 1400.0));

    let names = record(&mut viewport);
    viewport.update(FRAME);
    viewport.update(FRAME);
    assert_eq!(viewport.corner(), Point::new(0.0, 1400.0));
    assert!(!names.borrow().iter().any(|n| n == "moved"));
}

#[test]
fn clamp_stops_fling_at_the_edge() {
    let mut viewport = world(2000.0, 2000.0);
    viewport
        .decelerate(DecelerateOptions::default())
        .clamp(ClampOptions {
            direction: Some(Direction::All),
            ..ClampOptions::default()
        });
    if let Some(decelerate) = viewport.plugins_mut().decelerate_mut() {
        decelerate.activate(Some(5.0), None);
    }
    viewport.update(FRAME);
    assert_eq!(viewport.left(), 0.0);
    assert!(
        !viewport
            .plugins()
            .decelerate()
            .is_some_and(|d| d.is_active())
    );
}

#[test]
fn bounce_returns_to_the_edge() {
    let mut viewport = world(2000.0, 2000.0);
    viewport
        .drag(DragOptions::default())
        .bounce(BounceOptions::default());
    let names = record(&mut viewport);

    viewport.move_corner(Point::new(-200.0, 0.0));
    assert_eq!(names.borrow().first().map(String::as_str), Some("bounce-x-start"));

    let mut previous = viewport.left();
    for _ in 0..10 {
        viewport.update(FRAME);
        assert!(viewport.left() >= previous, "bounce approaches monotonically");
        previous = viewport.left();
    }
    assert_eq!(viewport.left(), 0.0);
    assert!(names.borrow().iter().any(|n| n == "bounce-x-end"));
    assert!(!viewport.plugins().bounce().is_some_and(|b| b.is_active()));
}

#[test]
fn wheel_zooms_about_the_pointer() {
    let mut viewport = world(4000.0, 4000.0);
    viewport.wheel_zoom(WheelOptions::default());
    let pointer = Point::new(200.0, 150.0);
    let before = viewport.to_world(pointer);

    let prevent_default = viewport.wheel(&WheelEvent::new(pointer, -100.0));
    assert!(!prevent_default, "wheel listeners are passive by default");
    assert!(viewport.scaled() > 1.0);
    let after = viewport.to_world(pointer);
    assert!(close(before.x, after.x) && close(before.y, after.y));
}

#[test]
fn wheel_zoom_respects_clamp_zoom() {
    let mut viewport = Viewport::new(ViewportOptions {
        world_width: Some(4000.0),
        world_height: Some(4000.0),
        passive_wheel: false,
        ..ViewportOptions::default()
    });
    viewport
        .wheel_zoom(WheelOptions::default())
        .clamp_zoom(ClampZoomOptions {
            min_width: Some(400.0),
            ..ClampZoomOptions::default()
        });
    for _ in 0..20 {
        assert!(viewport.wheel(&WheelEvent::new(Point::new(400.0, 300.0), -200.0)));
    }
    assert!(close(viewport.scaled(), 2.0));
}

#[test]
fn drag_wheel_scrolls_without_wheel_zoom() {
    let mut viewport = world(4000.0, 4000.0);
    viewport.drag(DragOptions::default());
    viewport.wheel(&WheelEvent::new(Point::new(400.0, 300.0), 40.0).with_delta_x(10.0));
    assert_eq!(viewport.corner(), Point::new(10.0, 40.0));
}

#[test]
fn pinch_keeps_the_midpoint_fixed() {
    let mut viewport = world(4000.0, 4000.0);
    viewport
        .drag(DragOptions::default())
        .pinch(PinchOptions::default());
    let names = record(&mut viewport);

    let a = PointerEvent::touch(1, Point::new(300.0, 300.0));
    let b = PointerEvent::touch(2, Point::new(500.0, 300.0));
    viewport.pointer_down(&a);
    viewport.pointer_down(&b);
    viewport.pointer_move(&a);
    viewport.pointer_move(&b);

    let mid = Point::new(440.0, 300.0);
    let world_before = viewport.to_world(mid);
    viewport.pointer_move(&b.at(Point::new(580.0, 300.0)));
    let world_after = viewport.to_world(mid);
    assert!(viewport.scaled() > 1.0);
    assert!(close(world_before.x, world_after.x) && close(world_before.y, world_after.y));

    viewport.pointer_up(&b.at(Point::new(580.0, 300.0)));
    viewport.pointer_up(&a);
    let names = names.borrow();
    assert_eq!(names.first().map(String::as_str), Some("pinch-start"));
    assert!(names.iter().any(|n| n == "pinch-end"));
    assert!(!names.iter().any(|n| n == "drag-start"));
}

#[test]
fn pinch_spread_from_200_to_300_pixels() {
    // Each touch moves as its own event, so every step zooms about the
    // midpoint of the touches as they are after that event.
    let mut viewport = world(4000.0, 4000.0);
    viewport.drag(DragOptions::default()).pinch(PinchOptions {
        no_drag: true,
        percent: 1.0,
        ..PinchOptions::default()
    });

    let a = PointerEvent::touch(2, Point::new(300.0, 300.0));
    let b = PointerEvent::touch(3, Point::new(500.0, 300.0));
    viewport.pointer_down(&a);
    viewport.pointer_down(&b);
    viewport.pointer_move(&a);
    viewport.pointer_move(&b);
    assert_eq!(viewport.scaled(), 1.0);

    let moves = [
        (a.at(Point::new(250.0, 300.0)), Point::new(375.0, 300.0)),
        (b.at(Point::new(550.0, 300.0)), Point::new(400.0, 300.0)),
    ];
    for (event, mid) in moves {
        let before = viewport.to_world(mid);
        viewport.pointer_move(&event);
        let after = viewport.to_world(mid);
        assert!(close(before.x, after.x) && close(before.y, after.y), "{mid:?}");
    }

    // 1 + 50/800, then times 1 + 50/800 again.
    assert!(close(viewport.scaled(), 1.12890625));
}

#[test]
fn snap_lands_and_removes_itself() {
    let mut viewport = world(4000.0, 4000.0);
    viewport.snap(
        1000.0,
        1000.0,
        SnapOptions {
            time: 100.0,
            remove_on_complete: true,
            ..SnapOptions::default()
        },
    );
    let names = record(&mut viewport);
    for _ in 0..10 {
        viewport.update(FRAME);
    }
    let center = viewport.center();
    assert!(close(center.x, 1000.0) && close(center.y, 1000.0));
    assert!(!viewport.plugins().contains(PluginName::Snap));
    let names = names.borrow();
    assert_eq!(names.first().map(String::as_str), Some("snap-start"));
    assert!(names.iter().any(|n| n == "snap-end"));
    assert!(names.iter().any(|n| n == "snap-remove"));
}

#[test]
fn snap_zoom_animates_to_width() {
    let mut viewport = world(4000.0, 4000.0);
    viewport.snap_zoom(SnapZoomOptions {
        width: Some(400.0),
        time: 200.0,
        ..SnapZoomOptions::default()
    });
    let center = viewport.center();
    for _ in 0..20 {
        viewport.update(FRAME);
    }
    assert!(close(viewport.scaled(), 2.0));
    assert!(close(viewport.node().scale().y, 2.0));
    let after = viewport.center();
    assert!(close(center.x, after.x) && close(center.y, after.y));
}

#[test]
fn follow_tracks_a_moving_target() {
    let mut viewport = world(4000.0, 4000.0);
    let target = Rc::new(Cell::new(Point::new(1000.0, 800.0)));
    viewport.follow(target.clone(), FollowOptions::default());
    viewport.update(FRAME);
    assert_eq!(viewport.center(), Point::new(1000.0, 800.0));
    target.set(Point::new(1200.0, 900.0));
    viewport.update(FRAME);
    assert_eq!(viewport.center(), Point::new(1200.0, 900.0));
}

#[test]
fn removing_a_plugin_emits_its_remove_event() {
    let mut viewport = world(2000.0, 2000.0);
    viewport.drag(DragOptions::default());
    let names = record(&mut viewport);
    assert!(viewport.remove_plugin(PluginName::Drag));
    assert!(!viewport.remove_plugin(PluginName::Drag));
    assert_eq!(names.borrow().as_slice(), ["drag-remove"]);
}

#[test]
fn paused_plugin_is_skipped() {
    let mut viewport = world(2000.0, 2000.0);
    viewport.drag(DragOptions::default());
    viewport.pause_plugin(PluginName::Drag);
    let press = PointerEvent::mouse(Point::new(300.0, 300.0));
    viewport.pointer_down(&press);
    viewport.pointer_move(&press.at(Point::new(200.0, 300.0)));
    viewport.pointer_up(&press.at(Point::new(200.0, 300.0)));
    assert_eq!(viewport.corner(), Point::ZERO);

    viewport.resume_plugin(PluginName::Drag);
    viewport.pointer_down(&press);
    viewport.pointer_move(&press.at(Point::new(200.0, 300.0)));
    assert_eq!(viewport.corner(), Point::new(100.0, 0.0));
}

#[test]
fn zooming_end_is_reported_once_scale_settles() {
    let mut viewport = world(4000.0, 4000.0);
    let names = record(&mut viewport);
    viewport.update(FRAME);
    viewport.set_zoom(2.0, true);
    viewport.update(FRAME);
    viewport.update(FRAME);
    let names = names.borrow();
    assert_eq!(names.iter().filter(|n| *n == "zoomed-end").count(), 1);
    assert_eq!(names.iter().filter(|n| *n == "moved-end").count(), 1);
    assert!(viewport.is_dirty());
}

#[test]
fn resize_refreshes_hit_area_and_world() {
    let mut viewport = world(2000.0, 2000.0);
    viewport.resize(1024.0, 768.0, Some(3000.0), None);
    assert_eq!(viewport.world_width(), 3000.0);
    assert_eq!(viewport.world_height(), 2000.0);
    viewport.update(FRAME);
    assert_eq!(
        viewport.node().hit_area(),
        Rect::new(0.0, 0.0, 1024.0, 768.0)
    );
}
