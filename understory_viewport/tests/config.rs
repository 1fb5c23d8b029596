// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading viewport and plugin options from JSON configuration.

#![cfg(feature = "serde")]

use kurbo::Point;
use understory_viewport::{
    Align, BounceOptions, ClampBound, ClampOptions, Direction, DragOptions, Ease, MouseButtons,
    Sides, SnapOptions, ViewportOptions, WheelClamp, WheelOptions,
};

#[test]
fn viewport_options_fill_missing_fields() {
    let options: ViewportOptions =
        serde_json::from_str(r#"{ "screen_width": 1024, "world_width": 5000 }"#).unwrap();
    assert_eq!(options.screen_width, 1024.0);
    assert_eq!(options.screen_height, 600.0);
    assert_eq!(options.world_width, Some(5000.0));
    assert_eq!(options.world_height, None);
    assert_eq!(options.threshold, 5.0);
    assert!(options.passive_wheel);
}

#[test]
fn modes_are_read_from_names() {
    let drag: DragOptions = serde_json::from_str(
        r#"{
            "direction": "x",
            "clamp_wheel": "all",
            "underflow": "top-left",
            "mouse_buttons": "left middle"
        }"#,
    )
    .unwrap();
    assert_eq!(drag.direction, Direction::X);
    assert_eq!(drag.clamp_wheel, WheelClamp::All);
    assert_eq!(drag.underflow.x, Align::Start);
    assert_eq!(drag.underflow.y, Align::Start);
    assert_eq!(drag.mouse_buttons, MouseButtons::LEFT | MouseButtons::MIDDLE);
    assert!(drag.wheel);

    let bounce: BounceOptions =
        serde_json::from_str(r#"{ "sides": "horizontal", "ease": "easeOutQuad" }"#).unwrap();
    assert_eq!(bounce.sides, Sides::LEFT | Sides::RIGHT);
    assert_eq!(bounce.ease.name(), Ease::OutQuad.name());
}

#[test]
fn clamp_edges_accept_flags_and_numbers() {
    let clamp: ClampOptions =
        serde_json::from_str(r#"{ "left": true, "right": 1500, "top": false }"#).unwrap();
    assert_eq!(clamp.left, Some(ClampBound::World));
    assert_eq!(clamp.right, Some(ClampBound::At(1500.0)));
    assert_eq!(clamp.top, None);
    assert_eq!(clamp.bottom, None);
}

#[test]
fn optional_points_and_steps() {
    let wheel: WheelOptions =
        serde_json::from_str(r#"{ "smooth": 5, "center": { "x": 10.0, "y": 20.0 } }"#).unwrap();
    assert_eq!(wheel.smooth, Some(5));
    assert_eq!(wheel.center, Some(Point::new(10.0, 20.0)));

    let snap: SnapOptions = serde_json::from_str(r#"{ "time": 0 }"#).unwrap();
    assert_eq!(snap.time, 0.0);
    assert!(snap.interrupt);
}

#[test]
fn unknown_mode_names_are_rejected() {
    assert!(serde_json::from_str::<DragOptions>(r#"{ "direction": "z" }"#).is_err());
    assert!(serde_json::from_str::<BounceOptions>(r#"{ "ease": "wobble" }"#).is_err());
}
