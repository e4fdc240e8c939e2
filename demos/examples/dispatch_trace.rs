// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted input session with a traced event stream.
//!
//! Builds a small [`Scene`] (a panel with a close button and a slider), feeds
//! a scripted sequence of primitives into a [`Dispatcher`], and prints every
//! delivered event through [`EventLogger`]. Pressing the slider gives it
//! keyboard focus from inside the handler. Clicking the close button removes
//! the panel; the remaining queued events for it are dropped.
//!
//! Run:
//! - `cargo run -p understory_demos --example dispatch_trace`
//! - `RUST_LOG=understory_input=trace cargo run -p understory_demos --example dispatch_trace`

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_input::element::ElementTree;
use understory_input::event::{EventCategory, EventKind};
use understory_input::logger::EventLogger;
use understory_input::scene::Scene;
use understory_input::types::{Key, MouseButton, WheelAxis};
use understory_input::{Dispatcher, InputConfig};

const SHIFT: u32 = 50;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut scene = Scene::new(Rect::new(0.0, 0.0, 400.0, 300.0));
    let root = scene.root().expect("fresh scene has a root");
    let panel = scene.insert(root, Rect::new(50.0, 50.0, 350.0, 250.0));
    let close = scene.insert(panel, Rect::new(320.0, 55.0, 345.0, 80.0));
    let slider = scene.insert(panel, Rect::new(70.0, 150.0, 270.0, 170.0));

    let config = InputConfig::default().with_double_click(300, 3.0);
    let mut input = Dispatcher::new(config).expect("valid configuration");
    input.map_key(SHIFT, Key::Shift);

    let mut logger = EventLogger::new();
    logger.ignore_categories(EventCategory::FOCUS);

    // Drag the slider thumb with shift held, letting the button repeat.
    input.pointer_moved(Point::new(100.0, 160.0));
    input.button_pressed(MouseButton::Left);
    input.key_pressed(SHIFT);
    for x in [110.0, 125.0, 140.0] {
        input.time_advanced(120);
        input.pointer_moved(Point::new(x, 161.0));
    }
    input.button_released(MouseButton::Left);
    // Shift is still down when the window is deactivated.
    input.keyboard_lost();
    input.wheel_rolled(WheelAxis::Vertical, -1);

    // Click the close button.
    input.time_advanced(500);
    input.pointer_moved(Point::new(330.0, 65.0));
    input.button_pressed(MouseButton::Left);
    input.time_advanced(40);
    input.button_released(MouseButton::Left);
    input.pointer_moved(Point::new(200.0, 160.0));
    input.pointer_left_window();

    let mut slider_value = 0.0;
    input.process(&mut scene, |tree, event, poster| {
        logger.log(event);
        match (event.kind(), event.target()) {
            (EventKind::ButtonPress { .. }, Some(id)) if id == slider => {
                poster.set_keyboard_focus(Some(slider));
            }
            (EventKind::ButtonDrag { drag, .. }, Some(id)) if id == slider => {
                slider_value += drag.delta().x;
            }
            (EventKind::ButtonClick { .. }, Some(id)) if id == close => {
                tracing::info!("close clicked, removing panel");
                tree.remove(panel);
            }
            _ => {}
        }
    });

    println!("slider moved by {slider_value}px");
    println!("panel alive: {}", scene.is_alive(panel));
}
