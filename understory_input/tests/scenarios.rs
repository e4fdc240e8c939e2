// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end dispatch scenarios driven through [`Scene`].

use std::collections::HashMap;

use kurbo::{Point, Rect, Vec2};
use understory_input::element::ElementTree;
use understory_input::event::EventKind;
use understory_input::scene::{ElementId, Scene};
use understory_input::types::MouseButton;
use understory_input::{Dispatcher, InputConfig};

type Log = Vec<(EventKind, Option<ElementId>)>;

const LEFT: MouseButton = MouseButton::Left;

struct Fixture {
    scene: Scene,
    root: ElementId,
    a: ElementId,
    input: Dispatcher<ElementId>,
}

impl Fixture {
    // root (0,0)-(100,100) ⊃ a (0,0)-(50,50)
    fn new() -> Self {
        let mut scene = Scene::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root = scene.root().unwrap();
        let a = scene.insert(root, Rect::new(0.0, 0.0, 50.0, 50.0));
        Self {
            scene,
            root,
            a,
            input: Dispatcher::new(InputConfig::default()).unwrap(),
        }
    }

    fn drain(&mut self) -> Log {
        let mut log = Vec::new();
        self.input
            .process(&mut self.scene, |_, ev, _| log.push((ev.kind(), ev.target())));
        log
    }
}

fn count(log: &Log, target: Option<ElementId>, pred: impl Fn(&EventKind) -> bool) -> usize {
    log.iter().filter(|(k, t)| *t == target && pred(k)).count()
}

fn is_click(k: &EventKind) -> bool {
    matches!(k, EventKind::ButtonClick { .. })
}

fn is_double_click(k: &EventKind) -> bool {
    matches!(k, EventKind::ButtonDoubleClick { .. })
}

fn is_repeat(k: &EventKind) -> bool {
    matches!(k, EventKind::ButtonRepeat { .. })
}

#[test]
fn press_move_release_on_one_element() {
    let mut f = Fixture::new();
    f.input.pointer_moved(Point::new(10.0, 10.0));
    f.input.button_pressed(LEFT);
    let _ = f.drain();

    f.input.time_advanced(50);
    f.input.pointer_moved(Point::new(12.0, 11.0));
    let log = f.drain();
    let drags: Vec<_> = log
        .iter()
        .filter_map(|(k, t)| match k {
            EventKind::ButtonDrag { drag, .. } if *t == Some(f.a) => Some(drag.total()),
            _ => None,
        })
        .collect();
    assert_eq!(drags, [Vec2::new(2.0, 1.0)]);

    f.input.time_advanced(70);
    f.input.button_released(LEFT);
    let log = f.drain();
    assert_eq!(f.input.time(), 120);
    let releases: Vec<_> = log
        .iter()
        .filter(|(k, t)| *t == Some(f.a) && matches!(k, EventKind::ButtonRelease { .. }))
        .map(|(k, _)| *k)
        .collect();
    assert_eq!(
        releases,
        [EventKind::ButtonRelease {
            button: LEFT,
            pressed_inside: true,
            release_inside: true,
        }]
    );
    assert_eq!(count(&log, Some(f.a), is_click), 1);
}

#[test]
fn derived_events_precede_already_queued_events() {
    let mut f = Fixture::new();
    let a = f.a;
    f.input.pointer_moved(Point::new(10.0, 10.0));
    f.input.button_pressed(LEFT);
    f.input.time_advanced(7);

    let mut log = Vec::new();
    f.input.process(&mut f.scene, |_, ev, poster| {
        log.push((ev.kind(), ev.target()));
        if ev.target() == Some(a) && matches!(ev.kind(), EventKind::ButtonPress { .. }) {
            poster.post_to(EventKind::FocusGained, a);
            poster.post_to(EventKind::FocusLost, a);
        }
    });

    let pos = |kind: EventKind, target: Option<ElementId>| {
        log.iter()
            .position(|e| *e == (kind, target))
            .unwrap()
    };
    let press = pos(EventKind::ButtonPress { button: LEFT }, Some(a));
    let d1 = pos(EventKind::FocusGained, Some(a));
    let d2 = pos(EventKind::FocusLost, Some(a));
    let later = pos(EventKind::TimeAdvanced { millis: 7 }, None);
    assert_eq!(d1, press + 1);
    assert_eq!(d2, press + 2);
    assert!(d2 < later);
}

#[test]
fn every_exit_matches_an_enter() {
    let mut scene = Scene::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    let root = scene.root().unwrap();
    let left = scene.insert(root, Rect::new(0.0, 0.0, 50.0, 100.0));
    let nested = scene.insert(left, Rect::new(10.0, 10.0, 40.0, 40.0));
    let right = scene.insert(root, Rect::new(50.0, 0.0, 100.0, 100.0));
    let overlap = scene.insert(root, Rect::new(40.0, 40.0, 60.0, 60.0));
    let mut input: Dispatcher<ElementId> = Dispatcher::new(InputConfig::default()).unwrap();

    let path = [
        (20.0, 20.0),
        (45.0, 45.0),
        (55.0, 55.0),
        (80.0, 20.0),
        (150.0, 20.0),
        (30.0, 30.0),
        (30.0, 31.0),
        (-5.0, -5.0),
    ];
    let mut inside: HashMap<ElementId, bool> = HashMap::new();
    for (x, y) in path {
        let before: Vec<_> = input.marked().live(&scene).collect();
        input.pointer_moved(Point::new(x, y));
        let mut log = Vec::new();
        input.process(&mut scene, |_, ev, _| log.push((ev.kind(), ev.target())));

        for (kind, target) in &log {
            let Some(id) = *target else { continue };
            match kind {
                EventKind::Enter => {
                    assert!(!inside.get(&id).copied().unwrap_or(false), "double enter");
                    inside.insert(id, true);
                }
                EventKind::Exit => {
                    assert_eq!(inside.get(&id), Some(&true), "exit without enter");
                    inside.insert(id, false);
                }
                _ => {}
            }
        }
        let after: Vec<_> = input.marked().live(&scene).collect();
        for id in before.iter().filter(|id| !after.contains(*id)) {
            assert_eq!(
                log.iter()
                    .filter(|e| **e == (EventKind::Exit, Some(*id)))
                    .count(),
                1
            );
        }
    }
    // The walk ends outside the window area.
    for id in [root, left, nested, right, overlap] {
        assert_ne!(inside.get(&id), Some(&true));
    }
}

#[test]
fn click_ignores_elapsed_time_and_travel() {
    let mut f = Fixture::new();
    f.input.pointer_moved(Point::new(5.0, 5.0));
    f.input.button_pressed(LEFT);
    f.input.time_advanced(5_000);
    f.input.pointer_moved(Point::new(45.0, 45.0));
    f.input.button_released(LEFT);
    let log = f.drain();
    assert_eq!(count(&log, Some(f.a), is_click), 1);
    assert_eq!(count(&log, None, is_click), 1);
}

fn double_clicks_after(delay: u64, dx: f64, dy: f64) -> usize {
    let mut f = Fixture::new();
    f.input.pointer_moved(Point::new(20.0, 20.0));
    f.input.button_pressed(LEFT);
    f.input.button_released(LEFT);
    f.input.time_advanced(delay);
    f.input.pointer_moved(Point::new(20.0 + dx, 20.0 + dy));
    f.input.button_pressed(LEFT);
    let log = f.drain();
    count(&log, None, is_double_click)
}

#[test]
fn double_click_time_boundary() {
    assert_eq!(double_clicks_after(250, 0.0, 0.0), 1);
    assert_eq!(double_clicks_after(251, 0.0, 0.0), 0);
}

#[test]
fn double_click_distance_boundary() {
    assert_eq!(double_clicks_after(100, 2.0, 0.0), 1);
    assert_eq!(double_clicks_after(100, 3.0, 0.0), 0);
    assert_eq!(double_clicks_after(100, -2.0, 0.0), 1);
    assert_eq!(double_clicks_after(100, -3.0, 0.0), 0);
    assert_eq!(double_clicks_after(100, 0.0, 2.0), 1);
    assert_eq!(double_clicks_after(100, 0.0, 3.0), 0);
    assert_eq!(double_clicks_after(100, 0.0, -2.0), 1);
    assert_eq!(double_clicks_after(100, 0.0, -3.0), 0);
    // The window is per axis.
    assert_eq!(double_clicks_after(100, 2.0, 2.0), 1);
}

#[test]
fn double_click_ignores_other_buttons_in_between() {
    let mut f = Fixture::new();
    f.input.pointer_moved(Point::new(20.0, 20.0));
    f.input.button_pressed(LEFT);
    f.input.button_released(LEFT);
    f.input.button_pressed(MouseButton::Right);
    f.input.button_released(MouseButton::Right);
    f.input.time_advanced(100);
    f.input.button_pressed(LEFT);
    let log = f.drain();
    assert_eq!(
        count(&log, None, |k| *k
            == EventKind::ButtonDoubleClick { button: LEFT }),
        1
    );
}

fn repeats_for_split(split: &[u64]) -> usize {
    let mut f = Fixture::new();
    f.input.pointer_moved(Point::new(10.0, 10.0));
    f.input.button_pressed(LEFT);
    for &ms in split {
        f.input.time_advanced(ms);
    }
    let log = f.drain();
    assert_eq!(
        count(&log, None, is_repeat),
        count(&log, Some(f.a), is_repeat)
    );
    count(&log, None, is_repeat)
}

#[test]
fn repeat_count_is_independent_of_time_split() {
    // Delay 300, rate 200: repeats at 300, 500, 700, 900.
    let whole = repeats_for_split(&[1_000]);
    assert_eq!(whole, 4);
    assert_eq!(repeats_for_split(&[299, 1, 200, 500]), whole);
    assert_eq!(repeats_for_split(&[10; 100]), whole);
    assert_eq!(repeats_for_split(&[1; 1_000]), whole);
    assert_eq!(repeats_for_split(&[0, 999, 1]), whole);
}

#[test]
fn removed_drag_recipient_receives_nothing_more() {
    let mut f = Fixture::new();
    f.input.pointer_moved(Point::new(10.0, 10.0));
    f.input.button_pressed(LEFT);
    f.input.pointer_moved(Point::new(11.0, 10.0));
    let log = f.drain();
    assert_eq!(
        count(&log, Some(f.a), |k| matches!(k, EventKind::ButtonDrag { .. })),
        1
    );

    f.scene.remove(f.a);
    f.input.pointer_moved(Point::new(12.0, 10.0));
    f.input.time_advanced(400);
    f.input.button_released(LEFT);
    let log = f.drain();
    assert_eq!(count(&log, Some(f.a), |_| true), 0);
    // The surviving recipient still gets the whole sequence.
    assert_eq!(
        count(&log, Some(f.root), |k| matches!(k, EventKind::ButtonDrag { .. })),
        1
    );
    assert_eq!(count(&log, Some(f.root), is_click), 1);
}

#[test]
fn element_removed_by_handler_during_drag() {
    let mut f = Fixture::new();
    let a = f.a;
    f.input.pointer_moved(Point::new(10.0, 10.0));
    f.input.button_pressed(LEFT);
    f.input.pointer_moved(Point::new(11.0, 10.0));
    f.input.pointer_moved(Point::new(12.0, 10.0));
    f.input.button_released(LEFT);

    let mut log = Vec::new();
    f.input.process(&mut f.scene, |tree, ev, _| {
        log.push((ev.kind(), ev.target()));
        if ev.target() == Some(a) && matches!(ev.kind(), EventKind::ButtonDrag { .. }) {
            tree.remove(a);
        }
    });
    assert_eq!(
        count(&log, Some(a), |k| matches!(k, EventKind::ButtonDrag { .. })),
        1
    );
    assert_eq!(
        count(&log, Some(a), |k| matches!(k, EventKind::ButtonRelease { .. })),
        0
    );
    assert!(!f.input.is_button_down(LEFT));
}
