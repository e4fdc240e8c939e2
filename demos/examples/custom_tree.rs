// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plugging a host widget tree into the dispatcher.
//!
//! The host keeps widgets in a flat `Vec` with a generation per slot and
//! implements [`ElementTree`] over it. Round knobs refine hit testing through
//! [`ElementTree::mark_test`], so the corners of their bounding boxes are
//! transparent.
//!
//! Run:
//! - `cargo run -p understory_demos --example custom_tree`

use kurbo::{Circle, Point, Rect, Shape};
use understory_input::element::ElementTree;
use understory_input::event::EventKind;
use understory_input::types::{ElementFlags, MouseButton};
use understory_input::{Dispatcher, InputConfig};

/// Slot index plus generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct WidgetId(usize, u32);

#[derive(Debug)]
struct Widget {
    name: &'static str,
    bounds: Rect,
    round: bool,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    generation: u32,
    alive: bool,
}

#[derive(Debug, Default)]
struct Widgets {
    slots: Vec<Widget>,
}

impl Widgets {
    fn add(
        &mut self,
        parent: Option<WidgetId>,
        name: &'static str,
        bounds: Rect,
        round: bool,
    ) -> WidgetId {
        let id = WidgetId(self.slots.len(), 0);
        self.slots.push(Widget {
            name,
            bounds,
            round,
            parent,
            children: Vec::new(),
            generation: 0,
            alive: true,
        });
        if let Some(p) = parent {
            self.slots[p.0].children.push(id);
        }
        id
    }

    fn remove(&mut self, id: WidgetId) {
        if let Some(w) = self.slots.get_mut(id.0).filter(|w| w.generation == id.1) {
            w.alive = false;
            w.generation += 1;
        }
    }

    fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.slots
            .get(id.0)
            .filter(|w| w.alive && w.generation == id.1)
    }

    fn name(&self, id: WidgetId) -> &'static str {
        self.get(id).map_or("<gone>", |w| w.name)
    }
}

impl ElementTree for Widgets {
    type Id = WidgetId;

    fn root(&self) -> Option<WidgetId> {
        self.get(WidgetId(0, 0)).map(|_| WidgetId(0, 0))
    }

    fn is_alive(&self, id: WidgetId) -> bool {
        self.get(id).is_some()
    }

    fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.get(id)?.parent
    }

    fn children_of(&self, id: WidgetId) -> &[WidgetId] {
        match self.get(id) {
            Some(w) => &w.children,
            None => &[],
        }
    }

    fn bounds(&self, id: WidgetId) -> Option<Rect> {
        self.get(id).map(|w| w.bounds)
    }

    fn flags(&self, id: WidgetId) -> Option<ElementFlags> {
        self.get(id).map(|_| ElementFlags::default())
    }

    fn mark_test(&self, id: WidgetId, local: Point) -> bool {
        match self.get(id) {
            Some(w) if w.round => {
                let size = w.bounds.size();
                let r = size.width.min(size.height) / 2.0;
                Circle::new((size.width / 2.0, size.height / 2.0), r).contains(local)
            }
            Some(_) => true,
            None => false,
        }
    }
}

fn main() {
    let mut widgets = Widgets::default();
    let window = widgets.add(None, "window", Rect::new(0.0, 0.0, 200.0, 100.0), false);
    let knob = widgets.add(Some(window), "knob", Rect::new(20.0, 20.0, 60.0, 60.0), true);

    let mut input = Dispatcher::new(InputConfig::default()).expect("valid configuration");
    // Corner of the knob's box, then its center.
    for pos in [Point::new(22.0, 22.0), Point::new(40.0, 40.0)] {
        input.pointer_moved(pos);
        input.button_pressed(MouseButton::Left);
        input.button_released(MouseButton::Left);
    }

    input.process(&mut widgets, |tree, event, _| {
        if let (EventKind::ButtonClick { .. }, Some(id)) = (event.kind(), event.target()) {
            let at = event.local_pointer_position();
            println!("click on {} at local ({}, {})", tree.name(id), at.x, at.y);
        }
    });

    // Once the knob is gone, only the window hears about the click.
    widgets.remove(knob);
    input.button_pressed(MouseButton::Left);
    input.button_released(MouseButton::Left);
    input.process(&mut widgets, |tree, event, _| {
        if let (EventKind::ButtonClick { .. }, Some(id)) = (event.kind(), event.target()) {
            println!("after removal: click on {}", tree.name(id));
        }
    });
}
