use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent, Touch, TouchEvent};
use yew::NodeRef;

use barabara_core::TileId;

/// Pointer travel below this many pixels counts as a click, not a drag.
pub(crate) const DRAG_SLOP_PX: f64 = 4.0;

/// How far beyond a slot box a release may land and still target it,
/// measured from the box centre as a fraction of the box diagonal.
const CAPTURE_RADIUS_RATIO: f64 = 0.75;

/// One in-flight drag. Mouse drags leave `touch_id` empty; touch drags
/// track a single touch identifier and ignore every other finger.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DragState {
    pub source: TileId,
    pub start_x: f64,
    pub start_y: f64,
    pub touch_id: Option<i32>,
    pub moved: bool,
}

impl DragState {
    pub(crate) fn begin(source: TileId, x: f64, y: f64, touch_id: Option<i32>) -> Self {
        Self {
            source,
            start_x: x,
            start_y: y,
            touch_id,
            moved: false,
        }
    }

    /// Returns true once the pointer has left the click slop.
    pub(crate) fn update(&mut self, x: f64, y: f64) -> bool {
        if !self.moved {
            let dx = x - self.start_x;
            let dy = y - self.start_y;
            if dx * dx + dy * dy > DRAG_SLOP_PX * DRAG_SLOP_PX {
                self.moved = true;
            }
        }
        self.moved
    }
}

/// Handler slots the window-level listeners delegate into. The listeners
/// clone the handler out before calling it, so a handler may swap the
/// slots without tripping the RefCell.
#[derive(Default)]
pub(crate) struct DragHandlers {
    pub on_move: Option<Rc<dyn Fn(&MouseEvent)>>,
    pub on_release: Option<Rc<dyn Fn(&MouseEvent)>>,
    pub on_touch_move: Option<Rc<dyn Fn(&TouchEvent)>>,
    pub on_touch_release: Option<Rc<dyn Fn(&TouchEvent)>>,
}

fn capture_options() -> EventListenerOptions {
    EventListenerOptions {
        phase: EventListenerPhase::Capture,
        passive: false,
    }
}

/// Capture-phase window listeners for the whole drag lifecycle. Dropping
/// the returned handles detaches everything.
pub(crate) fn window_drag_listeners(handlers: Rc<RefCell<DragHandlers>>) -> Vec<EventListener> {
    let window = web_sys::window().expect("window available");

    let move_handlers = handlers.clone();
    let move_listener = EventListener::new_with_options(
        &window,
        "mousemove",
        capture_options(),
        move |event: &Event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                let handler = move_handlers.borrow().on_move.clone();
                if let Some(handler) = handler {
                    handler(event);
                }
            }
        },
    );
    let up_handlers = handlers.clone();
    let up_listener = EventListener::new_with_options(
        &window,
        "mouseup",
        capture_options(),
        move |event: &Event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                let handler = up_handlers.borrow().on_release.clone();
                if let Some(handler) = handler {
                    handler(event);
                }
            }
        },
    );
    let touch_move_handlers = handlers.clone();
    let touch_move_listener = EventListener::new_with_options(
        &window,
        "touchmove",
        capture_options(),
        move |event: &Event| {
            if let Some(event) = event.dyn_ref::<TouchEvent>() {
                let handler = touch_move_handlers.borrow().on_touch_move.clone();
                if let Some(handler) = handler {
                    handler(event);
                }
            }
        },
    );
    let touch_end_handlers = handlers.clone();
    let touch_end_listener = EventListener::new_with_options(
        &window,
        "touchend",
        capture_options(),
        move |event: &Event| {
            if let Some(event) = event.dyn_ref::<TouchEvent>() {
                let handler = touch_end_handlers.borrow().on_touch_release.clone();
                if let Some(handler) = handler {
                    handler(event);
                }
            }
        },
    );
    let touch_cancel_handlers = handlers;
    let touch_cancel_listener = EventListener::new_with_options(
        &window,
        "touchcancel",
        capture_options(),
        move |event: &Event| {
            if let Some(event) = event.dyn_ref::<TouchEvent>() {
                let handler = touch_cancel_handlers.borrow().on_touch_release.clone();
                if let Some(handler) = handler {
                    handler(event);
                }
            }
        },
    );

    vec![
        move_listener,
        up_listener,
        touch_move_listener,
        touch_end_listener,
        touch_cancel_listener,
    ]
}

/// Find a touch by identifier in either the active or the changed list.
pub(crate) fn touch_from_event(
    event: &TouchEvent,
    touch_id: Option<i32>,
    use_changed: bool,
) -> Option<Touch> {
    let list = if use_changed {
        event.changed_touches()
    } else {
        event.touches()
    };
    if let Some(id) = touch_id {
        for index in 0..list.length() {
            if let Some(touch) = list.item(index) {
                if touch.identifier() == id {
                    return Some(touch);
                }
            }
        }
        None
    } else {
        list.item(0)
    }
}

/// Axis-aligned slot box in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SlotRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SlotRect {
    fn center(&self) -> (f64, f64) {
        (self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }
}

/// Current client boxes of the slot elements. A slot whose element is
/// not mounted or has collapsed to zero size yields `None`.
pub(crate) fn slot_rects(refs: &[NodeRef]) -> Vec<Option<SlotRect>> {
    refs.iter()
        .map(|node| {
            let element = node.cast::<Element>()?;
            let rect = element.get_bounding_client_rect();
            if rect.width() <= 0.0 || rect.height() <= 0.0 {
                return None;
            }
            Some(SlotRect {
                left: rect.left(),
                top: rect.top(),
                width: rect.width(),
                height: rect.height(),
            })
        })
        .collect()
}

/// Closest-centre hit test over the slot boxes. A release inside a box
/// always targets it; a near miss still counts while the centre is
/// within `CAPTURE_RADIUS_RATIO` of the box diagonal; anything further
/// finds no target.
pub(crate) fn closest_slot(rects: &[Option<SlotRect>], x: f64, y: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (slot, rect) in rects.iter().enumerate() {
        let Some(rect) = rect else {
            continue;
        };
        let (cx, cy) = rect.center();
        let dx = x - cx;
        let dy = y - cy;
        let dist_sq = dx * dx + dy * dy;
        if !rect.contains(x, y) {
            let radius =
                (rect.width * rect.width + rect.height * rect.height).sqrt() * CAPTURE_RADIUS_RATIO;
            if dist_sq > radius * radius {
                continue;
            }
        }
        match best {
            Some((_, best_sq)) if best_sq <= dist_sq => {}
            _ => best = Some((slot, dist_sq)),
        }
    }
    best.map(|(slot, _)| slot)
}
