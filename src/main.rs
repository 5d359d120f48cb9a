use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::{Interval, Timeout};
use js_sys::Date;
use web_sys::{Event, HtmlInputElement, MouseEvent, TouchEvent};
use yew::prelude::*;

use barabara_core::{DropOutcome, Phase, Session, TileId, SLOT_COUNT};

mod drag;
mod picture;
mod tile;

use drag::{DragHandlers, DragState};
use tile::TileView;

/// Matches the tile-bounce animation length in the stylesheet.
const BOUNCE_CLEAR_MS: u32 = 300;
const SESSION_SEED_SALT: u64 = 0xBA6A_BA6A_2025;

/// Session state reachable both from render (via the state handle) and
/// from timer/drag callbacks (via the live cell), so callbacks never act
/// on a stale snapshot.
#[derive(Clone)]
struct SessionStore {
    state: UseStateHandle<Session>,
    live: Rc<RefCell<Session>>,
}

impl SessionStore {
    fn snapshot(&self) -> Session {
        self.live.borrow().clone()
    }

    fn update<R>(&self, apply: impl FnOnce(&mut Session) -> R) -> R {
        let mut next = self.live.borrow().clone();
        let result = apply(&mut next);
        *self.live.borrow_mut() = next.clone();
        self.state.set(next);
        result
    }
}

#[function_component(App)]
fn app() -> Html {
    let session_live = use_mut_ref(|| Session::new(Date::now() as u64 ^ SESSION_SEED_SALT));
    let session_state = {
        let session_live = session_live.clone();
        use_state_eq(move || session_live.borrow().clone())
    };
    let store = SessionStore {
        state: session_state.clone(),
        live: session_live,
    };
    let session = (*session_state).clone();

    let picture = use_state(|| None::<String>);
    let show_preview = use_state(|| false);
    let bounced = use_state(|| None::<TileId>);
    let bounce_clear = use_mut_ref(|| None::<Timeout>);
    let drag_state = use_mut_ref(|| None::<DragState>);
    let ghost = use_state(|| None::<(TileId, f64, f64)>);
    let drag_handlers = use_mut_ref(DragHandlers::default);
    let tile_refs = use_mut_ref(|| {
        (0..SLOT_COUNT)
            .map(|_| NodeRef::default())
            .collect::<Vec<_>>()
    });

    // Seconds clock, scoped exactly to the active phase. Dropping the
    // interval on phase change or teardown cancels it.
    {
        let store = store.clone();
        use_effect_with(session.phase, move |phase| {
            let ticker = if *phase == Phase::Active {
                Some(Interval::new(1000, move || {
                    store.update(|session| {
                        session.tick();
                    });
                }))
            } else {
                None
            };
            move || drop(ticker)
        });
    }

    let restart = {
        let store = store.clone();
        let bounced = bounced.clone();
        let bounce_clear = bounce_clear.clone();
        let ghost = ghost.clone();
        let drag_state = drag_state.clone();
        let show_preview = show_preview.clone();
        Callback::from(move |_: ()| {
            store.update(|session| session.restart());
            bounced.set(None);
            bounce_clear.borrow_mut().take();
            ghost.set(None);
            drag_state.borrow_mut().take();
            show_preview.set(false);
            gloo::console::log!("board reshuffled");
        })
    };

    let on_upload = {
        let picture = picture.clone();
        let restart = restart.clone();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return; // picker dismissed
            };
            input.set_value("");
            match picture::create_object_url(&file) {
                Ok(url) => {
                    if let Some(previous) = picture.as_ref() {
                        picture::revoke_object_url(previous);
                    }
                    gloo::console::log!("picture loaded", file.name());
                    picture.set(Some(url));
                    restart.emit(());
                }
                Err(err) => gloo::console::warn!("picture rejected", err),
            }
        })
    };

    let finish_drag = {
        let store = store.clone();
        let bounced = bounced.clone();
        let bounce_clear = bounce_clear.clone();
        let ghost = ghost.clone();
        let tile_refs = tile_refs.clone();
        Rc::new(move |state: DragState, x: f64, y: f64| {
            ghost.set(None);
            if !state.moved {
                return; // a click, not a drag
            }
            let rects = drag::slot_rects(&tile_refs.borrow());
            let Some(slot) = drag::closest_slot(&rects, x, y) else {
                return; // released away from the grid
            };
            let target = store.snapshot().board.slots()[slot];
            let outcome = store.update(|session| session.drop_tile(state.source, target));
            if let DropOutcome::Swapped { solved } = outcome {
                bounced.set(Some(state.source));
                let bounced_reset = bounced.clone();
                // Replacing the handle drops any pending clear first.
                *bounce_clear.borrow_mut() = Some(Timeout::new(BOUNCE_CLEAR_MS, move || {
                    bounced_reset.set(None);
                }));
                if solved {
                    gloo::console::log!("solved in", store.snapshot().elapsed_secs);
                }
            }
        }) as Rc<dyn Fn(DragState, f64, f64)>
    };

    let on_move = {
        let drag_state = drag_state.clone();
        let ghost = ghost.clone();
        Rc::new(move |event: &MouseEvent| {
            let mut guard = drag_state.borrow_mut();
            let Some(state) = guard.as_mut() else {
                return;
            };
            if state.touch_id.is_some() {
                return;
            }
            let x = event.client_x() as f64;
            let y = event.client_y() as f64;
            if state.update(x, y) {
                ghost.set(Some((state.source, x - state.start_x, y - state.start_y)));
            }
            event.prevent_default();
        }) as Rc<dyn Fn(&MouseEvent)>
    };

    let on_release = {
        let drag_state = drag_state.clone();
        let finish_drag = finish_drag.clone();
        Rc::new(move |event: &MouseEvent| {
            let mouse_drag = drag_state
                .borrow()
                .as_ref()
                .map(|state| state.touch_id.is_none())
                .unwrap_or(false);
            if !mouse_drag {
                return;
            }
            let Some(state) = drag_state.borrow_mut().take() else {
                return;
            };
            finish_drag(state, event.client_x() as f64, event.client_y() as f64);
        }) as Rc<dyn Fn(&MouseEvent)>
    };

    let on_touch_move = {
        let drag_state = drag_state.clone();
        let ghost = ghost.clone();
        Rc::new(move |event: &TouchEvent| {
            let mut guard = drag_state.borrow_mut();
            let Some(state) = guard.as_mut() else {
                return;
            };
            let Some(touch_id) = state.touch_id else {
                return;
            };
            let Some(touch) = drag::touch_from_event(event, Some(touch_id), false) else {
                return;
            };
            let x = touch.client_x() as f64;
            let y = touch.client_y() as f64;
            if state.update(x, y) {
                ghost.set(Some((state.source, x - state.start_x, y - state.start_y)));
            }
            // Non-passive listener; keep the page from scrolling mid-drag.
            event.prevent_default();
        }) as Rc<dyn Fn(&TouchEvent)>
    };

    let on_touch_release = {
        let drag_state = drag_state.clone();
        let finish_drag = finish_drag.clone();
        Rc::new(move |event: &TouchEvent| {
            let touch = {
                let guard = drag_state.borrow();
                let Some(state) = guard.as_ref() else {
                    return;
                };
                let Some(touch_id) = state.touch_id else {
                    return;
                };
                match drag::touch_from_event(event, Some(touch_id), true) {
                    Some(touch) => touch,
                    // Some other finger lifted; the drag continues.
                    None => return,
                }
            };
            let Some(state) = drag_state.borrow_mut().take() else {
                return;
            };
            finish_drag(state, touch.client_x() as f64, touch.client_y() as f64);
        }) as Rc<dyn Fn(&TouchEvent)>
    };

    {
        let drag_handlers = drag_handlers.clone();
        let on_move = on_move.clone();
        let on_release = on_release.clone();
        let on_touch_move = on_touch_move.clone();
        let on_touch_release = on_touch_release.clone();
        use_effect_with((), move |_| {
            {
                let mut handlers = drag_handlers.borrow_mut();
                handlers.on_move = Some(on_move);
                handlers.on_release = Some(on_release);
                handlers.on_touch_move = Some(on_touch_move);
                handlers.on_touch_release = Some(on_touch_release);
            }
            let listeners = drag::window_drag_listeners(drag_handlers);
            move || drop(listeners)
        });
    }

    let on_tile_mouse_down = {
        let drag_state = drag_state.clone();
        let ghost = ghost.clone();
        let store = store.clone();
        Callback::from(move |(id, event): (TileId, MouseEvent)| {
            if store.snapshot().phase != Phase::Active {
                return;
            }
            if event.button() != 0 {
                return;
            }
            event.prevent_default();
            *drag_state.borrow_mut() = Some(DragState::begin(
                id,
                event.client_x() as f64,
                event.client_y() as f64,
                None,
            ));
            ghost.set(Some((id, 0.0, 0.0)));
        })
    };

    let on_tile_touch_start = {
        let drag_state = drag_state.clone();
        let ghost = ghost.clone();
        let store = store.clone();
        Callback::from(move |(id, event): (TileId, TouchEvent)| {
            if store.snapshot().phase != Phase::Active {
                return;
            }
            let Some(touch) = event.touches().item(0) else {
                return;
            };
            *drag_state.borrow_mut() = Some(DragState::begin(
                id,
                touch.client_x() as f64,
                touch.client_y() as f64,
                Some(touch.identifier()),
            ));
            ghost.set(Some((id, 0.0, 0.0)));
        })
    };

    let picture_value = (*picture).clone();
    let show_preview_value = *show_preview;
    let bounced_value = *bounced;
    let ghost_value = *ghost;
    let completed = session.phase == Phase::Completed;

    let on_restart = restart.reform(|_: MouseEvent| ());
    let on_preview_toggle = {
        let show_preview = show_preview.clone();
        Callback::from(move |_: MouseEvent| show_preview.set(!*show_preview))
    };

    let controls = if picture_value.is_some() {
        html! {
            <>
                <button class="control-button" type="button" onclick={on_restart}>
                    { "Shuffle again" }
                </button>
                <button class="control-button" type="button" onclick={on_preview_toggle}>
                    { if show_preview_value { "Hide preview" } else { "Show preview" } }
                </button>
            </>
        }
    } else {
        html! {}
    };

    let status = if picture_value.is_some() {
        let solved_banner = if completed {
            html! {
                <p class="status-solved">
                    { format!("Completed in {} seconds!", session.elapsed_secs) }
                </p>
            }
        } else {
            html! {}
        };
        html! {
            <>
                {solved_banner}
                <p class="status-clock">{ format!("Time: {}s", session.elapsed_secs) }</p>
            </>
        }
    } else {
        html! {}
    };

    let board_view = if let Some(url) = picture_value {
        let refs = tile_refs.borrow();
        let tiles: Html = session
            .board
            .slots()
            .iter()
            .enumerate()
            .map(|(slot, id)| {
                let id = *id;
                let ghost_offset = match ghost_value {
                    Some((ghost_id, dx, dy)) if ghost_id == id => Some((dx, dy)),
                    _ => None,
                };
                html! {
                    <TileView
                        key={id.to_string()}
                        {id}
                        picture={url.clone()}
                        completed={completed}
                        bounced={bounced_value == Some(id)}
                        ghost={ghost_offset}
                        node_ref={refs[slot].clone()}
                        on_mouse_down={on_tile_mouse_down.reform(move |event| (id, event))}
                        on_touch_start={on_tile_touch_start.reform(move |event| (id, event))}
                    />
                }
            })
            .collect();
        let preview = if show_preview_value {
            html! {
                <div class="preview-pane">
                    <img class="preview-image" src={url} alt="Uploaded picture" />
                </div>
            }
        } else {
            html! {}
        };
        html! {
            <div class="puzzle-row">
                <div class="puzzle-grid">{tiles}</div>
                {preview}
            </div>
        }
    } else {
        html! { <p class="hint">{ "Upload a picture to start the puzzle" }</p> }
    };

    html! {
        <main class="app">
            <h2 class="app-title">{ "Barabara" }</h2>
            <div class="controls">
                <input
                    class="picture-input"
                    type="file"
                    accept="image/*"
                    onchange={on_upload}
                />
                {controls}
            </div>
            {status}
            {board_view}
        </main>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::drag::{closest_slot, SlotRect};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn rect(left: f64, top: f64) -> Option<SlotRect> {
        Some(SlotRect {
            left,
            top,
            width: 150.0,
            height: 150.0,
        })
    }

    // 3x3 of 150px boxes on a 16px gap, like the widget's grid.
    fn grid_rects() -> Vec<Option<SlotRect>> {
        let mut rects = Vec::new();
        for row in 0..3 {
            for col in 0..3 {
                rects.push(rect(col as f64 * 166.0, row as f64 * 166.0));
            }
        }
        rects
    }

    #[wasm_bindgen_test]
    fn release_inside_a_slot_targets_it() {
        let rects = grid_rects();
        assert_eq!(closest_slot(&rects, 200.0, 30.0), Some(1));
    }

    #[wasm_bindgen_test]
    fn release_in_a_gap_picks_the_nearest_centre() {
        let rects = grid_rects();
        // In the gap between slots 0 and 1, slightly right of the midline.
        assert_eq!(closest_slot(&rects, 162.0, 75.0), Some(1));
    }

    #[wasm_bindgen_test]
    fn release_far_away_finds_no_target() {
        let rects = grid_rects();
        assert_eq!(closest_slot(&rects, 2000.0, 2000.0), None);
    }

    #[wasm_bindgen_test]
    fn unmounted_slots_are_skipped() {
        let mut rects = grid_rects();
        rects[4] = None;
        assert_eq!(closest_slot(&rects, 300.0, 250.0), Some(5));
    }

    #[wasm_bindgen_test]
    async fn app_renders_the_upload_prompt() {
        console_error_panic_hook::set_once();
        let document = web_sys::window()
            .and_then(|window| window.document())
            .expect("document available");
        let root = document.create_element("div").expect("create test root");
        document
            .body()
            .expect("body available")
            .append_child(&root)
            .expect("append test root");
        let _handle = yew::Renderer::<App>::with_root(root.clone()).render();
        gloo::timers::future::TimeoutFuture::new(50).await;
        let text = root.text_content().unwrap_or_default();
        assert!(
            text.contains("Upload a picture"),
            "unexpected dom: {text}"
        );
    }
}
