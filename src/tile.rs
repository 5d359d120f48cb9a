use std::fmt::Write;

use yew::prelude::*;

use barabara_core::{background_offset, TileId};

/// The picture spans three tiles per axis, so each cell scales it to
/// 300% and crops with its identity's offset.
const PICTURE_SCALE: &str = "300% 300%";

#[derive(Properties, PartialEq)]
pub(crate) struct TileProps {
    pub id: TileId,
    pub picture: AttrValue,
    pub completed: bool,
    pub bounced: bool,
    /// Client-pixel offset while this tile rides the pointer.
    pub ghost: Option<(f64, f64)>,
    pub node_ref: NodeRef,
    pub on_mouse_down: Callback<MouseEvent>,
    pub on_touch_start: Callback<TouchEvent>,
}

/// One cell of the grid. Pure presentation: which region of the picture
/// it shows follows from its identity alone, and all drag tracking lives
/// with the window-level handlers in the parent.
#[function_component(TileView)]
pub(crate) fn tile_view(props: &TileProps) -> Html {
    let mut class = Classes::from("tile");
    if props.completed {
        class.push("tile-locked");
    }
    if props.bounced {
        class.push("tile-bounce");
    }
    if props.ghost.is_some() {
        class.push("tile-dragging");
    }

    let mut style = format!(
        "background-image: url({}); background-size: {}; background-position: {};",
        props.picture,
        PICTURE_SCALE,
        background_offset(props.id)
    );
    if let Some((dx, dy)) = props.ghost {
        let _ = write!(style, " transform: translate({dx:.1}px, {dy:.1}px);");
    }

    html! {
        <div
            ref={props.node_ref.clone()}
            {class}
            {style}
            onmousedown={props.on_mouse_down.clone()}
            ontouchstart={props.on_touch_start.clone()}
        />
    }
}
