use bevy::prelude::*;
use bevy::window::{CursorLeft, PrimaryWindow};
use bevy_egui::EguiContexts;

use crate::board::{BoardCamera, BoardLayout};

use super::SelectionState;

/// Resolve the cell under the cursor and feed moves and clicks to the
/// dispatcher. The pointer counts as off the board while it is over egui.
pub fn handle_pointer(
    mut state: ResMut<SelectionState>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    layout: Res<BoardLayout>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<BoardCamera>>,
    mut contexts: EguiContexts,
) {
    let over_ui = contexts
        .ctx_mut()
        .is_ok_and(|ctx| ctx.is_pointer_over_area());

    let Ok(window) = window_query.single() else {
        return;
    };

    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    let hit = window
        .cursor_position()
        .filter(|_| !over_ui)
        .and_then(|cursor| camera.viewport_to_world_2d(camera_transform, cursor).ok())
        .and_then(|world| layout.world_to_cell(world))
        .and_then(|coord| state.dispatcher.cells().at(coord));

    // Read-only access keeps the resource unchanged on idle frames
    let clicked = !over_ui && mouse_button.just_pressed(MouseButton::Left);
    if !clicked && hit == state.dispatcher.last_hover() {
        return;
    }

    state.dispatcher.handle_pointer_move(hit);
    if clicked {
        state.dispatcher.handle_click();
    }
}

/// Leaving the window aborts whatever gesture is in progress
pub fn handle_cursor_left(
    mut events: MessageReader<CursorLeft>,
    mut state: ResMut<SelectionState>,
) {
    for _ in events.read() {
        state.dispatcher.handle_pointer_left();
    }
}
