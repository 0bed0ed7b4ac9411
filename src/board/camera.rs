use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::{BOARD_MARGIN, MAX_ZOOM, MIN_ZOOM};

use super::layout::BoardLayout;

#[derive(Component)]
pub struct BoardCamera;

#[derive(Component)]
pub struct CameraZoom {
    pub scale: f32,
}

impl Default for CameraZoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        BoardCamera,
        CameraZoom::default(),
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// Zoom that fits `extent` plus a margin inside a window of `window` size
pub fn fit_scale(extent: Vec2, window: Vec2) -> f32 {
    if window.x <= 0.0 || window.y <= 0.0 {
        return 1.0;
    }
    let padded = extent + Vec2::splat(BOARD_MARGIN * 2.0);
    (padded / window).max_element().clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Recenter on the board whenever its layout changes
pub fn fit_camera_to_board(
    layout: Res<BoardLayout>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut camera_query: Query<(&mut Transform, &mut CameraZoom), With<BoardCamera>>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((mut transform, mut zoom)) = camera_query.single_mut() else {
        return;
    };

    transform.translation.x = 0.0;
    transform.translation.y = 0.0;
    zoom.scale = fit_scale(layout.extent(), window.size());
}

/// Pan with the middle or right mouse button
pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut camera_query: Query<(&mut Transform, &CameraZoom), With<BoardCamera>>,
) {
    if !mouse_button.any_pressed([MouseButton::Middle, MouseButton::Right]) {
        mouse_motion.clear();
        return;
    }

    let Ok((mut transform, zoom)) = camera_query.single_mut() else {
        return;
    };

    for event in mouse_motion.read() {
        let delta = event.delta * zoom.scale;
        transform.translation.x -= delta.x;
        transform.translation.y += delta.y;
    }
}

pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    mut camera_query: Query<&mut CameraZoom, With<BoardCamera>>,
) {
    let Ok(mut zoom) = camera_query.single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        let scroll_amount = match event.unit {
            MouseScrollUnit::Line => event.y * 0.1,
            MouseScrollUnit::Pixel => event.y * 0.001,
        };

        zoom.scale = (zoom.scale - scroll_amount).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

pub fn apply_camera_zoom(
    mut camera_query: Query<(&CameraZoom, &mut Projection), (With<BoardCamera>, Changed<CameraZoom>)>,
) {
    for (zoom, mut projection) in camera_query.iter_mut() {
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = zoom.scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale_zooms_out_for_large_boards() {
        let scale = fit_scale(Vec2::new(3000.0, 500.0), Vec2::new(1000.0, 1000.0));
        assert!(scale > 3.0);
    }

    #[test]
    fn test_fit_scale_is_clamped() {
        assert!(fit_scale(Vec2::ZERO, Vec2::splat(1.0e6)) >= MIN_ZOOM);
        assert_eq!(fit_scale(Vec2::splat(1.0e6), Vec2::splat(10.0)), MAX_ZOOM);
        assert_eq!(fit_scale(Vec2::splat(100.0), Vec2::ZERO), 1.0);
    }
}
