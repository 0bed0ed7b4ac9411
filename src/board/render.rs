//! Sprites for board cells.
//!
//! Every cell gets one flat sprite. Cells report appearance changes through
//! [`DirtyCells`], and [`recolor_cells`] repaints only the reported ones from
//! the cell's current terrain, occupants and appearance.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use bevy::color::Mix;
use bevy::prelude::*;

use crate::config::AppConfig;
use crate::constants::{CELL_FILL, CELL_Z};
use crate::selection::SelectionState;
use crate::theme;

use super::{Appearance, AppearanceHook, BatchId, BoardLayout, SelectableCell};

#[derive(Component)]
pub struct CellSprite {
    pub coord: IVec2,
}

/// Ask for the board to be regenerated from the current config
#[derive(Message)]
pub struct RebuildBoardRequest;

/// Coordinates whose sprite needs repainting
#[derive(Resource, Clone, Default)]
pub struct DirtyCells(Arc<Mutex<HashSet<IVec2>>>);

impl DirtyCells {
    pub fn mark(&self, coord: IVec2) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(coord);
    }

    pub fn mark_all(&self, coords: impl IntoIterator<Item = IVec2>) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(coords);
    }

    pub fn take(&self) -> HashSet<IVec2> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl AppearanceHook for DirtyCells {
    fn appearance_changed(&self, _batch: BatchId, coord: IVec2, _appearance: Appearance) {
        self.mark(coord);
    }
}

/// Sprite color for a cell in its current state
pub fn cell_color(cell: &SelectableCell) -> Color {
    let base = match cell.base_kind() {
        Some(kind) => {
            let extra_levels = cell.stack_height().saturating_sub(1) as f32;
            let lighten = (extra_levels * theme::STACK_LIGHTEN_STEP).min(0.5);
            theme::building_color(kind).mix(&Color::WHITE, lighten)
        }
        None => theme::terrain_color(cell.terrain()),
    };

    match cell.appearance() {
        Appearance::Default => base,
        Appearance::Hovered => base.mix(&theme::HOVER_TINT, 0.35),
        Appearance::Rejected => base.mix(&theme::REJECTED_TINT, 0.6),
        Appearance::Selected => base.mix(&theme::SELECTED_TINT, 0.6),
    }
}

/// Regenerate cells and sprites from the board settings in the config
pub fn rebuild_board(
    mut commands: Commands,
    config: Res<AppConfig>,
    mut layout: ResMut<BoardLayout>,
    mut state: ResMut<SelectionState>,
    dirty: Res<DirtyCells>,
    existing: Query<Entity, With<CellSprite>>,
) {
    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    let settings = &config.data.board;
    *layout = BoardLayout::from_settings(settings);

    let hook: Arc<dyn AppearanceHook> = Arc::new(dirty.clone());
    state.dispatcher.set_cells(settings.build_batches(Some(hook)));

    let size = Vec2::splat(layout.cell_size * CELL_FILL);
    for (_, cell) in state.dispatcher.cells().iter() {
        commands.spawn((
            Sprite::from_color(cell_color(cell), size),
            Transform::from_translation(layout.cell_center(cell.coord()).extend(CELL_Z)),
            CellSprite {
                coord: cell.coord(),
            },
        ));
    }

    // Sprites were spawned with fresh colors
    dirty.take();

    info!(
        "Built {}x{} board ({} cells)",
        layout.width,
        layout.height,
        state.dispatcher.cells().len()
    );
}

pub fn recolor_cells(
    dirty: Res<DirtyCells>,
    state: Res<SelectionState>,
    mut sprites: Query<(&CellSprite, &mut Sprite)>,
) {
    let changed = dirty.take();
    if changed.is_empty() {
        return;
    }

    let cells = state.dispatcher.cells();
    for (marker, mut sprite) in sprites.iter_mut() {
        if !changed.contains(&marker.coord) {
            continue;
        }
        let Some(cell) = cells.at(marker.coord).and_then(|id| cells.get(id)) else {
            continue;
        };
        sprite.color = cell_color(cell);
    }
}

pub fn draw_grid(mut gizmos: Gizmos, layout: Res<BoardLayout>) {
    let origin = layout.origin();
    let extent = layout.extent();

    for x in 0..=layout.width {
        let x_pos = origin.x + x as f32 * layout.cell_size;
        gizmos.line_2d(
            Vec2::new(x_pos, origin.y),
            Vec2::new(x_pos, origin.y + extent.y),
            theme::GRID_COLOR,
        );
    }

    for y in 0..=layout.height {
        let y_pos = origin.y + y as f32 * layout.cell_size;
        gizmos.line_2d(
            Vec2::new(origin.x, y_pos),
            Vec2::new(origin.x + extent.x, y_pos),
            theme::GRID_COLOR,
        );
    }
}
