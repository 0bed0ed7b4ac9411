mod camera;
pub mod cell;
pub mod collection;
mod layout;
pub mod occupant;
mod render;
mod settings;
pub mod terrain;

pub use camera::BoardCamera;
pub use cell::{Appearance, AppearanceHook, BatchId, CellId, SelectableCell};
pub use collection::{CellBatch, CellCollection};
pub use layout::BoardLayout;
pub use occupant::{BuildingKind, OccupantId, OccupantIds};
pub use render::{DirtyCells, RebuildBoardRequest};
pub use settings::BoardSettings;
pub use terrain::TerrainKind;

use bevy::prelude::*;

use crate::config::ConfigLoaded;
use crate::theme;

pub struct BoardPlugin;

impl Plugin for BoardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BoardLayout>()
            .init_resource::<DirtyCells>()
            .insert_resource(ClearColor(theme::BACKGROUND))
            .add_message::<RebuildBoardRequest>()
            .add_systems(
                Startup,
                (
                    camera::spawn_camera,
                    render::rebuild_board.after(ConfigLoaded),
                ),
            )
            .add_systems(
                Update,
                (
                    camera::camera_pan,
                    camera::camera_zoom,
                    camera::apply_camera_zoom,
                    render::draw_grid,
                    render::rebuild_board.run_if(on_message::<RebuildBoardRequest>),
                    camera::fit_camera_to_board.run_if(resource_changed::<BoardLayout>),
                ),
            )
            .add_systems(PostUpdate, render::recolor_cells);
    }
}
