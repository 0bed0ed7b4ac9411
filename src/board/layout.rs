use bevy::prelude::*;

use super::settings::BoardSettings;

/// Where the board sits in world space. The board is centered on the
/// world origin with cell (0, 0) in the bottom-left corner.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    pub width: i32,
    pub height: i32,
    pub cell_size: f32,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::from_settings(&BoardSettings::default())
    }
}

impl BoardLayout {
    pub fn from_settings(settings: &BoardSettings) -> Self {
        Self {
            width: settings.width.max(0),
            height: settings.height.max(0),
            cell_size: settings.cell_size.max(1.0),
        }
    }

    /// World position of the bottom-left corner of cell (0, 0)
    pub fn origin(&self) -> Vec2 {
        -Vec2::new(self.width as f32, self.height as f32) * self.cell_size / 2.0
    }

    /// World size of the whole board
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.cell_size
    }

    pub fn cell_center(&self, coord: IVec2) -> Vec2 {
        self.origin() + (coord.as_vec2() + Vec2::splat(0.5)) * self.cell_size
    }

    /// Cell under a world position, if it lies on the board
    pub fn world_to_cell(&self, world: Vec2) -> Option<IVec2> {
        let local = (world - self.origin()) / self.cell_size;
        let coord = local.floor().as_ivec2();
        let inside =
            coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height;
        inside.then_some(coord)
    }
}
