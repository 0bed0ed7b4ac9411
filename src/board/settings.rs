use std::collections::HashSet;
use std::sync::Arc;

use bevy::prelude::IVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_CELL_SIZE};

use super::cell::{AppearanceHook, BatchId, SelectableCell};
use super::collection::CellBatch;
use super::terrain::TerrainKind;

/// Persisted shape of the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub width: i32,
    pub height: i32,
    /// World units per cell side
    pub cell_size: f32,
    /// Cells that start as water, as `[x, y]`
    pub ponds: Vec<[i32; 2]>,
    /// Cells that start as mountains, as `[x, y]`. Wins over ponds.
    pub mountains: Vec<[i32; 2]>,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            ponds: vec![[4, 3], [5, 3], [4, 4], [5, 4], [6, 4], [5, 5]],
            mountains: vec![[16, 10], [17, 10], [17, 11], [18, 11], [18, 12], [19, 12]],
        }
    }
}

impl BoardSettings {
    pub fn contains(&self, coord: IVec2) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    /// Split the board into one render batch per terrain kind.
    /// Every cell reports appearance changes to `hook` when given.
    pub fn build_batches(&self, hook: Option<Arc<dyn AppearanceHook>>) -> Vec<CellBatch> {
        let to_set = |coords: &[[i32; 2]]| -> HashSet<IVec2> {
            coords.iter().map(|&[x, y]| IVec2::new(x, y)).collect()
        };
        let ponds = to_set(&self.ponds);
        let mountains = to_set(&self.mountains);

        let mut batches: Vec<CellBatch> = TerrainKind::all()
            .iter()
            .enumerate()
            .map(|(i, _)| CellBatch::new(BatchId(i as u32), Vec::new()))
            .collect();

        for y in 0..self.height.max(0) {
            for x in 0..self.width.max(0) {
                let coord = IVec2::new(x, y);
                let terrain = if mountains.contains(&coord) {
                    TerrainKind::Mountain
                } else if ponds.contains(&coord) {
                    TerrainKind::Pond
                } else {
                    TerrainKind::Grass
                };

                let mut cell = SelectableCell::new(coord, terrain);
                if let Some(hook) = &hook {
                    cell = cell.with_hook(hook.clone());
                }

                let index = TerrainKind::all()
                    .iter()
                    .position(|&k| k == terrain)
                    .unwrap_or_default();
                batches[index].cells.push(cell);
            }
        }

        batches.retain(|b| !b.cells.is_empty());
        batches
    }
}
