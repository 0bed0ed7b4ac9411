//! Flat view over every selectable cell on the board.
//!
//! Cells arrive grouped in render batches (one per instanced terrain mesh).
//! Selection logic does not care about batches, so the collection flattens
//! them into one list addressed by [`CellId`] and keeps a coordinate index
//! for pointer lookups.

use std::collections::HashMap;

use bevy::prelude::IVec2;

use super::cell::{BatchId, CellId, SelectableCell};

/// A group of cells rendered together
#[derive(Debug, Clone, Default)]
pub struct CellBatch {
    pub id: BatchId,
    pub cells: Vec<SelectableCell>,
}

impl CellBatch {
    pub fn new(id: BatchId, cells: Vec<SelectableCell>) -> Self {
        Self { id, cells }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CellCollection {
    cells: Vec<SelectableCell>,
    by_coord: HashMap<IVec2, CellId>,
}

impl CellCollection {
    pub fn from_batches(batches: Vec<CellBatch>) -> Self {
        let mut cells = Vec::new();
        let mut by_coord = HashMap::new();

        for batch in batches {
            for mut cell in batch.cells {
                cell.set_batch(batch.id);
                let id = CellId(cells.len());
                // First cell registered at a coordinate wins pointer lookups
                by_coord.entry(cell.coord()).or_insert(id);
                cells.push(cell);
            }
        }

        Self { cells, by_coord }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, id: CellId) -> Option<&SelectableCell> {
        self.cells.get(id.0)
    }

    pub fn get_mut(&mut self, id: CellId) -> Option<&mut SelectableCell> {
        self.cells.get_mut(id.0)
    }

    /// Look up the cell at a grid coordinate
    pub fn at(&self, coord: IVec2) -> Option<CellId> {
        self.by_coord.get(&coord).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, &SelectableCell)> {
        self.cells.iter().enumerate().map(|(i, c)| (CellId(i), c))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (CellId, &mut SelectableCell)> {
        self.cells.iter_mut().enumerate().map(|(i, c)| (CellId(i), c))
    }

    pub fn ids(&self) -> impl Iterator<Item = CellId> + use<> {
        (0..self.cells.len()).map(CellId)
    }

    /// Ids of all cells matching `pred`, in collection order
    pub fn ids_where(&self, pred: impl Fn(&SelectableCell) -> bool) -> Vec<CellId> {
        self.iter()
            .filter(|(_, cell)| pred(cell))
            .map(|(id, _)| id)
            .collect()
    }

    /// Run `f` on a cell if it exists
    pub fn with_mut(&mut self, id: CellId, f: impl FnOnce(&mut SelectableCell)) {
        if let Some(cell) = self.cells.get_mut(id.0) {
            f(cell);
        }
    }

    pub fn coord(&self, id: CellId) -> Option<IVec2> {
        self.get(id).map(|c| c.coord())
    }

    pub fn is_hoverable(&self, id: CellId) -> bool {
        self.get(id).is_some_and(|c| c.is_hoverable())
    }

    pub fn is_selectable(&self, id: CellId) -> bool {
        self.get(id).is_some_and(|c| c.is_selectable())
    }

    pub fn hover(&mut self, ids: &[CellId], accepted: bool) {
        for &id in ids {
            self.with_mut(id, |c| c.hover(accepted));
        }
    }

    pub fn unhover(&mut self, ids: &[CellId]) {
        for &id in ids {
            self.with_mut(id, |c| c.unhover());
        }
    }

    /// Unselect and unhover every cell on the board
    pub fn reset_all(&mut self) {
        for cell in &mut self.cells {
            cell.unselect_and_unhover();
        }
    }

    /// Ids of cells that are currently selected or hovered
    #[cfg(test)]
    pub fn active_ids(&self) -> Vec<CellId> {
        self.ids_where(|c| c.is_selected_or_hovered())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TerrainKind;

    fn batch(id: u32, coords: &[(i32, i32)], terrain: TerrainKind) -> CellBatch {
        CellBatch::new(
            BatchId(id),
            coords
                .iter()
                .map(|&(x, y)| SelectableCell::new(IVec2::new(x, y), terrain))
                .collect(),
        )
    }

    #[test]
    fn test_batches_are_flattened_in_order() {
        let cells = CellCollection::from_batches(vec![
            batch(0, &[(0, 0), (1, 0)], TerrainKind::Grass),
            batch(1, &[(2, 0)], TerrainKind::Pond),
        ]);

        assert_eq!(cells.len(), 3);
        assert_eq!(cells.coord(CellId(2)), Some(IVec2::new(2, 0)));
        assert_eq!(cells.get(CellId(2)).unwrap().batch(), BatchId(1));
        assert_eq!(cells.get(CellId(0)).unwrap().batch(), BatchId(0));
    }

    #[test]
    fn test_lookup_by_coordinate() {
        let cells = CellCollection::from_batches(vec![batch(
            0,
            &[(0, 0), (1, 0), (0, 1)],
            TerrainKind::Grass,
        )]);

        assert_eq!(cells.at(IVec2::new(0, 1)), Some(CellId(2)));
        assert_eq!(cells.at(IVec2::new(5, 5)), None);
    }

    #[test]
    fn test_reset_all_clears_runtime_flags() {
        let mut cells =
            CellCollection::from_batches(vec![batch(0, &[(0, 0), (1, 0)], TerrainKind::Grass)]);
        cells.with_mut(CellId(0), |c| c.select());
        cells.hover(&[CellId(1)], true);
        assert_eq!(cells.active_ids().len(), 2);

        cells.reset_all();
        assert!(cells.active_ids().is_empty());
    }

    #[test]
    fn test_missing_ids_are_ignored() {
        let mut cells = CellCollection::default();
        cells.hover(&[CellId(4)], true);
        assert!(cells.is_empty());
        assert!(!cells.is_hoverable(CellId(4)));
    }
}
