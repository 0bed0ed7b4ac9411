//! Declarative cell filters and the capability pass every selector runs.
//!
//! A selector is built with a "cells to select" filter and an optional
//! "cells to hover" filter. Running [`Capabilities::apply`] over the board
//! marks matching cells selectable+hoverable and everything else neither;
//! a distinct hover filter then grants hoverability to extra cells so they
//! can show rejected feedback without ever being selectable.

use serde::{Deserialize, Serialize};

use crate::board::{CellCollection, CellId, SelectableCell, TerrainKind};

/// Conjunctive constraints on a cell. `None` fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellFilter {
    /// Terrain kinds the cell must be one of
    #[serde(default)]
    pub terrain: Option<Vec<TerrainKind>>,
    /// Required occupancy
    #[serde(default)]
    pub occupied: Option<bool>,
    /// Required "can accept a placement" flag
    #[serde(default)]
    pub can_place: Option<bool>,
}

impl CellFilter {
    /// Matches every cell
    pub fn any() -> Self {
        Self::default()
    }

    /// Cells that accept buildings, regardless of occupancy
    pub fn buildable() -> Self {
        Self {
            can_place: Some(true),
            ..Self::default()
        }
    }

    pub fn terrain(mut self, kinds: &[TerrainKind]) -> Self {
        self.terrain = Some(kinds.to_vec());
        self
    }

    pub fn occupied(mut self, occupied: bool) -> Self {
        self.occupied = Some(occupied);
        self
    }

    pub fn can_place(mut self, can_place: bool) -> Self {
        self.can_place = Some(can_place);
        self
    }

    /// Whether this filter lets occupied cells through
    pub fn admits_occupied(&self) -> bool {
        self.occupied != Some(false)
    }

    pub fn matches(&self, cell: &SelectableCell) -> bool {
        if let Some(kinds) = &self.terrain
            && !kinds.contains(&cell.terrain())
        {
            return false;
        }

        if let Some(occupied) = self.occupied
            && occupied != cell.is_occupied()
        {
            return false;
        }

        if let Some(can_place) = self.can_place
            && can_place != cell.can_place()
        {
            return false;
        }

        true
    }
}

/// Select/hover filter pair shared by every selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    select: CellFilter,
    hover: Option<CellFilter>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::new(CellFilter::buildable())
    }
}

impl Capabilities {
    pub fn new(select: CellFilter) -> Self {
        Self {
            select,
            hover: None,
        }
    }

    /// Also make cells matching `hover` hoverable (never selectable)
    pub fn with_hover(mut self, hover: CellFilter) -> Self {
        if hover != self.select {
            self.hover = Some(hover);
        }
        self
    }

    pub fn select_filter(&self) -> &CellFilter {
        &self.select
    }

    /// Recompute capability flags for the whole board
    pub fn apply_all(&self, cells: &mut CellCollection) {
        let ids: Vec<CellId> = cells.ids().collect();
        self.apply(cells, &ids);
    }

    /// Recompute capability flags for the given cells only
    pub fn apply(&self, cells: &mut CellCollection, ids: &[CellId]) {
        for &id in ids {
            cells.with_mut(id, |cell| {
                let allowed = self.select.matches(cell);
                cell.set_selectable(allowed);
                cell.set_hoverable(allowed);
            });
        }

        let Some(hover) = &self.hover else {
            return;
        };

        for &id in ids {
            cells.with_mut(id, |cell| {
                if cell.is_selectable() {
                    return;
                }
                cell.set_hoverable(hover.matches(cell));
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BuildingKind, CellBatch, OccupantId};
    use bevy::prelude::IVec2;

    fn board() -> CellCollection {
        let mut occupied = SelectableCell::new(IVec2::new(1, 0), TerrainKind::Grass);
        occupied.place_occupant(OccupantId(1), BuildingKind::House);

        CellCollection::from_batches(vec![CellBatch {
            cells: vec![
                SelectableCell::new(IVec2::new(0, 0), TerrainKind::Grass),
                occupied,
                SelectableCell::new(IVec2::new(2, 0), TerrainKind::Pond),
                SelectableCell::new(IVec2::new(3, 0), TerrainKind::Mountain),
            ],
            ..Default::default()
        }])
    }

    fn flags(cells: &CellCollection) -> Vec<(bool, bool)> {
        cells
            .iter()
            .map(|(_, c)| (c.is_selectable(), c.is_hoverable()))
            .collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let cells = board();
        assert!(cells.iter().all(|(_, c)| CellFilter::any().matches(c)));
    }

    #[test]
    fn test_filter_by_terrain() {
        let cells = board();
        let filter = CellFilter::any().terrain(&[TerrainKind::Pond, TerrainKind::Mountain]);
        let matched = cells.ids_where(|c| filter.matches(c));
        assert_eq!(matched, vec![CellId(2), CellId(3)]);
    }

    #[test]
    fn test_filter_by_occupancy_and_placement() {
        let cells = board();
        let filter = CellFilter::buildable().occupied(false);
        assert_eq!(cells.ids_where(|c| filter.matches(c)), vec![CellId(0)]);

        let filter = CellFilter::any().occupied(true);
        assert_eq!(cells.ids_where(|c| filter.matches(c)), vec![CellId(1)]);
    }

    #[test]
    fn test_admits_occupied() {
        assert!(CellFilter::any().admits_occupied());
        assert!(CellFilter::any().occupied(true).admits_occupied());
        assert!(!CellFilter::any().occupied(false).admits_occupied());
    }

    #[test]
    fn test_single_filter_sets_both_flags() {
        let mut cells = board();
        Capabilities::new(CellFilter::buildable().occupied(false)).apply_all(&mut cells);
        assert_eq!(
            flags(&cells),
            vec![(true, true), (false, false), (false, false), (false, false)]
        );
    }

    #[test]
    fn test_hover_filter_adds_hoverable_cells() {
        let mut cells = board();
        Capabilities::new(CellFilter::buildable().occupied(false))
            .with_hover(CellFilter::buildable())
            .apply_all(&mut cells);

        // Occupied grass is hoverable for feedback but not selectable
        assert_eq!(
            flags(&cells),
            vec![(true, true), (false, true), (false, false), (false, false)]
        );
    }

    #[test]
    fn test_hover_filter_never_lowers_selectable_cells() {
        let mut cells = board();
        Capabilities::new(CellFilter::buildable())
            .with_hover(CellFilter::any().terrain(&[TerrainKind::Pond]))
            .apply_all(&mut cells);

        assert_eq!(
            flags(&cells),
            vec![(true, true), (true, true), (false, true), (false, false)]
        );
    }

    #[test]
    fn test_partial_apply_leaves_other_cells_alone() {
        let mut cells = board();
        Capabilities::new(CellFilter::any().terrain(&[TerrainKind::Pond]))
            .apply(&mut cells, &[CellId(0)]);

        assert_eq!(flags(&cells)[0], (false, false));
        assert_eq!(flags(&cells)[1], (true, true));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let caps = Capabilities::new(CellFilter::buildable().occupied(false))
            .with_hover(CellFilter::buildable());
        let mut once = board();
        caps.apply_all(&mut once);
        let mut twice = board();
        caps.apply_all(&mut twice);
        caps.apply_all(&mut twice);
        assert_eq!(flags(&once), flags(&twice));
    }
}
