//! Single-cell placement that extends itself into adjacent buildings.
//!
//! The target must pass the same check as a 1x1 fixed footprint. From there
//! the selection grows breadth-first through 4-neighbors that belong to the
//! chain pool (occupied cells, optionally of one building kind) for at most
//! `max_depth` levels, and the whole chain is capped in size.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::board::{BuildingKind, CellCollection, CellId, SelectableCell};
use crate::selection::bounds::GridRect;
use crate::selection::filter::Capabilities;
use crate::selection::region::{Region, RuleSet, ValidityRule};
use crate::selection::result::FinishedSelection;

use super::{FixedFootprintSelector, Selector, SinglePhaseSelector};

const NEIGHBORS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];

#[derive(Debug, Clone)]
pub struct ConnectingSelector {
    footprint: FixedFootprintSelector,
    building: Option<BuildingKind>,
    max_depth: usize,
    max_chain: usize,
    rules: RuleSet,
    /// Cells that may join a chain, recomputed on init and refresh
    pool: HashSet<CellId>,
    chain: Region,
    valid: bool,
}

impl ConnectingSelector {
    /// The chain, target included, must stay below `max_chain` cells. A cap
    /// of `n` therefore joins at most `n - 2` existing buildings.
    pub fn new(max_depth: usize, max_chain: usize) -> Self {
        Self {
            footprint: FixedFootprintSelector::new(1, 1),
            building: None,
            max_depth,
            max_chain,
            rules: RuleSet::default().with(ValidityRule::MembersBelow(max_chain)),
            pool: HashSet::new(),
            chain: Region::default(),
            valid: false,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.footprint = self.footprint.with_capabilities(capabilities);
        self
    }

    /// Only chain through buildings of this kind
    pub fn with_building(mut self, building: BuildingKind) -> Self {
        self.building = Some(building);
        self
    }

    fn in_pool(&self, cell: &SelectableCell) -> bool {
        match self.building {
            Some(kind) => cell.base_kind() == Some(kind),
            None => cell.is_occupied(),
        }
    }

    fn rebuild_pool(&mut self, cells: &CellCollection) {
        self.pool = cells.ids_where(|c| self.in_pool(c)).into_iter().collect();
    }

    /// Whether the chain may step from `from` onto `to`. Without a building
    /// kind, the chain follows a single building once it is on one.
    fn links(&self, cells: &CellCollection, from: CellId, to: CellId) -> bool {
        if self.building.is_some() {
            return true;
        }
        let (Some(from), Some(to)) = (cells.get(from), cells.get(to)) else {
            return false;
        };
        !from.is_occupied() || from.base_id() == to.base_id()
    }

    /// Breadth-first walk from `target`. Each pool cell joins at most once.
    fn walk(&self, cells: &CellCollection, target: CellId) -> Vec<CellId> {
        let mut remaining = self.pool.clone();
        remaining.remove(&target);

        let mut chain = Vec::new();
        let mut frontier = vec![target];

        for _ in 0..self.max_depth {
            let mut next = Vec::new();
            for &from in &frontier {
                let Some(coord) = cells.coord(from) else {
                    continue;
                };
                for offset in NEIGHBORS {
                    let Some(to) = cells.at(coord + offset) else {
                        continue;
                    };
                    if remaining.contains(&to) && self.links(cells, from, to) {
                        remaining.remove(&to);
                        next.push(to);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            chain.extend(next.iter().copied());
            frontier = next;
        }

        chain
    }
}

impl Selector for ConnectingSelector {
    fn name(&self) -> &'static str {
        "connecting chain"
    }

    fn init(&mut self, cells: &mut CellCollection) {
        self.footprint.init(cells);
        self.rebuild_pool(cells);
        self.chain.forget();
        self.valid = false;
    }

    fn refresh(&mut self, cells: &mut CellCollection, changed: &[CellId]) {
        self.footprint.refresh(cells, changed);
        self.rebuild_pool(cells);
    }

    fn is_selection_valid(&self) -> bool {
        self.valid
    }

    fn on_hover_any(&mut self, cells: &mut CellCollection, target: CellId) {
        self.footprint.on_hover_any(cells, target);
        let mut members = self.footprint.region().members().to_vec();

        if !self.footprint.is_selection_valid() {
            // Drop the old chain and keep the rejected target on its own
            let bounds = self.footprint.region().bounds();
            if let Some(bounds) = bounds {
                self.chain.replace(cells, bounds, members, 1);
            } else {
                self.chain.clear(cells);
            }
            self.valid = false;
            return;
        }

        members.extend(self.walk(cells, target));
        let Some(bounds) = GridRect::enclosing(members.iter().filter_map(|&id| cells.coord(id)))
        else {
            return;
        };
        self.chain.replace(cells, bounds, members, 1);

        self.valid = self.rules.evaluate(&self.chain, cells);
        if !self.valid {
            trace!(
                "Chain of {} reaches cap of {}",
                self.chain.len(),
                self.max_chain
            );
        }
        self.chain.paint(cells, self.valid);
    }

    fn on_hover_selectable(&mut self, _cells: &mut CellCollection, _target: CellId) {}

    fn on_leave_target(&mut self, _cells: &mut CellCollection, _target: CellId) {}

    fn on_leave_board(&mut self, cells: &mut CellCollection, last: CellId) {
        self.footprint.on_leave_board(cells, last);
        self.chain.clear(cells);
        self.valid = false;
    }

    fn finish(&mut self, cells: &CellCollection, target: CellId) -> FinishedSelection {
        FinishedSelection::enclosing(cells, target, self.chain.members().to_vec())
    }

    fn allows_stacking(&self) -> bool {
        self.footprint.allows_stacking()
    }
}

impl SinglePhaseSelector for ConnectingSelector {}

/// A chain member directly next to the placed cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorOffset {
    pub cell: CellId,
    /// Unit step from the target towards `cell`
    pub offset: IVec2,
}

/// Members of `members` that touch `target` along an axis, with the
/// direction each one lies in. The target itself is never reported.
pub fn connecting_neighbors(
    cells: &CellCollection,
    target: CellId,
    members: &[CellId],
) -> Vec<ConnectorOffset> {
    let Some(origin) = cells.coord(target) else {
        return Vec::new();
    };

    members
        .iter()
        .filter(|&&id| id != target)
        .filter_map(|&id| {
            let offset = cells.coord(id)? - origin;
            NEIGHBORS
                .contains(&offset)
                .then_some(ConnectorOffset { cell: id, offset })
        })
        .collect()
}
