use bevy::prelude::*;

use crate::board::{CellCollection, CellId};
use crate::selection::bounds::GridRect;
use crate::selection::filter::Capabilities;
use crate::selection::region::{Region, RuleSet, ValidityRule};
use crate::selection::result::FinishedSelection;

use super::{Selector, SinglePhaseSelector};

/// Selects a footprint of fixed size centered on the cursor. Clicking a
/// valid footprint commits it immediately.
#[derive(Debug, Clone)]
pub struct FixedFootprintSelector {
    capabilities: Capabilities,
    length: i32,
    width: i32,
    max_height: usize,
    rules: RuleSet,
    region: Region,
    valid: bool,
}

impl Default for FixedFootprintSelector {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl FixedFootprintSelector {
    /// Footprint of `length` cells along x and `width` cells along y.
    /// Sizes below one are treated as one.
    pub fn new(length: i32, width: i32) -> Self {
        let mut selector = Self {
            capabilities: Capabilities::default(),
            length: 1,
            width: 1,
            max_height: 1,
            rules: RuleSet::default(),
            region: Region::default(),
            valid: false,
        };
        selector.set_footprint(length, width);
        selector.rebuild_rules();
        selector
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self.rebuild_rules();
        self
    }

    /// Allow stacking up to `max_height` levels. Heights below two disable
    /// stacking.
    pub fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height.max(1);
        self.rebuild_rules();
        self
    }

    pub fn set_footprint(&mut self, length: i32, width: i32) {
        self.length = length.max(1);
        self.width = width.max(1);
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Bounds the footprint would cover with the cursor on `target`
    pub fn bounds_at(&self, target: IVec2) -> GridRect {
        GridRect::footprint(target, self.length, self.width)
    }

    fn area(&self) -> usize {
        self.length as usize * self.width as usize
    }

    fn rebuild_rules(&mut self) {
        let mut rules = RuleSet::default().with(ValidityRule::AllSelectable);
        if self.allows_stacking() && self.capabilities.select_filter().admits_occupied() {
            rules.push(ValidityRule::StackCompatible {
                max_height: self.max_height,
            });
        }
        self.rules = rules;
    }
}

impl Selector for FixedFootprintSelector {
    fn name(&self) -> &'static str {
        "fixed footprint"
    }

    fn init(&mut self, cells: &mut CellCollection) {
        self.capabilities.apply_all(cells);
        self.region.forget();
        self.valid = false;
    }

    fn refresh(&mut self, cells: &mut CellCollection, changed: &[CellId]) {
        self.capabilities.apply(cells, changed);
    }

    fn is_selection_valid(&self) -> bool {
        self.valid
    }

    fn on_hover_any(&mut self, cells: &mut CellCollection, target: CellId) {
        let Some(coord) = cells.coord(target) else {
            return;
        };

        let bounds = self.bounds_at(coord);
        let members = cells.ids_where(|c| bounds.contains(c.coord()) && c.is_hoverable());
        let area = self.area();
        self.region.replace(cells, bounds, members, area);

        self.valid = match self.rules.first_failure(&self.region, cells) {
            None => true,
            Some(rule) => {
                trace!("Footprint at {:?} rejected by {:?}", coord, rule);
                false
            }
        };

        self.region.paint(cells, self.valid);
    }

    fn on_hover_selectable(&mut self, _cells: &mut CellCollection, _target: CellId) {}

    fn on_leave_target(&mut self, _cells: &mut CellCollection, _target: CellId) {}

    fn on_leave_board(&mut self, cells: &mut CellCollection, _last: CellId) {
        self.region.clear(cells);
        self.valid = false;
    }

    fn finish(&mut self, _cells: &CellCollection, target: CellId) -> FinishedSelection {
        FinishedSelection::with_bounds(
            target,
            self.region.members().to_vec(),
            self.region.bounds(),
        )
    }

    fn allows_stacking(&self) -> bool {
        self.max_height > 1
    }
}

impl SinglePhaseSelector for FixedFootprintSelector {}
