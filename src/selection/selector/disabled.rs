use crate::board::{CellCollection, CellId};
use crate::selection::result::FinishedSelection;

use super::{Selector, SinglePhaseSelector};

/// Suspends placement. Every hook is a no-op and no selection is ever
/// valid, but the dispatcher keeps reporting hover changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSelector;

impl Selector for DisabledSelector {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn init(&mut self, _cells: &mut CellCollection) {}

    fn refresh(&mut self, _cells: &mut CellCollection, _changed: &[CellId]) {}

    fn is_selection_valid(&self) -> bool {
        false
    }

    fn on_hover_any(&mut self, _cells: &mut CellCollection, _target: CellId) {}

    fn on_hover_selectable(&mut self, _cells: &mut CellCollection, _target: CellId) {}

    fn on_leave_target(&mut self, _cells: &mut CellCollection, _target: CellId) {}

    fn on_leave_board(&mut self, _cells: &mut CellCollection, _last: CellId) {}

    fn finish(&mut self, _cells: &CellCollection, target: CellId) -> FinishedSelection {
        FinishedSelection::with_bounds(target, Vec::new(), None)
    }
}

impl SinglePhaseSelector for DisabledSelector {}
