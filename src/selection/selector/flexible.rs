use crate::board::{CellCollection, CellId};
use crate::selection::bounds::GridRect;
use crate::selection::filter::Capabilities;
use crate::selection::region::{Region, RuleSet, ValidityRule};
use crate::selection::result::FinishedSelection;

use super::{Selector, TwoPhaseSelector};

/// Drag-style rectangle between an origin click and the cursor.
///
/// The region holds every selectable cell inside the rectangle. With
/// incomplete selections disallowed, a single unselectable cell in the
/// rectangle invalidates the whole selection.
#[derive(Debug, Clone)]
pub struct FlexibleRectangleSelector {
    capabilities: Capabilities,
    max_length: Option<usize>,
    max_width: Option<usize>,
    allow_incomplete: bool,
    rules: RuleSet,
    region: Region,
    valid: bool,
}

impl Default for FlexibleRectangleSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl FlexibleRectangleSelector {
    /// Unbounded rectangle that may skip unselectable cells
    pub fn new() -> Self {
        let mut selector = Self {
            capabilities: Capabilities::default(),
            max_length: None,
            max_width: None,
            allow_incomplete: true,
            rules: RuleSet::default(),
            region: Region::default(),
            valid: false,
        };
        selector.rebuild_rules();
        selector
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Limit the rectangle to `length` cells along x and `width` along y
    pub fn with_max_size(mut self, length: Option<usize>, width: Option<usize>) -> Self {
        self.set_max_size(length, width);
        self
    }

    pub fn with_allow_incomplete(mut self, allow: bool) -> Self {
        self.set_allow_incomplete(allow);
        self
    }

    pub fn set_max_size(&mut self, length: Option<usize>, width: Option<usize>) {
        self.max_length = length;
        self.max_width = width;
        self.rebuild_rules();
    }

    pub fn set_allow_incomplete(&mut self, allow: bool) {
        self.allow_incomplete = allow;
        self.rebuild_rules();
    }

    fn rebuild_rules(&mut self) {
        self.rules.set(ValidityRule::MaxSize {
            length: self.max_length,
            width: self.max_width,
        });
        if self.allow_incomplete {
            self.rules
                .remove(|rule| matches!(rule, ValidityRule::Complete));
        } else {
            self.rules.set(ValidityRule::Complete);
        }
    }
}

impl Selector for FlexibleRectangleSelector {
    fn name(&self) -> &'static str {
        "flexible rectangle"
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

    fn on_hover_any(&mut self, _cells: &mut CellCollection, _target: CellId) {}

    fn on_hover_selectable(&mut self, cells: &mut CellCollection, target: CellId) {
        let Some(cell) = cells.get_mut(target) else {
            return;
        };
        // Hoverable-only cells show rejected feedback
        let accepted = cell.is_selectable();
        cell.hover(accepted);
        self.valid = accepted;
    }

    fn on_leave_target(&mut self, cells: &mut CellCollection, target: CellId) {
        cells.unhover(&[target]);
    }

    fn on_leave_board(&mut self, cells: &mut CellCollection, last: CellId) {
        cells.with_mut(last, |c| c.unselect_and_unhover());
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
        false
    }
}

impl TwoPhaseSelector for FlexibleRectangleSelector {
    fn on_first_click(&mut self, cells: &mut CellCollection, origin: CellId) {
        cells.with_mut(origin, |c| c.select());
    }

    fn on_selection_mode(&mut self, cells: &mut CellCollection, origin: CellId, target: CellId) {
        let (Some(from), Some(to)) = (cells.coord(origin), cells.coord(target)) else {
            return;
        };

        let bounds = GridRect::spanning(from, to);
        let members = cells.ids_where(|c| bounds.contains(c.coord()) && c.is_selectable());
        self.region.replace(cells, bounds, members, bounds.area());

        self.valid = self.rules.evaluate(&self.region, cells);
        self.region.paint(cells, self.valid);
    }
}
