//! Pointer input to selection lifecycle.
//!
//! The [`Dispatcher`] owns the cell collection and the single active
//! selector. It turns resolved pointer events (which cell, if any, is under
//! the cursor; a click; the cursor leaving the surface) into selector hooks
//! and emits the hover and selection-finished signals.

use bevy::prelude::*;

use crate::board::{CellBatch, CellCollection, CellId};

use super::result::FinishedSelection;
use super::selector::ActiveSelector;
use super::signals::{HoveredCell, SelectionSignals};

#[derive(Debug, Default)]
pub struct Dispatcher {
    cells: CellCollection,
    selector: ActiveSelector,
    /// Cell the next click applies to
    current_target: Option<CellId>,
    /// First click of a two-phase selection
    origin: Option<CellId>,
    in_selection_mode: bool,
    /// Last cell reported through the hover signal
    last_hover: Option<CellId>,
    signals: SelectionSignals,
}

impl Dispatcher {
    pub fn new(batches: Vec<CellBatch>) -> Self {
        let mut dispatcher = Self::default();
        dispatcher.set_cells(batches);
        dispatcher
    }

    pub fn cells(&self) -> &CellCollection {
        &self.cells
    }

    pub fn selector(&self) -> &ActiveSelector {
        &self.selector
    }

    pub fn signals(&self) -> &SelectionSignals {
        &self.signals
    }

    pub fn current_target(&self) -> Option<CellId> {
        self.current_target
    }

    /// Last cell reported through the hover signal
    pub fn last_hover(&self) -> Option<CellId> {
        self.last_hover
    }

    pub fn origin(&self) -> Option<CellId> {
        self.origin
    }

    pub fn is_in_selection_mode(&self) -> bool {
        self.in_selection_mode
    }

    pub fn is_selection_valid(&self) -> bool {
        self.selector.as_selector().is_selection_valid()
    }

    /// Install a new strategy. Any gesture in progress is aborted and every
    /// cell is reset before the new strategy computes its capabilities.
    pub fn set_selector(&mut self, selector: impl Into<ActiveSelector>) {
        self.clear_selection();
        self.selector = selector.into();
        debug!("Selector set to {:?}", self.selector);
        self.selector.as_selector_mut().init(&mut self.cells);
    }

    /// Replace the whole board
    pub fn set_cells(&mut self, batches: Vec<CellBatch>) {
        self.clear_selection();
        self.cells = CellCollection::from_batches(batches);
        debug!("Board replaced with {} cells", self.cells.len());
        self.selector.as_selector_mut().init(&mut self.cells);
    }

    /// Re-run the active strategy's capability filter over changed cells
    pub fn update_cells(&mut self, changed: &[CellId]) {
        if changed.is_empty() {
            return;
        }
        self.selector
            .as_selector_mut()
            .refresh(&mut self.cells, changed);
    }

    /// Mutate the board and refresh the cells `edit` reports as changed
    pub fn edit_cells(&mut self, edit: impl FnOnce(&mut CellCollection) -> Vec<CellId>) {
        let changed = edit(&mut self.cells);
        self.update_cells(&changed);
    }

    /// The pointer now rests on `hit`, or on nothing
    pub fn handle_pointer_move(&mut self, hit: Option<CellId>) {
        if hit == self.last_hover {
            return;
        }
        let previous = self.last_hover;
        self.last_hover = hit;
        trace!("Hover {:?} -> {:?}", previous, hit);

        let hovered = hit.and_then(|id| HoveredCell::describe(&self.cells, id));
        self.signals.hover.emit(&hovered);

        let Some(target) = hit else {
            self.current_target = None;
            if !self.in_selection_mode
                && let Some(previous) = previous
            {
                self.selector
                    .as_selector_mut()
                    .on_leave_board(&mut self.cells, previous);
            }
            return;
        };

        self.selector
            .as_selector_mut()
            .on_hover_any(&mut self.cells, target);

        if self.in_selection_mode {
            self.current_target = Some(target);
            if let (ActiveSelector::TwoPhase(selector), Some(origin)) =
                (&mut self.selector, self.origin)
            {
                selector.on_selection_mode(&mut self.cells, origin, target);
            }
            return;
        }

        let hoverable = self.cells.is_hoverable(target);
        let selector = self.selector.as_selector_mut();
        if hoverable {
            if let Some(previous) = self.current_target {
                selector.on_leave_target(&mut self.cells, previous);
            }
            self.current_target = Some(target);
            selector.on_hover_selectable(&mut self.cells, target);
        } else if let Some(previous) = self.current_target.take() {
            selector.on_leave_target(&mut self.cells, previous);
        }
    }

    pub fn handle_click(&mut self) {
        let Some(target) = self.current_target else {
            if self.in_selection_mode {
                debug!("Selection aborted by clicking off the board");
                self.clear_selection();
            }
            return;
        };

        if !self.is_selection_valid() {
            trace!("Click on {:?} ignored, selection invalid", target);
            return;
        }

        if !self.in_selection_mode
            && let ActiveSelector::TwoPhase(selector) = &mut self.selector
        {
            selector.on_first_click(&mut self.cells, target);
            self.origin = Some(target);
            self.in_selection_mode = true;
            // Trace the 1x1 region right away so a second click without
            // moving commits the origin cell
            selector.on_selection_mode(&mut self.cells, target, target);
            debug!("Selection started at {:?}", self.cells.coord(target));
            return;
        }

        self.commit(target);
    }

    /// The pointer left the drawing surface
    pub fn handle_pointer_left(&mut self) {
        if self.in_selection_mode {
            debug!("Selection aborted, pointer left the board");
        }
        self.clear_selection();
        self.signals.hover.emit(&None);
    }

    fn commit(&mut self, target: CellId) {
        let result: FinishedSelection = self
            .selector
            .as_selector_mut()
            .finish(&self.cells, target);
        debug!(
            "{} committed {} cells around {:?}",
            self.selector.as_selector().name(),
            result.members.len(),
            self.cells.coord(target)
        );
        self.signals.finished.emit(&result);
        self.clear_selection();
    }

    fn clear_selection(&mut self) {
        self.cells.reset_all();
        self.origin = None;
        self.current_target = None;
        self.last_hover = None;
        self.in_selection_mode = false;
    }
}
