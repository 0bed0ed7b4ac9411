//! Selector strategies.
//!
//! A selector decides, on every pointer movement, which cells are candidates
//! and whether they may be committed. Two contracts exist:
//!
//! - [`SinglePhaseSelector`]: the click that lands on the footprint commits it
//! - [`TwoPhaseSelector`]: a first click marks an origin, movement traces a
//!   region, a second click commits
//!
//! The dispatcher stores the active strategy as an [`ActiveSelector`], so the
//! two-phase hooks can only be reached on strategies that implement them.

mod connecting;
mod disabled;
mod fixed;
mod flexible;

pub use connecting::{ConnectingSelector, connecting_neighbors};
pub use disabled::DisabledSelector;
pub use fixed::FixedFootprintSelector;
pub use flexible::FlexibleRectangleSelector;

use crate::board::{CellCollection, CellId};

use super::result::FinishedSelection;

/// Hooks shared by both contracts
pub trait Selector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Recompute capability flags over the whole board and reset
    /// per-activation state
    fn init(&mut self, cells: &mut CellCollection);

    /// Recompute capability flags for cells that changed on the board
    fn refresh(&mut self, cells: &mut CellCollection, changed: &[CellId]);

    fn is_selection_valid(&self) -> bool;

    /// The pointer moved onto any cell, hoverable or not
    fn on_hover_any(&mut self, cells: &mut CellCollection, target: CellId);

    /// The pointer moved onto a hoverable cell outside selection mode
    fn on_hover_selectable(&mut self, cells: &mut CellCollection, target: CellId);

    /// The pointer moved away from the previous hoverable target
    fn on_leave_target(&mut self, cells: &mut CellCollection, target: CellId);

    /// The pointer left every cell; `last` was the last target
    fn on_leave_board(&mut self, cells: &mut CellCollection, last: CellId);

    /// Produce the committed selection for a click on `target`
    fn finish(&mut self, cells: &CellCollection, target: CellId) -> FinishedSelection;

    /// Whether placements may stack onto occupied cells
    fn allows_stacking(&self) -> bool {
        false
    }
}

/// Commits on the click that defines the footprint
pub trait SinglePhaseSelector: Selector {}

/// Commits on a second click after a region has been traced
pub trait TwoPhaseSelector: Selector {
    fn on_first_click(&mut self, cells: &mut CellCollection, origin: CellId);

    /// Called on every qualifying move while in selection mode
    fn on_selection_mode(&mut self, cells: &mut CellCollection, origin: CellId, target: CellId);
}

/// The strategy the dispatcher currently drives
pub enum ActiveSelector {
    SinglePhase(Box<dyn SinglePhaseSelector>),
    TwoPhase(Box<dyn TwoPhaseSelector>),
}

impl ActiveSelector {
    pub fn single(selector: impl SinglePhaseSelector + 'static) -> Self {
        Self::SinglePhase(Box::new(selector))
    }

    pub fn two_phase(selector: impl TwoPhaseSelector + 'static) -> Self {
        Self::TwoPhase(Box::new(selector))
    }

    pub fn is_two_phase(&self) -> bool {
        matches!(self, ActiveSelector::TwoPhase(_))
    }

    pub fn as_selector(&self) -> &dyn Selector {
        match self {
            ActiveSelector::SinglePhase(s) => s.as_ref(),
            ActiveSelector::TwoPhase(s) => s.as_ref(),
        }
    }

    pub fn as_selector_mut(&mut self) -> &mut dyn Selector {
        match self {
            ActiveSelector::SinglePhase(s) => s.as_mut(),
            ActiveSelector::TwoPhase(s) => s.as_mut(),
        }
    }
}

impl Default for ActiveSelector {
    fn default() -> Self {
        Self::single(DisabledSelector)
    }
}

impl std::fmt::Debug for ActiveSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let phase = if self.is_two_phase() { "two-phase" } else { "single-phase" };
        write!(f, "{} ({})", self.as_selector().name(), phase)
    }
}

impl From<DisabledSelector> for ActiveSelector {
    fn from(selector: DisabledSelector) -> Self {
        Self::single(selector)
    }
}

impl From<FixedFootprintSelector> for ActiveSelector {
    fn from(selector: FixedFootprintSelector) -> Self {
        Self::single(selector)
    }
}

impl From<ConnectingSelector> for ActiveSelector {
    fn from(selector: ConnectingSelector) -> Self {
        Self::single(selector)
    }
}

impl From<FlexibleRectangleSelector> for ActiveSelector {
    fn from(selector: FlexibleRectangleSelector) -> Self {
        Self::two_phase(selector)
    }
}
