//! The selectable cell state object.
//!
//! A cell carries capability flags (what the active selector allows), runtime
//! flags (what the cursor is doing to it right now) and its occupant stack.
//! Visual state is derived from the runtime flags with the precedence
//! Default < Hovered < Selected, and every visible change is reported to an
//! optional [`AppearanceHook`].

use std::fmt;
use std::sync::Arc;

use bevy::prelude::IVec2;

use super::occupant::Occupant;
use super::{BuildingKind, OccupantId, TerrainKind};

/// Index of a cell inside a [`super::CellCollection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub usize);

/// Render batch a cell belongs to (one per instanced terrain group)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BatchId(pub u32);

/// Visible state of a cell, lowest weight first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Appearance {
    #[default]
    Default,
    Hovered,
    /// Hovered as part of a selection that cannot be committed
    Rejected,
    Selected,
}

/// Receives appearance changes so the rendering layer can recolor cells
pub trait AppearanceHook: Send + Sync {
    fn appearance_changed(&self, batch: BatchId, coord: IVec2, appearance: Appearance);
}

#[derive(Clone)]
pub struct SelectableCell {
    coord: IVec2,
    terrain: TerrainKind,
    batch: BatchId,
    selectable: bool,
    hoverable: bool,
    can_place: bool,
    selected: bool,
    hovered: bool,
    rejected: bool,
    appearance: Appearance,
    occupants: Vec<Occupant>,
    hook: Option<Arc<dyn AppearanceHook>>,
}

impl fmt::Debug for SelectableCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectableCell")
            .field("coord", &self.coord)
            .field("terrain", &self.terrain)
            .field("selectable", &self.selectable)
            .field("hoverable", &self.hoverable)
            .field("selected", &self.selected)
            .field("hovered", &self.hovered)
            .field("occupants", &self.occupants.len())
            .finish()
    }
}

impl SelectableCell {
    pub fn new(coord: IVec2, terrain: TerrainKind) -> Self {
        Self {
            coord,
            terrain,
            batch: BatchId::default(),
            selectable: true,
            hoverable: true,
            can_place: terrain.accepts_buildings(),
            selected: false,
            hovered: false,
            rejected: false,
            appearance: Appearance::Default,
            occupants: Vec::new(),
            hook: None,
        }
    }

    pub fn with_hook(mut self, hook: Arc<dyn AppearanceHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub(crate) fn set_batch(&mut self, batch: BatchId) {
        self.batch = batch;
    }

    pub fn coord(&self) -> IVec2 {
        self.coord
    }

    pub fn terrain(&self) -> TerrainKind {
        self.terrain
    }

    pub fn batch(&self) -> BatchId {
        self.batch
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    // ------------------------------------------------------------------
    // Capability flags
    // ------------------------------------------------------------------

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// Turning selectability off drops any hover or selection on the cell
    pub fn set_selectable(&mut self, value: bool) {
        self.selectable = value;
        if !value {
            self.unselect_and_unhover();
        }
    }

    pub fn is_hoverable(&self) -> bool {
        self.hoverable
    }

    /// Turning hoverability off drops any hover or selection on the cell
    pub fn set_hoverable(&mut self, value: bool) {
        self.hoverable = value;
        if !value {
            self.unselect_and_unhover();
        }
    }

    pub fn can_place(&self) -> bool {
        self.can_place
    }

    pub fn set_can_place(&mut self, value: bool) {
        self.can_place = value;
    }

    // ------------------------------------------------------------------
    // Runtime flags
    // ------------------------------------------------------------------

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_selected_or_hovered(&self) -> bool {
        self.is_selected() || self.is_hovered()
    }

    pub fn select(&mut self) {
        if !self.selectable || self.selected {
            return;
        }
        self.selected = true;
        self.refresh_appearance();
    }

    /// Selected and hovered falls back to the hover look, selected only
    /// falls back to default.
    #[allow(dead_code)]
    pub fn unselect(&mut self) {
        if !self.selected {
            return;
        }
        self.selected = false;
        self.refresh_appearance();
    }

    /// Hover the cell. `accepted = false` shows the rejected variant.
    pub fn hover(&mut self, accepted: bool) {
        if !self.hoverable {
            return;
        }
        self.hovered = true;
        self.rejected = !accepted;
        self.refresh_appearance();
    }

    /// A selected cell keeps its selected look when unhovered
    pub fn unhover(&mut self) {
        if !self.hovered {
            return;
        }
        self.hovered = false;
        self.rejected = false;
        self.refresh_appearance();
    }

    /// Full reset back to the default state. Always reports the default
    /// appearance, even when nothing was active.
    pub fn unselect_and_unhover(&mut self) {
        self.selected = false;
        self.hovered = false;
        self.rejected = false;
        self.appearance = Appearance::Default;
        self.notify();
    }

    fn refresh_appearance(&mut self) {
        let next = if self.selected {
            Appearance::Selected
        } else if self.hovered && self.rejected {
            Appearance::Rejected
        } else if self.hovered {
            Appearance::Hovered
        } else {
            Appearance::Default
        };

        if next != self.appearance {
            self.appearance = next;
            self.notify();
        }
    }

    fn notify(&self) {
        if let Some(hook) = &self.hook {
            hook.appearance_changed(self.batch, self.coord, self.appearance);
        }
    }

    // ------------------------------------------------------------------
    // Occupants
    // ------------------------------------------------------------------

    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    pub fn is_occupied(&self) -> bool {
        !self.occupants.is_empty()
    }

    pub fn stack_height(&self) -> usize {
        self.occupants.len()
    }

    /// The building at ground level, which decides what the cell "is"
    pub fn base_occupant(&self) -> Option<&Occupant> {
        self.occupants.first()
    }

    pub fn base_kind(&self) -> Option<BuildingKind> {
        self.base_occupant().map(|o| o.kind)
    }

    pub fn base_id(&self) -> Option<OccupantId> {
        self.base_occupant().map(|o| o.id)
    }

    pub fn place_occupant(&mut self, id: OccupantId, kind: BuildingKind) {
        let level = self.occupants.len();
        self.occupants.push(Occupant { id, kind, level });
    }

    pub fn remove_top_occupant(&mut self) -> Option<Occupant> {
        self.occupants.pop()
    }

    /// Flatten the terrain into buildable grass
    pub fn flatten(&mut self) {
        self.terrain = TerrainKind::Grass;
        self.set_can_place(true);
    }
}
