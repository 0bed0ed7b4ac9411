//! Candidate region and validity rules shared by the selector strategies.
//!
//! Each strategy owns a [`Region`] (current bounds plus the cells inside
//! it) and a [`RuleSet`] registered at construction. A selection is valid
//! only when every rule holds for the current region.

use std::collections::HashSet;

use crate::board::{CellCollection, CellId};

use super::bounds::GridRect;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    bounds: Option<GridRect>,
    members: Vec<CellId>,
    /// Number of cells a complete region must contain
    required: usize,
}

impl Region {
    pub fn bounds(&self) -> Option<GridRect> {
        self.bounds
    }

    pub fn members(&self) -> &[CellId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn required(&self) -> usize {
        self.required
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.members.contains(&id)
    }

    /// Replace the region, unhovering cells that dropped out of it
    pub fn replace(
        &mut self,
        cells: &mut CellCollection,
        bounds: GridRect,
        members: Vec<CellId>,
        required: usize,
    ) {
        let keep: HashSet<CellId> = members.iter().copied().collect();
        let stale: Vec<CellId> = self
            .members
            .iter()
            .copied()
            .filter(|id| !keep.contains(id))
            .collect();
        cells.unhover(&stale);

        self.bounds = Some(bounds);
        self.members = members;
        self.required = required;
    }

    /// Drop the region and the hover feedback it placed
    pub fn clear(&mut self, cells: &mut CellCollection) {
        cells.unhover(&self.members);
        self.forget();
    }

    /// Drop the region without touching the cells
    pub fn forget(&mut self) {
        self.bounds = None;
        self.members.clear();
        self.required = 0;
    }

    /// Hover every member with the accepted or rejected look
    pub fn paint(&self, cells: &mut CellCollection, valid: bool) {
        cells.hover(&self.members, valid);
    }
}

/// One conjunctive validity check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityRule {
    /// The region holds at least `required` cells and all are selectable
    AllSelectable,
    /// Occupied members must all carry the same building, cover the whole
    /// region, and leave room for another level
    StackCompatible { max_height: usize },
    /// Bounding lengths stay within the limits (`None` = unbounded)
    MaxSize {
        length: Option<usize>,
        width: Option<usize>,
    },
    /// The region has no holes
    Complete,
    /// Total member count stays strictly below the cap
    MembersBelow(usize),
}

impl ValidityRule {
    pub fn holds(&self, region: &Region, cells: &CellCollection) -> bool {
        match *self {
            ValidityRule::AllSelectable => {
                region.len() >= region.required()
                    && region.members().iter().all(|&id| cells.is_selectable(id))
            }
            ValidityRule::StackCompatible { max_height } => {
                stack_compatible(region, cells, max_height)
            }
            ValidityRule::MaxSize { length, width } => {
                let Some(bounds) = region.bounds() else {
                    return true;
                };
                length.is_none_or(|max| bounds.length_x() <= max)
                    && width.is_none_or(|max| bounds.length_y() <= max)
            }
            ValidityRule::Complete => region
                .bounds()
                .is_none_or(|bounds| region.len() == bounds.area()),
            ValidityRule::MembersBelow(cap) => region.len() < cap,
        }
    }
}

fn stack_compatible(region: &Region, cells: &CellCollection, max_height: usize) -> bool {
    let occupied: Vec<_> = region
        .members()
        .iter()
        .filter_map(|&id| cells.get(id))
        .filter(|cell| cell.is_occupied())
        .collect();

    let Some(first) = occupied.first() else {
        return true;
    };

    let base = first.base_id();
    occupied.len() >= region.required()
        && first.stack_height() < max_height
        && occupied.iter().all(|cell| cell.base_id() == base)
}

/// Ordered list of rules, all of which must hold
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet(Vec<ValidityRule>);

impl RuleSet {
    pub fn push(&mut self, rule: ValidityRule) {
        self.0.push(rule);
    }

    pub fn with(mut self, rule: ValidityRule) -> Self {
        self.push(rule);
        self
    }

    /// Replace a rule of the same variant, or append it
    pub fn set(&mut self, rule: ValidityRule) {
        let variant = std::mem::discriminant(&rule);
        match self.0.iter_mut().find(|r| std::mem::discriminant(*r) == variant) {
            Some(existing) => *existing = rule,
            None => self.0.push(rule),
        }
    }

    pub fn remove(&mut self, matches: impl Fn(&ValidityRule) -> bool) {
        self.0.retain(|r| !matches(r));
    }

    pub fn rules(&self) -> &[ValidityRule] {
        &self.0
    }

    /// First rule that fails, if any
    pub fn first_failure(&self, region: &Region, cells: &CellCollection) -> Option<ValidityRule> {
        self.0.iter().copied().find(|r| !r.holds(region, cells))
    }

    pub fn evaluate(&self, region: &Region, cells: &CellCollection) -> bool {
        self.first_failure(region, cells).is_none()
    }
}
