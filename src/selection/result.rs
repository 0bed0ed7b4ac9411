use bevy::prelude::IVec2;

use crate::board::{CellCollection, CellId};

use super::bounds::GridRect;

/// Size information derived from a committed selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionMetrics {
    pub min: IVec2,
    pub max: IVec2,
    pub length_x: usize,
    pub length_y: usize,
    /// Area of the bounding rectangle, including holes
    pub total_area: usize,
    pub member_count: usize,
}

impl SelectionMetrics {
    pub fn from_rect(rect: GridRect, member_count: usize) -> Self {
        Self {
            min: rect.min,
            max: rect.max,
            length_x: rect.length_x(),
            length_y: rect.length_y(),
            total_area: rect.area(),
            member_count,
        }
    }
}

/// What a selector hands out when a selection commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedSelection {
    /// Cell the committing click landed on
    pub target: CellId,
    pub members: Vec<CellId>,
    pub metrics: SelectionMetrics,
}

impl FinishedSelection {
    /// Build a result whose metrics come from an explicit rectangle
    pub fn with_bounds(target: CellId, members: Vec<CellId>, bounds: Option<GridRect>) -> Self {
        let metrics = bounds
            .map(|rect| SelectionMetrics::from_rect(rect, members.len()))
            .unwrap_or_default();
        Self {
            target,
            members,
            metrics,
        }
    }

    /// Build a result whose metrics enclose the members themselves
    pub fn enclosing(cells: &CellCollection, target: CellId, members: Vec<CellId>) -> Self {
        let bounds = GridRect::enclosing(members.iter().filter_map(|&id| cells.coord(id)));
        Self::with_bounds(target, members, bounds)
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.members.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
