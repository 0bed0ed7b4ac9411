//! Applying committed selections to the board.
//!
//! Each [`SelectionFinished`] message is turned into board edits according to
//! the current build action. Edited cells are handed back to the dispatcher
//! so the active selector can refresh their capabilities, and their sprites
//! are marked for repainting.

use bevy::prelude::*;

use crate::board::{
    BoardLayout, BuildingKind, CellCollection, CellId, DirtyCells, OccupantIds,
    RebuildBoardRequest,
};
use crate::buildables::{BuildMode, Buildable};
use crate::selection::{
    FinishedSelection, SelectionFinished, SelectionSet, SelectionState, connecting_neighbors,
};
use crate::theme;

/// Lines drawn between connected hotel cells, as cell coordinates
#[derive(Resource, Default)]
pub struct Connectors {
    pub links: Vec<(IVec2, IVec2)>,
}

#[derive(Resource, Default)]
struct PlacementIds(OccupantIds);

/// What one placement changed
#[derive(Debug, Default, PartialEq)]
pub struct PlacementOutcome {
    pub changed: Vec<CellId>,
    pub links: Vec<(IVec2, IVec2)>,
}

/// Apply `buildable` to the cells of a committed selection
pub fn apply_placement(
    cells: &mut CellCollection,
    buildable: Buildable,
    selection: &FinishedSelection,
    ids: &mut OccupantIds,
) -> PlacementOutcome {
    let mut outcome = PlacementOutcome::default();

    match buildable {
        Buildable::House => {
            for &id in &selection.members {
                let occupant = ids.next_id();
                cells.with_mut(id, |cell| cell.place_occupant(occupant, BuildingKind::House));
                outcome.changed.push(id);
            }
        }
        Buildable::Tent => {
            outcome.changed = place_shared(cells, selection, ids, BuildingKind::Tent);
        }
        Buildable::Skyscraper => {
            outcome.changed = place_shared(cells, selection, ids, BuildingKind::Skyscraper);
        }
        Buildable::Hotel => {
            let occupant = ids.next_id();
            cells.with_mut(selection.target, |cell| {
                cell.place_occupant(occupant, BuildingKind::Hotel)
            });
            outcome.changed.push(selection.target);

            if let Some(origin) = cells.coord(selection.target) {
                outcome.links = connecting_neighbors(cells, selection.target, &selection.members)
                    .into_iter()
                    .map(|link| (origin, origin + link.offset))
                    .collect();
            }
        }
        Buildable::Demolish => {
            let Some(building) = cells.get(selection.target).and_then(|c| c.base_id()) else {
                return outcome;
            };
            outcome.changed = cells.ids_where(|cell| cell.base_id() == Some(building));
            for &id in &outcome.changed {
                cells.with_mut(id, |cell| {
                    cell.remove_top_occupant();
                });
            }
        }
        Buildable::Bulldoze => {
            for &id in &selection.members {
                cells.with_mut(id, |cell| cell.flatten());
                outcome.changed.push(id);
            }
        }
    }

    outcome
}

/// One building covering every member cell
fn place_shared(
    cells: &mut CellCollection,
    selection: &FinishedSelection,
    ids: &mut OccupantIds,
    kind: BuildingKind,
) -> Vec<CellId> {
    let occupant = ids.next_id();
    for &id in &selection.members {
        cells.with_mut(id, |cell| cell.place_occupant(occupant, kind));
    }
    selection.members.clone()
}

/// Drop links whose ends are no longer both hotels
fn prune_links(cells: &CellCollection, links: &mut Vec<(IVec2, IVec2)>) {
    let is_hotel = |coord: IVec2| {
        cells
            .at(coord)
            .and_then(|id| cells.get(id))
            .and_then(|cell| cell.base_kind())
            == Some(BuildingKind::Hotel)
    };
    links.retain(|&(a, b)| is_hotel(a) && is_hotel(b));
}

fn handle_selection_finished(
    mut events: MessageReader<SelectionFinished>,
    mode: Res<BuildMode>,
    mut state: ResMut<SelectionState>,
    mut ids: ResMut<PlacementIds>,
    mut connectors: ResMut<Connectors>,
    dirty: Res<DirtyCells>,
) {
    for SelectionFinished(selection) in events.read() {
        let Some(buildable) = mode.current else {
            continue;
        };

        let mut outcome = PlacementOutcome::default();
        state.dispatcher.edit_cells(|cells| {
            outcome = apply_placement(cells, buildable, selection, &mut ids.0);
            outcome.changed.clone()
        });

        let cells = state.dispatcher.cells();
        dirty.mark_all(outcome.changed.iter().filter_map(|&id| cells.coord(id)));
        connectors.links.extend(outcome.links);
        prune_links(cells, &mut connectors.links);

        info!(
            "{:?} applied to {} cells",
            buildable,
            outcome.changed.len()
        );
    }
}

fn clear_connectors(mut connectors: ResMut<Connectors>) {
    connectors.links.clear();
}

fn draw_connectors(mut gizmos: Gizmos, connectors: Res<Connectors>, layout: Res<BoardLayout>) {
    for &(a, b) in &connectors.links {
        gizmos.line_2d(
            layout.cell_center(a),
            layout.cell_center(b),
            theme::CONNECTOR_COLOR,
        );
    }
}

pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Connectors>()
            .init_resource::<PlacementIds>()
            .add_systems(
                Update,
                (
                    handle_selection_finished
                        .run_if(on_message::<SelectionFinished>)
                        .after(SelectionSet::Relay),
                    clear_connectors.run_if(on_message::<RebuildBoardRequest>),
                    draw_connectors,
                ),
            );
    }
}
