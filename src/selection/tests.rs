//! End-to-end scenarios driving the dispatcher with every selector.

use std::sync::{Arc, Mutex};

use bevy::prelude::IVec2;

use super::selector::DisabledSelector;
use super::*;
use crate::board::{
    Appearance, AppearanceHook, BatchId, BuildingKind, CellBatch, CellCollection, CellId,
    OccupantId, SelectableCell, TerrainKind,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn grid(size: i32) -> Vec<CellBatch> {
    let mut cells = Vec::new();
    for y in 0..size {
        for x in 0..size {
            cells.push(SelectableCell::new(IVec2::new(x, y), TerrainKind::Grass));
        }
    }
    vec![CellBatch::new(BatchId(0), cells)]
}

fn at(dispatcher: &Dispatcher, x: i32, y: i32) -> CellId {
    dispatcher.cells().at(IVec2::new(x, y)).unwrap()
}

fn hover(dispatcher: &mut Dispatcher, x: i32, y: i32) {
    let id = at(dispatcher, x, y);
    dispatcher.handle_pointer_move(Some(id));
}

/// Put one occupant per coordinate
fn build(dispatcher: &mut Dispatcher, coords: &[(i32, i32)], occupant: u64, kind: BuildingKind) {
    dispatcher.edit_cells(|cells| {
        let mut changed = Vec::new();
        for &(x, y) in coords {
            if let Some(id) = cells.at(IVec2::new(x, y)) {
                cells.with_mut(id, |c| c.place_occupant(OccupantId(occupant), kind));
                changed.push(id);
            }
        }
        changed
    });
}

/// Make one cell refuse placements
fn block_placement(dispatcher: &mut Dispatcher, x: i32, y: i32) {
    dispatcher.edit_cells(|cells| {
        let Some(id) = cells.at(IVec2::new(x, y)) else {
            return Vec::new();
        };
        cells.with_mut(id, |c| c.set_can_place(false));
        vec![id]
    });
}

#[derive(Default, Clone)]
struct Recorder {
    hovered: Arc<Mutex<Vec<Option<HoveredCell>>>>,
    finished: Arc<Mutex<Vec<FinishedSelection>>>,
}

impl Recorder {
    fn attach(dispatcher: &Dispatcher) -> Self {
        let recorder = Self::default();
        let hovered = recorder.hovered.clone();
        dispatcher
            .signals()
            .hover
            .subscribe(move |cell| hovered.lock().unwrap().push(*cell));
        let finished = recorder.finished.clone();
        dispatcher
            .signals()
            .finished
            .subscribe(move |result| finished.lock().unwrap().push(result.clone()));
        recorder
    }

    fn finished(&self) -> Vec<FinishedSelection> {
        self.finished.lock().unwrap().clone()
    }

    fn hovered(&self) -> Vec<Option<HoveredCell>> {
        self.hovered.lock().unwrap().clone()
    }
}

fn assert_invariants(cells: &CellCollection) {
    for (id, cell) in cells.iter() {
        assert!(
            !cell.is_selected() || cell.is_selectable(),
            "{:?} selected but not selectable",
            id
        );
        assert!(
            !cell.is_selected_or_hovered() || cell.is_hoverable(),
            "{:?} active but not hoverable",
            id
        );
    }
}

fn flags(cells: &CellCollection) -> Vec<(bool, bool, Appearance)> {
    cells
        .iter()
        .map(|(_, c)| (c.is_selectable(), c.is_hoverable(), c.appearance()))
        .collect()
}

fn hotel_chain(depth: usize, cap: usize) -> ConnectingSelector {
    ConnectingSelector::new(depth, cap)
        .with_building(BuildingKind::Hotel)
        .with_capabilities(
            Capabilities::new(CellFilter::buildable().occupied(false))
                .with_hover(CellFilter::buildable()),
        )
}

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

#[test]
fn test_flag_invariants_hold_across_a_session() {
    let mut d = Dispatcher::new(grid(6));
    build(&mut d, &[(2, 2)], 1, BuildingKind::Hotel);
    block_placement(&mut d, 4, 4);

    let selectors: Vec<ActiveSelector> = vec![
        FlexibleRectangleSelector::new().into(),
        FixedFootprintSelector::new(2, 2).with_max_height(3).into(),
        hotel_chain(2, 6).into(),
        DisabledSelector.into(),
    ];

    for selector in selectors {
        d.set_selector(selector);
        assert_invariants(d.cells());
        for (x, y) in [(0, 0), (2, 2), (1, 2), (4, 4), (5, 5), (3, 1)] {
            hover(&mut d, x, y);
            assert_invariants(d.cells());
            d.handle_click();
            assert_invariants(d.cells());
        }
        d.handle_pointer_move(None);
        assert_invariants(d.cells());
        d.handle_click();
        assert_invariants(d.cells());
    }
}

// ---------------------------------------------------------------------------
// Fixed footprint
// ---------------------------------------------------------------------------

#[test]
fn test_fixed_two_by_two_commits_offset_bounds() {
    let mut d = Dispatcher::new(grid(8));
    d.set_selector(FixedFootprintSelector::new(2, 2));
    let recorder = Recorder::attach(&d);

    hover(&mut d, 5, 5);
    d.handle_click();

    let finished = recorder.finished();
    assert_eq!(finished.len(), 1);
    let metrics = finished[0].metrics;
    assert_eq!(metrics.min, IVec2::new(4, 5));
    assert_eq!(metrics.max, IVec2::new(5, 6));
    assert_eq!(finished[0].members.len(), 4);
    assert_eq!(finished[0].target, at(&d, 5, 5));
}

#[test]
fn test_single_phase_commit_resets_the_board() {
    let mut d = Dispatcher::new(grid(4));
    d.set_selector(FixedFootprintSelector::new(3, 1));
    let recorder = Recorder::attach(&d);

    hover(&mut d, 1, 1);
    assert_eq!(d.cells().active_ids().len(), 3);
    d.handle_click();

    assert_eq!(recorder.finished().len(), 1);
    assert!(d.cells().active_ids().is_empty());
    assert_eq!(d.current_target(), None);
    assert!(!d.is_in_selection_mode());
}

#[test]
fn test_stack_until_max_height() {
    let mut d = Dispatcher::new(grid(3));
    build(&mut d, &[(1, 1)], 4, BuildingKind::Skyscraper);
    d.set_selector(FixedFootprintSelector::new(1, 1).with_max_height(3));
    let recorder = Recorder::attach(&d);

    hover(&mut d, 1, 1);
    assert!(d.is_selection_valid(), "height 1 of 3 accepts another level");
    d.handle_click();
    assert_eq!(recorder.finished().len(), 1);

    build(&mut d, &[(1, 1)], 4, BuildingKind::Skyscraper);
    build(&mut d, &[(1, 1)], 4, BuildingKind::Skyscraper);

    hover(&mut d, 1, 1);
    assert!(!d.is_selection_valid(), "height 3 of 3 is full");
    d.handle_click();
    assert_eq!(recorder.finished().len(), 1);
}

#[test]
fn test_click_on_unhoverable_cell_does_nothing() {
    let mut d = Dispatcher::new(grid(3));
    block_placement(&mut d, 1, 1);
    d.set_selector(FixedFootprintSelector::new(1, 1));
    let recorder = Recorder::attach(&d);

    hover(&mut d, 0, 0);
    hover(&mut d, 1, 1);
    assert_eq!(d.current_target(), None);
    d.handle_click();
    assert!(recorder.finished().is_empty());
}

// ---------------------------------------------------------------------------
// Flexible rectangle
// ---------------------------------------------------------------------------

#[test]
fn test_flexible_hole_blocks_commit() {
    let mut d = Dispatcher::new(grid(3));
    block_placement(&mut d, 1, 1);
    d.set_selector(FlexibleRectangleSelector::new().with_allow_incomplete(false));
    let recorder = Recorder::attach(&d);

    hover(&mut d, 0, 0);
    d.handle_click();
    assert!(d.is_in_selection_mode());

    hover(&mut d, 2, 2);
    assert!(!d.is_selection_valid());
    d.handle_click();

    assert!(recorder.finished().is_empty());
    assert!(d.is_in_selection_mode(), "invalid click keeps the gesture alive");
}

#[test]
fn test_flexible_two_click_commit() {
    let mut d = Dispatcher::new(grid(5));
    d.set_selector(FlexibleRectangleSelector::new());
    let recorder = Recorder::attach(&d);

    hover(&mut d, 3, 1);
    d.handle_click();
    assert_eq!(d.origin(), Some(at(&d, 3, 1)));
    assert_eq!(
        d.cells().get(at(&d, 3, 1)).unwrap().appearance(),
        Appearance::Selected
    );

    hover(&mut d, 2, 2);
    hover(&mut d, 1, 3);
    d.handle_click();

    let finished = recorder.finished();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].members.len(), 9);
    assert_eq!(finished[0].metrics.min, IVec2::new(1, 1));
    assert_eq!(finished[0].metrics.max, IVec2::new(3, 3));
    assert!(!d.is_in_selection_mode());
    assert!(d.cells().active_ids().is_empty());
}

#[test]
fn test_second_click_in_place_commits_one_cell() {
    let mut d = Dispatcher::new(grid(3));
    d.set_selector(FlexibleRectangleSelector::new());
    let recorder = Recorder::attach(&d);

    hover(&mut d, 1, 1);
    d.handle_click();
    d.handle_click();

    let finished = recorder.finished();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].members, vec![at(&d, 1, 1)]);
}

#[test]
fn test_abort_by_clicking_off_the_board() {
    let mut d = Dispatcher::new(grid(3));
    d.set_selector(FlexibleRectangleSelector::new());
    let recorder = Recorder::attach(&d);

    hover(&mut d, 0, 0);
    d.handle_click();
    hover(&mut d, 1, 1);
    assert_eq!(d.cells().active_ids().len(), 4);

    d.handle_pointer_move(None);
    d.handle_click();

    assert!(recorder.finished().is_empty());
    assert!(!d.is_in_selection_mode());
    assert!(
        d.cells()
            .iter()
            .all(|(_, c)| c.appearance() == Appearance::Default)
    );
}

#[test]
fn test_leaving_the_surface_aborts_and_reports_no_hover() {
    let mut d = Dispatcher::new(grid(3));
    d.set_selector(FlexibleRectangleSelector::new());
    let recorder = Recorder::attach(&d);

    hover(&mut d, 0, 0);
    d.handle_click();
    hover(&mut d, 2, 0);
    d.handle_pointer_left();

    assert!(!d.is_in_selection_mode());
    assert!(d.cells().active_ids().is_empty());
    assert_eq!(recorder.hovered().last(), Some(&None));
    assert!(recorder.finished().is_empty());
}

#[test]
fn test_swapping_selector_mid_gesture_aborts() {
    let mut d = Dispatcher::new(grid(3));
    d.set_selector(FlexibleRectangleSelector::new());
    let recorder = Recorder::attach(&d);

    hover(&mut d, 0, 0);
    d.handle_click();
    hover(&mut d, 2, 2);

    d.set_selector(FixedFootprintSelector::new(1, 1));
    assert!(!d.is_in_selection_mode());
    assert_eq!(d.origin(), None);
    assert!(d.cells().active_ids().is_empty());

    d.handle_click();
    assert!(recorder.finished().is_empty());
}

// ---------------------------------------------------------------------------
// Connecting chain
// ---------------------------------------------------------------------------

#[test]
fn test_connecting_depth_one_stops_at_direct_neighbors() {
    let mut d = Dispatcher::new(grid(7));
    build(&mut d, &[(2, 3)], 1, BuildingKind::Hotel);
    build(&mut d, &[(1, 3)], 2, BuildingKind::Hotel);
    build(&mut d, &[(4, 3)], 3, BuildingKind::Hotel);
    build(&mut d, &[(5, 3)], 4, BuildingKind::Hotel);
    d.set_selector(hotel_chain(1, 10));
    let recorder = Recorder::attach(&d);

    hover(&mut d, 3, 3);
    d.handle_click();

    let finished = recorder.finished();
    assert_eq!(finished.len(), 1);
    let members = &finished[0].members;
    assert_eq!(members.len(), 3);
    assert!(members.contains(&at(&d, 3, 3)));
    assert!(members.contains(&at(&d, 2, 3)));
    assert!(members.contains(&at(&d, 4, 3)));
    assert!(!members.contains(&at(&d, 1, 3)));
    assert!(!members.contains(&at(&d, 5, 3)));

    let neighbors = connecting_neighbors(d.cells(), finished[0].target, members);
    assert_eq!(neighbors.len(), 2);
}

#[test]
fn test_connecting_chain_over_cap_cannot_commit() {
    let mut d = Dispatcher::new(grid(5));
    build(&mut d, &[(1, 2)], 1, BuildingKind::Hotel);
    build(&mut d, &[(3, 2)], 2, BuildingKind::Hotel);
    build(&mut d, &[(2, 3)], 3, BuildingKind::Hotel);
    d.set_selector(hotel_chain(2, 3));
    let recorder = Recorder::attach(&d);

    hover(&mut d, 2, 2);
    assert!(!d.is_selection_valid());
    d.handle_click();
    d.handle_click();

    assert!(recorder.finished().is_empty());
}

#[test]
fn test_connecting_chain_equal_to_cap_cannot_commit() {
    let mut d = Dispatcher::new(grid(5));
    build(&mut d, &[(1, 2)], 1, BuildingKind::Hotel);
    build(&mut d, &[(3, 2)], 2, BuildingKind::Hotel);
    d.set_selector(hotel_chain(1, 3));
    let recorder = Recorder::attach(&d);

    // Target plus two neighbors is three cells
    hover(&mut d, 2, 2);
    assert!(!d.is_selection_valid());
    d.handle_click();
    assert!(recorder.finished().is_empty());

    d.set_selector(hotel_chain(1, 4));
    hover(&mut d, 0, 0);
    hover(&mut d, 2, 2);
    assert!(d.is_selection_valid());
    d.handle_click();
    assert_eq!(recorder.finished()[0].members.len(), 3);
}

#[test]
fn test_connecting_selector_sees_new_buildings_after_update() {
    let mut d = Dispatcher::new(grid(4));
    d.set_selector(hotel_chain(1, 6));
    let recorder = Recorder::attach(&d);

    hover(&mut d, 1, 1);
    d.handle_click();
    assert_eq!(recorder.finished()[0].members.len(), 1);

    build(&mut d, &[(1, 1)], 1, BuildingKind::Hotel);
    assert!(!d.cells().is_selectable(at(&d, 1, 1)));

    hover(&mut d, 2, 1);
    d.handle_click();
    let finished = recorder.finished();
    assert_eq!(finished.len(), 2);
    assert!(finished[1].contains(at(&d, 1, 1)));
}

// ---------------------------------------------------------------------------
// Selector lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_set_selector_twice_matches_once() {
    let selector = hotel_chain(2, 6);

    let mut once = Dispatcher::new(grid(4));
    build(&mut once, &[(1, 1)], 1, BuildingKind::Hotel);
    once.set_selector(selector.clone());

    let mut twice = Dispatcher::new(grid(4));
    build(&mut twice, &[(1, 1)], 1, BuildingKind::Hotel);
    twice.set_selector(selector.clone());
    twice.set_selector(selector);

    assert_eq!(flags(once.cells()), flags(twice.cells()));
}

#[test]
fn test_disabled_selector_still_reports_hover() {
    let mut d = Dispatcher::new(grid(2));
    let recorder = Recorder::attach(&d);

    hover(&mut d, 1, 0);
    d.handle_click();

    let hovered = recorder.hovered();
    assert_eq!(hovered.len(), 1);
    let cell = hovered[0].unwrap();
    assert_eq!(cell.coord, IVec2::new(1, 0));
    assert_eq!(cell.terrain, TerrainKind::Grass);
    assert!(recorder.finished().is_empty());
}

#[test]
fn test_hover_is_deduplicated() {
    let mut d = Dispatcher::new(grid(2));
    d.set_selector(FixedFootprintSelector::new(1, 1));
    let recorder = Recorder::attach(&d);

    hover(&mut d, 0, 0);
    hover(&mut d, 0, 0);
    d.handle_pointer_move(None);
    d.handle_pointer_move(None);
    hover(&mut d, 1, 1);

    let coords: Vec<Option<IVec2>> = recorder
        .hovered()
        .iter()
        .map(|c| c.map(|c| c.coord))
        .collect();
    assert_eq!(
        coords,
        vec![Some(IVec2::new(0, 0)), None, Some(IVec2::new(1, 1))]
    );
}

#[test]
fn test_moving_off_board_clears_single_phase_feedback() {
    let mut d = Dispatcher::new(grid(4));
    d.set_selector(FixedFootprintSelector::new(2, 2));

    hover(&mut d, 1, 1);
    assert_eq!(d.cells().active_ids().len(), 4);
    d.handle_pointer_move(None);
    assert!(d.cells().active_ids().is_empty());
}

#[test]
fn test_unsubscribed_listener_misses_later_commits() {
    let mut d = Dispatcher::new(grid(2));
    d.set_selector(FixedFootprintSelector::new(1, 1));

    let count = Arc::new(Mutex::new(0));
    let counter = count.clone();
    let subscription = d.signals().finished.subscribe(move |_| {
        *counter.lock().unwrap() += 1;
    });

    hover(&mut d, 0, 0);
    d.handle_click();
    d.signals().finished.unsubscribe(&subscription);
    hover(&mut d, 1, 1);
    d.handle_click();

    assert_eq!(*count.lock().unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Appearance hooks
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingHook {
    calls: Mutex<Vec<(IVec2, Appearance)>>,
}

impl AppearanceHook for RecordingHook {
    fn appearance_changed(&self, _batch: BatchId, coord: IVec2, appearance: Appearance) {
        self.calls.lock().unwrap().push((coord, appearance));
    }
}

#[test]
fn test_appearance_hook_follows_the_gesture() {
    let hook = Arc::new(RecordingHook::default());
    let cells = (0..3)
        .map(|x| SelectableCell::new(IVec2::new(x, 0), TerrainKind::Grass).with_hook(hook.clone()))
        .collect();
    let mut d = Dispatcher::new(vec![CellBatch::new(BatchId(0), cells)]);
    d.set_selector(FlexibleRectangleSelector::new());
    hook.calls.lock().unwrap().clear();

    hover(&mut d, 0, 0);
    d.handle_click();
    hover(&mut d, 2, 0);
    d.handle_click();

    let calls = hook.calls.lock().unwrap();
    assert_eq!(calls[0], (IVec2::new(0, 0), Appearance::Hovered));
    assert_eq!(calls[1], (IVec2::new(0, 0), Appearance::Selected));
    assert!(calls.contains(&(IVec2::new(2, 0), Appearance::Hovered)));

    // The commit resets every cell
    let tail = &calls[calls.len() - 3..];
    assert!(tail.iter().all(|(_, a)| *a == Appearance::Default));
}
