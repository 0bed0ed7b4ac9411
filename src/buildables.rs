//! The build menu catalog and the selector each entry uses.

use bevy::prelude::*;
use bevy_egui::EguiContexts;
use serde::{Deserialize, Serialize};

use crate::board::{BuildingKind, TerrainKind};
use crate::config::{AppConfig, ConfigLoaded};
use crate::selection::{
    ActiveSelector, Capabilities, CellFilter, ConnectingSelector, FixedFootprintSelector,
    FlexibleRectangleSelector, SelectionSet, SelectionState,
};

/// Tallest skyscraper stack
const SKYSCRAPER_MAX_HEIGHT: usize = 8;

const HOTEL_CHAIN_DEPTH: usize = 2;
const HOTEL_CHAIN_CAP: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Buildable {
    House,
    Hotel,
    Tent,
    Skyscraper,
    Demolish,
    Bulldoze,
}

impl Buildable {
    pub fn all() -> &'static [Buildable] {
        &[
            Buildable::House,
            Buildable::Hotel,
            Buildable::Tent,
            Buildable::Skyscraper,
            Buildable::Demolish,
            Buildable::Bulldoze,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Buildable::House => "House (1)",
            Buildable::Hotel => "Hotel (2)",
            Buildable::Tent => "Big Tent (3)",
            Buildable::Skyscraper => "Skyscraper (4)",
            Buildable::Demolish => "Demolish (5)",
            Buildable::Bulldoze => "Bulldoze (6)",
        }
    }

    pub fn shortcut(&self) -> KeyCode {
        match self {
            Buildable::House => KeyCode::Digit1,
            Buildable::Hotel => KeyCode::Digit2,
            Buildable::Tent => KeyCode::Digit3,
            Buildable::Skyscraper => KeyCode::Digit4,
            Buildable::Demolish => KeyCode::Digit5,
            Buildable::Bulldoze => KeyCode::Digit6,
        }
    }

    pub fn selector(&self) -> ActiveSelector {
        let empty_lot = CellFilter::buildable().occupied(false);

        match self {
            Buildable::House => FlexibleRectangleSelector::new()
                .with_capabilities(Capabilities::new(empty_lot))
                .into(),
            Buildable::Hotel => ConnectingSelector::new(HOTEL_CHAIN_DEPTH, HOTEL_CHAIN_CAP)
                .with_building(BuildingKind::Hotel)
                .with_capabilities(
                    Capabilities::new(empty_lot).with_hover(CellFilter::buildable()),
                )
                .into(),
            Buildable::Tent => FlexibleRectangleSelector::new()
                .with_capabilities(Capabilities::new(empty_lot))
                .with_max_size(Some(4), Some(4))
                .with_allow_incomplete(false)
                .into(),
            Buildable::Skyscraper => FixedFootprintSelector::new(2, 2)
                .with_capabilities(
                    Capabilities::new(CellFilter::buildable()).with_hover(CellFilter::any()),
                )
                .with_max_height(SKYSCRAPER_MAX_HEIGHT)
                .into(),
            Buildable::Demolish => FixedFootprintSelector::new(1, 1)
                .with_capabilities(Capabilities::new(CellFilter::any().occupied(true)))
                .into(),
            Buildable::Bulldoze => FlexibleRectangleSelector::new()
                .with_capabilities(Capabilities::new(
                    CellFilter::any().terrain(&[TerrainKind::Mountain]),
                ))
                .with_max_size(Some(6), Some(6))
                .into(),
        }
    }
}

/// The current build action (`None` = nothing to build, selection disabled)
#[derive(Resource, Default)]
pub struct BuildMode {
    pub current: Option<Buildable>,
}

impl BuildMode {
    pub fn selector(&self) -> ActiveSelector {
        self.current.map(|b| b.selector()).unwrap_or_default()
    }
}

fn apply_starting_buildable(config: Res<AppConfig>, mut mode: ResMut<BuildMode>) {
    mode.current = config.data.starting_buildable;
}

/// Install the selector of the current build action
fn sync_selector(mode: Res<BuildMode>, mut state: ResMut<SelectionState>) {
    state.dispatcher.set_selector(mode.selector());
}

/// Number keys pick a build action, Escape drops it
fn handle_build_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mode: ResMut<BuildMode>,
    mut contexts: EguiContexts,
) {
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        if mode.current.is_some() {
            mode.current = None;
        }
        return;
    }

    let picked = Buildable::all()
        .iter()
        .copied()
        .find(|b| keyboard.just_pressed(b.shortcut()));

    if let Some(buildable) = picked
        && mode.current != Some(buildable)
    {
        mode.current = Some(buildable);
    }
}

pub struct BuildablesPlugin;

impl Plugin for BuildablesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BuildMode>()
            .add_systems(Startup, apply_starting_buildable.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    handle_build_shortcuts,
                    sync_selector.run_if(resource_changed::<BuildMode>),
                )
                    .chain()
                    .before(SelectionSet::Input),
            );
    }
}
