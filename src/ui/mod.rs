mod board_panel;
mod build_menu;
mod dialogs;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::selection::{CellHovered, HoveredCell, SelectionSet};

/// Latest hovered cell, for the status read-out
#[derive(Resource, Default)]
pub struct HoverReadout {
    pub cell: Option<HoveredCell>,
}

/// One-line description of a hovered cell
pub fn describe_hover(cell: &HoveredCell) -> String {
    let mut text = format!(
        "({}, {}) {}",
        cell.coord.x,
        cell.coord.y,
        cell.terrain.display_name()
    );
    if let Some(building) = cell.building {
        text.push_str(&format!(" - {}", building.display_name()));
        if cell.stack_height > 1 {
            text.push_str(&format!(" x{}", cell.stack_height));
        }
    }
    text
}

fn track_hover(mut events: MessageReader<CellHovered>, mut readout: ResMut<HoverReadout>) {
    for CellHovered(cell) in events.read() {
        readout.cell = *cell;
    }
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HoverReadout>()
            .init_resource::<board_panel::BoardPanelState>()
            .add_systems(Update, track_hover.after(SelectionSet::Relay))
            // Top panel first so windows stack above it
            .add_systems(
                EguiPrimaryContextPass,
                (
                    build_menu::build_menu_ui,
                    board_panel::board_panel_ui,
                    dialogs::config_reset_notification_ui,
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BuildingKind, CellId, TerrainKind};

    fn hovered(building: Option<BuildingKind>, stack_height: usize) -> HoveredCell {
        HoveredCell {
            id: CellId(0),
            coord: IVec2::new(3, 7),
            terrain: TerrainKind::Grass,
            stack_height,
            building,
        }
    }

    #[test]
    fn test_describe_empty_cell() {
        assert_eq!(describe_hover(&hovered(None, 0)), "(3, 7) Grass");
    }

    #[test]
    fn test_describe_stacked_building() {
        assert_eq!(
            describe_hover(&hovered(Some(BuildingKind::Skyscraper), 3)),
            "(3, 7) Grass - Skyscraper x3"
        );
        assert_eq!(
            describe_hover(&hovered(Some(BuildingKind::Tent), 1)),
            "(3, 7) Grass - Big Tent"
        );
    }
}
