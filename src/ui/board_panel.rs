use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::board::{BoardSettings, BuildingKind, RebuildBoardRequest, TerrainKind};
use crate::config::{AppConfig, SaveConfigRequest};
use crate::constants::MAX_BOARD_SIDE;
use crate::theme;

/// Edited copy of the board size while the panel is open
#[derive(Resource, Default)]
pub struct BoardPanelState {
    pub is_open: bool,
    pub width: i32,
    pub height: i32,
}

impl BoardPanelState {
    pub fn open(&mut self, settings: &BoardSettings) {
        self.is_open = true;
        self.width = settings.width;
        self.height = settings.height;
    }

    fn has_changes(&self, settings: &BoardSettings) -> bool {
        self.width != settings.width || self.height != settings.height
    }
}

fn color_swatch(ui: &mut egui::Ui, color: Color, label: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
        ui.painter()
            .rect_filled(rect, 2.0, theme::bevy_to_egui_opaque(color));
        ui.label(label);
    });
}

/// Board size window. Regenerating rebuilds every cell and drops all buildings.
pub fn board_panel_ui(
    mut contexts: EguiContexts,
    mut panel: ResMut<BoardPanelState>,
    mut config: ResMut<AppConfig>,
    mut rebuild_events: MessageWriter<RebuildBoardRequest>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    if !panel.is_open {
        return Ok(());
    }

    let mut should_close = false;
    let mut should_regenerate = false;

    egui::Window::new("Board")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.group(|ui| {
                ui.label(egui::RichText::new("Size").strong());
                ui.add_space(8.0);
                ui.add(egui::Slider::new(&mut panel.width, 1..=MAX_BOARD_SIDE).text("Width"));
                ui.add(egui::Slider::new(&mut panel.height, 1..=MAX_BOARD_SIDE).text("Height"));
            });

            ui.add_space(12.0);

            ui.group(|ui| {
                ui.label(egui::RichText::new("Legend").strong());
                ui.add_space(8.0);
                for terrain in TerrainKind::all() {
                    color_swatch(ui, theme::terrain_color(*terrain), terrain.display_name());
                }
                for kind in [
                    BuildingKind::House,
                    BuildingKind::Hotel,
                    BuildingKind::Tent,
                    BuildingKind::Skyscraper,
                ] {
                    color_swatch(ui, theme::building_color(kind), kind.display_name());
                }
            });

            ui.add_space(8.0);
            ui.label(
                egui::RichText::new("Regenerating removes every building.")
                    .color(theme::ui::HINT_TEXT)
                    .small(),
            );

            ui.add_space(12.0);

            ui.horizontal(|ui| {
                if ui.button("Regenerate").clicked() {
                    should_regenerate = true;
                }
                if ui.button("Close").clicked() {
                    should_close = true;
                }
            });
        });

    if should_regenerate {
        if panel.has_changes(&config.data.board) {
            config.data.board.width = panel.width;
            config.data.board.height = panel.height;
            config.dirty = true;
            save_events.write(SaveConfigRequest);
        }
        rebuild_events.write(RebuildBoardRequest);
        info!("Regenerating {}x{} board", panel.width, panel.height);
        should_close = true;
    }

    if should_close {
        panel.is_open = false;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_copies_current_size() {
        let settings = BoardSettings {
            width: 10,
            height: 7,
            ..Default::default()
        };
        let mut panel = BoardPanelState::default();
        panel.open(&settings);

        assert!(panel.is_open);
        assert!(!panel.has_changes(&settings));

        panel.width = 12;
        assert!(panel.has_changes(&settings));
    }
}
