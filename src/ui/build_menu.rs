use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::buildables::{BuildMode, Buildable};
use crate::config::{AppConfig, SaveConfigRequest};
use crate::selection::SelectionState;
use crate::theme;

use super::board_panel::BoardPanelState;
use super::{HoverReadout, describe_hover};

/// Top bar with the build actions and the hovered cell read-out
pub fn build_menu_ui(
    mut contexts: EguiContexts,
    mut mode: ResMut<BuildMode>,
    mut config: ResMut<AppConfig>,
    mut board_panel: ResMut<BoardPanelState>,
    readout: Res<HoverReadout>,
    selection: Res<SelectionState>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    egui::TopBottomPanel::top("build_menu")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8))
                .fill(theme::ui::PANEL_BACKGROUND),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                for buildable in Buildable::all() {
                    let selected = mode.current == Some(*buildable);
                    let border = if selected {
                        theme::ui::SELECTED_BORDER
                    } else {
                        theme::ui::UNSELECTED_BORDER
                    };

                    let button = egui::Button::new(
                        egui::RichText::new(buildable.display_name()).size(14.0).strong(),
                    )
                    .min_size(egui::vec2(0.0, 28.0))
                    .stroke(egui::Stroke::new(1.0, border))
                    .selected(selected);

                    if ui.add(button).clicked() {
                        // Clicking the active entry drops it
                        mode.current = if selected { None } else { Some(*buildable) };
                    }
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                if ui.button("Board...").clicked() {
                    board_panel.open(&config.data.board);
                }

                if ui
                    .checkbox(&mut config.data.show_coordinates, "Coordinates")
                    .changed()
                {
                    config.dirty = true;
                    save_events.write(SaveConfigRequest);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if config.data.show_coordinates
                        && let Some(cell) = &readout.cell
                    {
                        ui.label(
                            egui::RichText::new(describe_hover(cell)).color(theme::ui::LABEL_TEXT),
                        );
                        ui.add_space(12.0);
                    }

                    let hint = if selection.dispatcher.is_in_selection_mode() {
                        "Click again to build, click off the board to cancel"
                    } else {
                        "Esc: stop building"
                    };
                    ui.label(egui::RichText::new(hint).color(theme::ui::HINT_TEXT).size(11.0));
                });
            });
        });
    Ok(())
}
