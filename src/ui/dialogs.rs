use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::ConfigResetNotification;
use crate::theme;

/// Tell the user the config file could not be used and defaults were loaded
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    let mut dismissed = false;

    egui::Modal::new(egui::Id::new("config_reset"))
        .backdrop_color(theme::ui::MODAL_OVERLAY)
        .show(contexts.ctx_mut()?, |ui| {
            ui.heading("Configuration Reset");
            ui.add_space(8.0);
            ui.label("Your settings could not be loaded and were reset to defaults.");
            if let Some(reason) = &notification.reason {
                ui.add_space(8.0);
                ui.colored_label(theme::ui::ERROR_TEXT, reason);
            }
            ui.add_space(12.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        notification.show = false;
        notification.reason = None;
    }

    Ok(())
}
