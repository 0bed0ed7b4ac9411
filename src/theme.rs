//! Centralized color theme for the application.
//!
//! This module provides all colors used for board rendering and the egui UI.
//! Modify values here to change the application's color scheme.

use bevy::prelude::Color;
use bevy_egui::egui;

use crate::board::{BuildingKind, TerrainKind};

// ============================================================================
// Board Colors
// ============================================================================

/// Semi-transparent grey grid lines
pub const GRID_COLOR: Color = Color::srgba(0.5, 0.5, 0.5, 0.3);

/// Clear color behind the board
pub const BACKGROUND: Color = Color::srgb(0.12, 0.13, 0.16);

pub fn terrain_color(terrain: TerrainKind) -> Color {
    match terrain {
        TerrainKind::Grass => Color::srgb(0.36, 0.62, 0.30),
        TerrainKind::Pond => Color::srgb(0.25, 0.50, 0.80),
        TerrainKind::Mountain => Color::srgb(0.48, 0.45, 0.42),
    }
}

pub fn building_color(kind: BuildingKind) -> Color {
    match kind {
        BuildingKind::House => Color::srgb(0.85, 0.55, 0.35),
        BuildingKind::Hotel => Color::srgb(0.75, 0.30, 0.45),
        BuildingKind::Tent => Color::srgb(0.95, 0.80, 0.30),
        BuildingKind::Skyscraper => Color::srgb(0.55, 0.60, 0.75),
    }
}

/// Each extra stacked level lightens a building by this much (mix factor)
pub const STACK_LIGHTEN_STEP: f32 = 0.08;

/// Line between connected hotel cells
pub const CONNECTOR_COLOR: Color = Color::srgba(1.0, 0.9, 0.9, 0.8);

// ============================================================================
// Selection Colors
// ============================================================================

/// Tint for hovered cells that would be accepted
pub const HOVER_TINT: Color = Color::srgb(1.0, 1.0, 1.0);

/// Tint for hovered cells in a selection that cannot be committed
pub const REJECTED_TINT: Color = Color::srgb(0.9, 0.15, 0.15);

/// Light blue for the origin of a drawn rectangle
pub const SELECTED_TINT: Color = Color::srgb(0.2, 0.6, 1.0);

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Dark grey panel background
    pub const PANEL_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(45, 45, 48);

    /// Light grey for label text
    pub const LABEL_TEXT: egui::Color32 = egui::Color32::LIGHT_GRAY;

    /// Grey for help/hint text
    pub const HINT_TEXT: egui::Color32 = egui::Color32::GRAY;

    /// White for selected button borders
    pub const SELECTED_BORDER: egui::Color32 = egui::Color32::WHITE;

    /// Dark grey for unselected button borders
    pub const UNSELECTED_BORDER: egui::Color32 = egui::Color32::DARK_GRAY;

    /// Red for error messages
    pub const ERROR_TEXT: egui::Color32 = egui::Color32::RED;

    /// Semi-transparent black overlay for modal dialogs
    pub const MODAL_OVERLAY: egui::Color32 = egui::Color32::from_black_alpha(100);
}

// ============================================================================
// Color Conversion Utilities
// ============================================================================

/// Convert a Bevy Color to egui Color32 (fully opaque)
pub fn bevy_to_egui_opaque(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgb(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
    )
}
