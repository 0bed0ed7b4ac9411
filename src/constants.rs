//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Default board width in cells
pub const DEFAULT_BOARD_WIDTH: i32 = 24;

/// Default board height in cells
pub const DEFAULT_BOARD_HEIGHT: i32 = 16;

/// Largest board side the board settings panel offers
pub const MAX_BOARD_SIDE: i32 = 64;

/// Default side length of one cell in world units
pub const DEFAULT_CELL_SIZE: f32 = 32.0;

/// Fraction of a cell covered by its sprite (the rest shows as a gap)
pub const CELL_FILL: f32 = 0.92;

/// World-space margin kept around the board when fitting the camera
pub const BOARD_MARGIN: f32 = 64.0;

/// Camera zoom limits (orthographic scale)
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;

/// Z layer for cell sprites
pub const CELL_Z: f32 = 0.0;
