//! Logical play-field dimensions.

use crate::config::GameConfig;

/// Size of the logical play field. Everything in the simulation is measured
/// in these units; the renderer scales them to whatever surface it draws on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub ground_height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, ground_height: f64) -> Self {
        Self {
            width,
            height,
            ground_height,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.field_width, config.field_height, config.ground_height)
    }

    /// Viewport for a terminal area of `cols` x `rows` cells.
    ///
    /// The logical height stays fixed; the width follows the terminal's
    /// aspect ratio, counting a cell as half as wide as it is tall.
    pub fn for_terminal(cols: u16, rows: u16, height: f64, ground_height: f64) -> Self {
        let rows = f64::from(rows.max(1));
        let units_per_row = height / rows;
        let width = f64::from(cols.max(1)) * units_per_row / 2.0;
        Self::new(width, height, ground_height)
    }

    /// Top edge of the ground strip.
    pub fn ground_y(&self) -> f64 {
        self.height - self.ground_height
    }

    /// Vertical spawn position of the bird.
    pub fn bird_start_y(&self) -> f64 {
        self.height / 2.0
    }
}
