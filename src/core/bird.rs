//! Bird physics: Euler integration of vertical motion under gravity.

use super::collision::Bounds;
use super::constants::{
    JUMP_ROTATION_DEG, MAX_ROTATION_DEG, MIN_ROTATION_DEG, ROTATION_PER_VELOCITY,
};
use super::viewport::Viewport;
use crate::config::GameConfig;

/// Outcome of one physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdStep {
    Airborne,
    /// The bird's bottom edge dipped below the ground line.
    HitGround,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    /// Left edge; constant lane offset.
    pub x: f64,
    /// Top edge. 0 is the ceiling, positive is downward.
    pub y: f64,
    /// Vertical velocity in units per tick (positive = falling).
    pub velocity: f64,
    /// Visual tilt in degrees. Never read by the simulation.
    pub rotation: f64,
    pub width: f64,
    pub height: f64,

    // Cached physics parameters
    pub gravity: f64,
    pub jump_impulse: f64,
    pub max_velocity: f64,
}

impl Bird {
    pub fn new(config: &GameConfig, viewport: &Viewport) -> Self {
        Self {
            x: config.bird_x,
            y: viewport.bird_start_y(),
            velocity: 0.0,
            rotation: 0.0,
            width: config.bird_width,
            height: config.bird_height,
            gravity: config.gravity,
            jump_impulse: config.jump_impulse,
            max_velocity: config.max_velocity,
        }
    }

    /// Put the bird back at its spawn pose.
    pub fn reset(&mut self, lane_x: f64, viewport: &Viewport) {
        self.x = lane_x;
        self.y = viewport.bird_start_y();
        self.velocity = 0.0;
        self.rotation = 0.0;
    }

    /// Replace the velocity with the jump impulse (not additive) and snap
    /// the beak upward.
    pub fn apply_jump(&mut self) {
        self.velocity = self.jump_impulse;
        self.rotation = JUMP_ROTATION_DEG;
    }

    /// Advance one tick.
    ///
    /// Gravity only acts once `started`; before that the bird hovers with
    /// zero velocity and zero tilt.
    pub fn tick(&mut self, started: bool, ground_y: f64) -> BirdStep {
        if started {
            self.velocity += self.gravity;
            if self.velocity > self.max_velocity {
                self.velocity = self.max_velocity;
            }
        }

        self.y += self.velocity;

        self.rotation = if started {
            (self.velocity * ROTATION_PER_VELOCITY).clamp(MIN_ROTATION_DEG, MAX_ROTATION_DEG)
        } else {
            0.0
        };

        // Ceiling stops the bird dead, no bounce
        if self.y < 0.0 {
            self.y = 0.0;
            self.velocity = 0.0;
        }

        if self.y + self.height > ground_y {
            BirdStep::HitGround
        } else {
            BirdStep::Airborne
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}
