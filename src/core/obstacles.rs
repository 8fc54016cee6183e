//! Pipe pairs: timed spawning, scrolling, retirement and scoring.

use super::viewport::Viewport;
use crate::config::{GameConfig, GapRange};
use rand::Rng;

/// A single pipe pair (top + bottom segment with a gap between them).
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Left edge (float for smooth scrolling).
    pub x: f64,
    pub width: f64,
    /// Bottom edge of the top segment, i.e. the top of the gap.
    pub top_height: f64,
    /// Top edge of the bottom segment, i.e. the bottom of the gap.
    pub bottom_y: f64,
    /// Bottom segment runs from `bottom_y` down to the ground.
    pub bottom_height: f64,
    /// Whether the bird has passed this pipe. Set at most once.
    pub scored: bool,
}

impl Obstacle {
    pub fn new(x: f64, width: f64, gap_top: f64, gap: f64, ground_y: f64) -> Self {
        let bottom_y = gap_top + gap;
        Self {
            x,
            width,
            top_height: gap_top,
            bottom_y,
            bottom_height: (ground_y - bottom_y).max(0.0),
            scored: false,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn gap_center(&self) -> f64 {
        (self.top_height + self.bottom_y) / 2.0
    }
}

/// Owns every live pipe and the spawn countdown.
#[derive(Debug, Clone)]
pub struct ObstacleField {
    /// Live pipes in creation order (oldest first).
    pub obstacles: Vec<Obstacle>,
    /// Ticks until the next spawn.
    pub spawn_countdown: u32,

    // Cached config parameters
    pub spawn_interval: u32,
    pub pipe_width: f64,
    pub pipe_gap: f64,
    pub pipe_speed: f64,
    pub min_gap_margin: f64,
}

impl ObstacleField {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            obstacles: Vec::new(),
            spawn_countdown: config.spawn_interval_ticks,
            spawn_interval: config.spawn_interval_ticks,
            pipe_width: config.pipe_width,
            pipe_gap: config.pipe_gap,
            pipe_speed: config.pipe_speed,
            min_gap_margin: config.min_gap_margin,
        }
    }

    /// Drop every pipe and restart the spawn countdown.
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.reset_timer();
    }

    pub fn reset_timer(&mut self) {
        self.spawn_countdown = self.spawn_interval;
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// Gap-top range for the viewport's current ground line.
    pub fn gap_range(&self, viewport: &Viewport) -> Option<GapRange> {
        GapRange::within(viewport.ground_y(), self.pipe_gap, self.min_gap_margin).ok()
    }

    /// Spawn a pipe at the right edge with a uniformly random gap.
    pub fn spawn<R: Rng>(&mut self, viewport: &Viewport, rng: &mut R) {
        let Some(range) = self.gap_range(viewport) else {
            // Session rejects such viewports; only reachable with hand-built fields
            log::warn!(
                "skipping pipe spawn: gap {} does not fit ground at {}",
                self.pipe_gap,
                viewport.ground_y()
            );
            return;
        };
        let gap_top = rng.gen_range(range.min..=range.max);

        log::debug!("spawned pipe at x={:.0} gap_top={:.1}", viewport.width, gap_top);
        self.obstacles.push(Obstacle::new(
            viewport.width,
            self.pipe_width,
            gap_top,
            self.pipe_gap,
            viewport.ground_y(),
        ));
    }

    /// Advance the field by one tick and return how many pipes the bird
    /// passed during it.
    ///
    /// Spawning happens first so a fresh pipe scrolls on its first tick.
    /// Retirement uses a stable retain, so creation order is preserved and
    /// no pipe is skipped by the scoring pass that follows.
    pub fn tick<R: Rng>(&mut self, bird_x: f64, viewport: &Viewport, rng: &mut R) -> u32 {
        self.spawn_countdown = self.spawn_countdown.saturating_sub(1);
        if self.spawn_countdown == 0 {
            self.spawn(viewport, rng);
            self.reset_timer();
        }

        for obstacle in &mut self.obstacles {
            obstacle.x -= self.pipe_speed;
        }

        self.obstacles.retain(|o| o.right() >= 0.0);

        let mut crossings = 0;
        for obstacle in &mut self.obstacles {
            if !obstacle.scored && obstacle.right() < bird_x {
                obstacle.scored = true;
                crossings += 1;
            }
        }
        crossings
    }
}
