//! Axis-aligned overlap tests between the bird and pipe pairs.

use super::obstacles::Obstacle;

/// Axis-aligned rectangle in field units, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// True iff the bird shares columns with the pipe and pokes out of the gap
/// into either segment. Touching edges do not count.
pub fn collides(bird: &Bounds, obstacle: &Obstacle) -> bool {
    let overlaps_column = bird.right() > obstacle.x && bird.left() < obstacle.right();
    overlaps_column && (bird.top() < obstacle.top_height || bird.bottom() > obstacle.bottom_y)
}

/// Index of the first obstacle the bird collides with, in creation order.
pub fn first_collision(bird: &Bounds, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles.iter().position(|obstacle| collides(bird, obstacle))
}
