//! Events the session emits for presentation collaborators.
//!
//! The simulation never calls into audio or rendering directly; it queues
//! these and the game loop hands them out after each update.

/// A single notable thing that happened during a tick or transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// A session began (start, restart or play again).
    Started,
    /// The bird jumped.
    Jump,
    /// The bird passed a pipe.
    Score,
    /// A life was lost (pipe or ground).
    Hit,
    /// Score reached the target.
    Win,
    /// Lives ran out.
    GameOver,
}

impl GameEvent {
    /// Stable name used by cue tables and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Jump => "jump",
            Self::Score => "score",
            Self::Hit => "hit",
            Self::Win => "win",
            Self::GameOver => "gameOver",
        }
    }
}
