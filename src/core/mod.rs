//! Core simulation: bird physics, pipes, collisions, the session state
//! machine and the frame driver. Nothing here touches the terminal.

pub mod bird;
pub mod collision;
pub mod constants;
pub mod effects;
pub mod events;
pub mod game_loop;
pub mod game_state;
pub mod obstacles;
pub mod viewport;

pub use events::GameEvent;
pub use game_loop::{AudioSink, Command, FrameView, GameLoop, Renderer, StopHandle};
pub use game_state::{GameSession, GameState, StartTrigger};
pub use viewport::Viewport;
