//! Flappy - a Flappy Bird game for the terminal.
//!
//! The simulation in [`core`] is independent of the terminal; [`ui`],
//! [`input`] and [`audio`] adapt it to ratatui, crossterm and the speaker.

pub mod audio;
pub mod config;
pub mod core;
pub mod input;
pub mod logging;
pub mod ui;
pub mod utils;
