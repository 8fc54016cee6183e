//! Frame driver shared by the terminal front end and tests.
//!
//! Each frame runs `update` on the session, forwards the resulting events to
//! the audio collaborator, fires due delayed effects, then renders. The
//! collaborators only ever see the session read-only, and a failing renderer
//! or audio backend never reaches the simulation.

use super::constants::{
    HIT_FLASH_SECONDS, MUSIC_LOOP_PAUSE_SECONDS, MUSIC_START_DELAY_SECONDS, SCORE_PULSE_SECONDS,
};
use super::effects::{DelayedEffect, Highlight, Timeline};
use super::events::GameEvent;
use super::game_state::{GameSession, GameState, StartTrigger};
use super::viewport::Viewport;
use crate::audio::melody_seconds;
use rand::Rng;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Delay before the melody restarts after audio is switched back on.
const MUSIC_RESUME_DELAY_SECONDS: f64 = 0.1;

/// Everything a renderer may look at for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub session: &'a GameSession,
    /// Hit flash is showing.
    pub flash: bool,
    /// Score counter is pulsing.
    pub pulse: bool,
    pub audio_enabled: bool,
}

/// Draws one frame. Must not mutate game state.
pub trait Renderer {
    fn render(&mut self, view: &FrameView<'_>) -> io::Result<()>;
}

/// Plays cues for game events. Implementations swallow their own failures.
pub trait AudioSink {
    fn notify(&mut self, event: GameEvent);

    /// Play one pass of the background melody.
    fn play_melody(&mut self) {}
}

impl<A: AudioSink + ?Sized> AudioSink for Box<A> {
    fn notify(&mut self, event: GameEvent) {
        (**self).notify(event);
    }

    fn play_melody(&mut self) {
        (**self).play_melody();
    }
}

/// Player or host intent, already decoupled from any input device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Space, click or tap. Jumps while playing, otherwise presses the
    /// current screen's button.
    Activate,
    TogglePause,
    /// Host view hidden.
    FocusLost,
    /// Host view visible again.
    FocusGained,
    ToggleAudio,
    Resize(Viewport),
    Quit,
}

/// Cloneable cancellation flag for the frame loop.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

pub struct GameLoop<R: Rng> {
    session: GameSession,
    rng: R,
    /// Loop time in seconds, advanced by each frame's delta.
    clock: f64,
    delayed: Timeline<DelayedEffect>,
    flash: Highlight,
    pulse: Highlight,
    audio_enabled: bool,
    /// Pause came from the host losing focus, so regaining it resumes.
    paused_by_focus: bool,
    stop: StopHandle,
}

impl<R: Rng> GameLoop<R> {
    pub fn new(session: GameSession, rng: R) -> Self {
        let audio_enabled = session.records().audio_enabled();
        Self {
            session,
            rng,
            clock: 0.0,
            delayed: Timeline::new(),
            flash: Highlight::default(),
            pulse: Highlight::default(),
            audio_enabled,
            paused_by_focus: false,
            stop: StopHandle::new(),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    pub fn pending_effects(&self) -> usize {
        self.delayed.len()
    }

    pub fn view(&self) -> FrameView<'_> {
        let generation = self.session.generation();
        FrameView {
            session: &self.session,
            flash: self.flash.is_active(self.clock, generation),
            pulse: self.pulse.is_active(self.clock, generation),
            audio_enabled: self.audio_enabled,
        }
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Activate => match self.session.state() {
                GameState::Playing => {
                    self.session.activate();
                }
                GameState::Paused => {
                    self.paused_by_focus = false;
                    self.session.resume();
                }
                state => {
                    self.session.start(StartTrigger::for_state(state));
                }
            },
            Command::TogglePause => {
                self.paused_by_focus = false;
                self.session.toggle_pause();
            }
            Command::FocusLost => {
                if self.session.pause() {
                    self.paused_by_focus = true;
                }
            }
            Command::FocusGained => {
                if self.paused_by_focus {
                    self.paused_by_focus = false;
                    self.session.resume();
                }
            }
            Command::ToggleAudio => self.toggle_audio(),
            Command::Resize(viewport) => {
                if let Err(e) = self.session.resize(viewport) {
                    log::warn!("keeping previous viewport: {}", e);
                }
            }
            Command::Quit => {
                log::info!("quit requested");
                self.stop.stop();
            }
        }
    }

    fn toggle_audio(&mut self) {
        self.audio_enabled = !self.audio_enabled;
        log::info!("audio {}", if self.audio_enabled { "on" } else { "off" });
        if let Err(e) = self
            .session
            .records_mut()
            .save_audio_enabled(self.audio_enabled)
        {
            log::warn!("failed to save audio setting: {}", e);
        }

        let generation = self.session.generation();
        if self.audio_enabled
            && self.session.state() == GameState::Playing
            && !self.delayed.has_pending(generation)
        {
            self.delayed.schedule(
                self.clock,
                MUSIC_RESUME_DELAY_SECONDS,
                generation,
                DelayedEffect::Music,
            );
        }
    }

    /// Run one frame of `dt` seconds. Returns false once the loop has been
    /// stopped, without touching the session.
    pub fn frame(
        &mut self,
        dt: f64,
        renderer: &mut impl Renderer,
        audio: &mut impl AudioSink,
    ) -> bool {
        if self.stop.is_stopped() {
            return false;
        }

        self.clock += dt.max(0.0);
        self.session.update(dt, &mut self.rng);
        self.dispatch_events(audio);
        self.fire_delayed(audio);

        if let Err(e) = renderer.render(&self.view()) {
            log::warn!("render failed, skipping frame: {}", e);
        }
        true
    }

    fn dispatch_events(&mut self, audio: &mut impl AudioSink) {
        let generation = self.session.generation();
        for event in self.session.drain_events() {
            match event {
                GameEvent::Hit => self.flash.trigger(self.clock, HIT_FLASH_SECONDS, generation),
                GameEvent::Score => {
                    self.pulse
                        .trigger(self.clock, SCORE_PULSE_SECONDS, generation)
                }
                GameEvent::Started => self.delayed.schedule(
                    self.clock,
                    MUSIC_START_DELAY_SECONDS,
                    generation,
                    DelayedEffect::Music,
                ),
                GameEvent::Jump | GameEvent::Win | GameEvent::GameOver => {}
            }
            if self.audio_enabled {
                audio.notify(event);
            }
        }
    }

    fn fire_delayed(&mut self, audio: &mut impl AudioSink) {
        let generation = self.session.generation();
        for effect in self.delayed.take_due(self.clock, generation) {
            match effect {
                DelayedEffect::Music => match self.session.state() {
                    GameState::Playing if self.audio_enabled => {
                        audio.play_melody();
                        self.delayed.schedule(
                            self.clock,
                            melody_seconds() + MUSIC_LOOP_PAUSE_SECONDS,
                            generation,
                            DelayedEffect::Music,
                        );
                    }
                    // Keep the loop alive across a pause
                    GameState::Paused => self.delayed.schedule(
                        self.clock,
                        MUSIC_RESUME_DELAY_SECONDS,
                        generation,
                        DelayedEffect::Music,
                    ),
                    _ => {}
                },
            }
        }
    }
}
