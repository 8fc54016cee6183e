//! The play session: score, lives, high score and the screen state machine.
//!
//! ```text
//!            start()                 lives == 0
//!   Start ───────────► Playing ─────────────────► GameOver
//!                      │  ▲  │ score == max          │
//!              pause() │  │  └──────────► Win        │
//!                      ▼  │ resume()       │         │
//!                     Paused               └─────────┴──► start() ► Playing
//! ```
//!
//! A lost life with lives remaining keeps the session in `Playing`: the bird
//! is put back at its spawn pose and waits for the next input, while the
//! pipes stay where they are.

use super::bird::{Bird, BirdStep};
use super::collision::first_collision;
use super::constants::{MAX_CATCH_UP_TICKS, TICK_SECONDS};
use super::events::GameEvent;
use super::obstacles::{Obstacle, ObstacleField};
use super::viewport::Viewport;
use crate::config::{ConfigError, GameConfig};
use crate::utils::persistence::Records;
use rand::Rng;

/// Which screen the game is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Start,
    Playing,
    /// Host view hidden or pause key pressed while playing.
    Paused,
    GameOver,
    Win,
}

impl GameState {
    /// States a new session may be started from.
    pub fn can_start(&self) -> bool {
        *self == Self::Start || self.is_terminal()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::GameOver | Self::Win)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::GameOver => "gameOver",
            Self::Win => "win",
        }
    }
}

/// The UI action that asked for a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTrigger {
    Start,
    Restart,
    PlayAgain,
}

impl StartTrigger {
    /// Button that starts a session from the given screen.
    pub fn for_state(state: GameState) -> Self {
        match state {
            GameState::GameOver => Self::Restart,
            GameState::Win => Self::PlayAgain,
            _ => Self::Start,
        }
    }
}

/// One play session. Owns the bird, the pipes and the record store.
#[derive(Debug)]
pub struct GameSession {
    pub bird: Bird,
    pub obstacles: ObstacleField,

    config: GameConfig,
    viewport: Viewport,
    state: GameState,
    /// False while the bird hovers waiting for the first input.
    game_started: bool,
    score: u32,
    lives: u32,
    high_score: u32,
    /// Whether the last finished session raised the high score.
    new_high_score: bool,
    /// Bumped on every reset so stale delayed effects can be recognised.
    generation: u64,
    /// Sub-tick time carried between updates (seconds).
    accumulator: f64,
    events: Vec<GameEvent>,
    records: Records,
}

impl GameSession {
    /// Build a session on the configured field.
    ///
    /// Fails if the configuration cannot produce a playable field.
    pub fn new(config: GameConfig, records: Records) -> Result<Self, ConfigError> {
        config.validate()?;
        let viewport = Viewport::from_config(&config);
        let high_score = records.high_score();
        log::info!("loaded high score {}", high_score);

        Ok(Self {
            bird: Bird::new(&config, &viewport),
            obstacles: ObstacleField::new(&config),
            lives: config.starting_lives,
            config,
            viewport,
            state: GameState::Start,
            game_started: false,
            score: 0,
            high_score,
            new_high_score: false,
            generation: 0,
            accumulator: 0.0,
            events: Vec::new(),
            records,
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn game_started(&self) -> bool {
        self.game_started
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn max_score(&self) -> u32 {
        self.config.max_score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn starting_lives(&self) -> u32 {
        self.config.starting_lives
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// True once a session ends above the previous high score, until the
    /// next session starts.
    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles.obstacles
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Records {
        &mut self.records
    }

    /// Hand queued events to the caller, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin a fresh session. Only legal from the start screen or a terminal
    /// screen; returns whether the transition happened.
    pub fn start(&mut self, trigger: StartTrigger) -> bool {
        if !self.state.can_start() {
            log::debug!("ignoring {:?} while {}", trigger, self.state.name());
            return false;
        }

        self.reset();
        self.state = GameState::Playing;
        self.events.push(GameEvent::Started);
        log::info!(
            "session {} started via {:?} (high score {})",
            self.generation,
            trigger,
            self.high_score
        );
        true
    }

    fn reset(&mut self) {
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.game_started = false;
        self.new_high_score = false;
        self.bird.reset(self.config.bird_x, &self.viewport);
        self.obstacles.clear();
        self.accumulator = 0.0;
        self.generation += 1;
    }

    /// The single "activate" input. Jumps while playing; ignored otherwise.
    pub fn activate(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }

        self.bird.apply_jump();
        if !self.game_started {
            self.game_started = true;
            log::debug!("bird released");
        }
        self.events.push(GameEvent::Jump);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        self.state = GameState::Paused;
        log::info!("paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != GameState::Paused {
            return false;
        }
        self.state = GameState::Playing;
        self.accumulator = 0.0;
        log::info!("resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            GameState::Playing => self.pause(),
            GameState::Paused => self.resume(),
            _ => false,
        }
    }

    /// Adopt new field dimensions.
    ///
    /// Pipes keep their absolute x; only spawns after this call see the new
    /// ground line. A hovering bird is re-centred, a flying one is left
    /// alone. A viewport that cannot fit a gap, or that would spawn pipes on
    /// top of the bird, is rejected and the old one kept.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), ConfigError> {
        self.config.fit(&viewport)?;

        self.viewport = viewport;
        if !self.game_started {
            self.bird.y = viewport.bird_start_y();
        }
        log::debug!("viewport now {:.0}x{:.0}", viewport.width, viewport.height);
        Ok(())
    }

    /// Advance the simulation by `dt` seconds of wall time using fixed ticks.
    /// Returns the number of ticks run.
    pub fn update<R: Rng>(&mut self, dt: f64, rng: &mut R) -> u32 {
        if self.state != GameState::Playing {
            self.accumulator = 0.0;
            return 0;
        }

        self.accumulator += dt.max(0.0);
        let mut ticks = 0;
        while self.accumulator >= TICK_SECONDS && ticks < MAX_CATCH_UP_TICKS {
            self.accumulator -= TICK_SECONDS;
            self.tick(rng);
            ticks += 1;
            if self.state != GameState::Playing {
                self.accumulator = 0.0;
                break;
            }
        }
        // Drop time we could not catch up on instead of spiralling
        self.accumulator = self.accumulator.min(TICK_SECONDS);
        ticks
    }

    /// One simulation step: bird, then pipes, then collisions, then the
    /// state machine's reaction. Collisions are tested against post-move
    /// positions of both.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        if self.state != GameState::Playing {
            return;
        }

        let ground_y = self.viewport.ground_y();
        if self.bird.tick(self.game_started, ground_y) == BirdStep::HitGround {
            self.on_life_lost();
            return;
        }

        // Pipes hold still while the bird waits for input
        if !self.game_started {
            return;
        }

        let crossings = self.obstacles.tick(self.bird.x, &self.viewport, rng);
        for _ in 0..crossings {
            self.on_score();
            if self.state != GameState::Playing {
                return;
            }
        }

        if first_collision(&self.bird.bounds(), &self.obstacles.obstacles).is_some() {
            self.on_life_lost();
        }
    }

    /// React to the bird hitting a pipe or the ground.
    pub fn on_life_lost(&mut self) {
        if self.state != GameState::Playing {
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::Hit);
        log::info!("life lost, {} left", self.lives);

        if self.lives == 0 {
            self.finish(GameState::GameOver);
            self.events.push(GameEvent::GameOver);
        } else {
            self.bird.reset(self.config.bird_x, &self.viewport);
            self.game_started = false;
        }
    }

    /// React to the bird passing a pipe.
    pub fn on_score(&mut self) {
        if self.state != GameState::Playing {
            return;
        }

        self.score += 1;
        self.events.push(GameEvent::Score);
        log::debug!("score {}/{}", self.score, self.config.max_score);

        if self.score >= self.config.max_score {
            self.finish(GameState::Win);
            self.events.push(GameEvent::Win);
        }
    }

    fn finish(&mut self, outcome: GameState) {
        self.state = outcome;
        log::info!("session {} ended: {}", self.generation, outcome.name());

        if self.score > self.high_score {
            self.high_score = self.score;
            self.new_high_score = true;
            if let Err(e) = self.records.save_high_score(self.high_score) {
                log::warn!("failed to save high score {}: {}", self.high_score, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::persistence::{KeyValueStore, MemoryStore, StorageError};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::io;

    fn session() -> GameSession {
        GameSession::new(GameConfig::default(), Records::in_memory()).unwrap()
    }

    fn playing() -> GameSession {
        let mut session = session();
        assert!(session.start(StartTrigger::Start));
        session
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_new_session_defaults() {
        let session = session();
        assert_eq!(session.state(), GameState::Start);
        assert_eq!(session.score(), 0);
        assert_eq!(session.lives(), 3);
        assert_eq!(session.high_score(), 0);
        assert!(!session.game_started());
        assert!(session.obstacles().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            field_height: 400.0,
            ..GameConfig::default()
        };
        assert!(GameSession::new(config, Records::in_memory()).is_err());
    }

    #[test]
    fn test_non_finite_field_is_rejected_at_startup() {
        for field_height in [f64::NAN, f64::INFINITY] {
            let config = GameConfig {
                field_height,
                ..GameConfig::default()
            };
            assert!(matches!(
                GameSession::new(config, Records::in_memory()),
                Err(ConfigError::NotFinite { .. })
            ));
        }
    }

    #[test]
    fn test_start_resets_and_enters_playing() {
        let mut session = playing();
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.generation(), 1);
        assert_eq!(session.drain_events(), vec![GameEvent::Started]);
    }

    #[test]
    fn test_start_rejected_while_playing_or_paused() {
        let mut session = playing();
        assert!(!session.start(StartTrigger::Start));
        session.pause();
        assert!(!session.start(StartTrigger::Restart));
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_activate_ignored_outside_playing() {
        let mut session = session();
        assert!(!session.activate());
        assert!(!session.game_started());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_first_activate_releases_bird() {
        let mut session = playing();
        session.drain_events();
        assert!(session.activate());
        assert!(session.game_started());
        assert_eq!(session.bird.velocity, -10.0);
        assert_eq!(session.drain_events(), vec![GameEvent::Jump]);
    }

    #[test]
    fn test_hovering_bird_stays_put() {
        let mut session = playing();
        let mut rng = rng();
        let y = session.bird.y;
        for _ in 0..300 {
            session.tick(&mut rng);
            assert_eq!(session.bird.velocity, 0.0);
            assert_eq!(session.bird.rotation, 0.0);
        }
        assert_eq!(session.bird.y, y);
        // Pipes do not spawn until the bird is released
        assert!(session.obstacles().is_empty());
    }

    #[test]
    fn test_life_loss_with_lives_remaining_resets_bird() {
        let mut session = playing();
        session.activate();
        session.bird.y = 20.0;
        session.bird.velocity = 5.0;
        session
            .obstacles
            .obstacles
            .push(Obstacle::new(900.0, 70.0, 200.0, 180.0, 700.0));
        session.drain_events();

        session.on_life_lost();

        assert_eq!(session.lives(), 2);
        assert_eq!(session.state(), GameState::Playing);
        assert!(!session.game_started());
        assert_eq!(session.bird.y, 400.0);
        assert_eq!(session.bird.velocity, 0.0);
        assert_eq!(session.obstacles().len(), 1);
        assert_eq!(session.drain_events(), vec![GameEvent::Hit]);
    }

    #[test]
    fn test_third_life_loss_ends_game() {
        let mut session = playing();
        session.on_life_lost();
        assert_eq!(session.state(), GameState::Playing);
        session.on_life_lost();
        assert_eq!(session.state(), GameState::Playing);
        session.on_life_lost();
        assert_eq!(session.state(), GameState::GameOver);
        assert_eq!(session.lives(), 0);

        let events = session.drain_events();
        assert_eq!(events.last(), Some(&GameEvent::GameOver));
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Hit).count(), 3);
    }

    #[test]
    fn test_tenth_score_wins_once() {
        let mut session = playing();
        for _ in 0..10 {
            session.on_score();
        }
        assert_eq!(session.state(), GameState::Win);
        assert_eq!(session.score(), 10);

        // Further crossings cannot push past the target
        session.on_score();
        assert_eq!(session.score(), 10);

        let events = session.drain_events();
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Win).count(), 1);
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Score).count(), 10);
    }

    #[test]
    fn test_high_score_updates_only_when_beaten() {
        let records = Records::new(MemoryStore::with("high_score", "5"));
        let mut session = GameSession::new(GameConfig::default(), records).unwrap();
        assert_eq!(session.high_score(), 5);

        session.start(StartTrigger::Start);
        for _ in 0..3 {
            session.on_score();
        }
        for _ in 0..3 {
            session.on_life_lost();
        }
        assert_eq!(session.state(), GameState::GameOver);
        assert_eq!(session.high_score(), 5);
        assert_eq!(session.records().high_score(), 5);
        assert!(!session.is_new_high_score());

        session.start(StartTrigger::Restart);
        for _ in 0..7 {
            session.on_score();
        }
        for _ in 0..3 {
            session.on_life_lost();
        }
        assert_eq!(session.high_score(), 7);
        assert_eq!(session.records().high_score(), 7);
        assert!(session.is_new_high_score());

        // Cleared by the next session
        session.start(StartTrigger::Restart);
        assert!(!session.is_new_high_score());
    }

    #[test]
    fn test_tying_high_score_is_not_a_new_best() {
        let records = Records::new(MemoryStore::with("high_score", "4"));
        let mut session = GameSession::new(GameConfig::default(), records).unwrap();
        session.start(StartTrigger::Start);
        for _ in 0..4 {
            session.on_score();
        }
        for _ in 0..3 {
            session.on_life_lost();
        }
        assert_eq!(session.score(), session.high_score());
        assert!(!session.is_new_high_score());
    }

    #[test]
    fn test_start_allowed_only_from_menus() {
        assert!(GameState::Start.can_start());
        assert!(GameState::GameOver.can_start());
        assert!(GameState::Win.can_start());
        assert!(!GameState::Playing.can_start());
        assert!(!GameState::Paused.can_start());
    }

    #[test]
    fn test_restart_after_game_over_bumps_generation() {
        let mut session = playing();
        for _ in 0..3 {
            session.on_life_lost();
        }
        assert!(session.start(StartTrigger::Restart));
        assert_eq!(session.generation(), 2);
        assert_eq!(session.lives(), 3);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut session = playing();
        let mut rng = rng();
        session.activate();
        session.pause();
        assert_eq!(session.state(), GameState::Paused);

        let y = session.bird.y;
        assert_eq!(session.update(1.0, &mut rng), 0);
        session.tick(&mut rng);
        assert_eq!(session.bird.y, y);
        assert!(!session.activate());

        assert!(session.resume());
        assert_eq!(session.state(), GameState::Playing);
        session.tick(&mut rng);
        assert!(session.bird.y != y);
    }

    #[test]
    fn test_toggle_pause_ignored_on_menus() {
        let mut session = session();
        assert!(!session.toggle_pause());
        assert_eq!(session.state(), GameState::Start);
    }

    #[test]
    fn test_update_runs_fixed_ticks() {
        let mut session = playing();
        let mut rng = rng();
        session.activate();
        assert_eq!(session.update(TICK_SECONDS * 3.5, &mut rng), 3);
        // The carried half tick completes one more
        assert_eq!(session.update(TICK_SECONDS * 0.75, &mut rng), 1);
    }

    #[test]
    fn test_update_caps_catch_up() {
        let mut session = playing();
        let mut rng = rng();
        assert_eq!(session.update(10.0, &mut rng), MAX_CATCH_UP_TICKS);
        assert_eq!(session.update(0.0, &mut rng), 1);
    }

    #[test]
    fn test_ground_hit_costs_a_life() {
        let mut session = playing();
        let mut rng = rng();
        session.activate();
        session.bird.y = 700.0 - 36.0;
        session.bird.velocity = 8.0;
        session.tick(&mut rng);
        assert_eq!(session.lives(), 2);
        assert!(!session.game_started());
    }

    #[test]
    fn test_pipe_collision_costs_a_life() {
        let mut session = playing();
        let mut rng = rng();
        session.activate();
        session.bird.velocity = 0.0;
        session.bird.y = 50.0;
        // Bird column 150..185, pipe will be at 147..217 after one scroll
        session
            .obstacles
            .obstacles
            .push(Obstacle::new(150.0, 70.0, 300.0, 180.0, 700.0));

        session.tick(&mut rng);
        assert_eq!(session.lives(), 2);
    }

    #[test]
    fn test_resize_rejects_field_without_room() {
        let mut session = playing();
        let before = *session.viewport();
        assert!(session.resize(Viewport::new(800.0, 300.0, 100.0)).is_err());
        assert_eq!(*session.viewport(), before);
    }

    #[test]
    fn test_resize_rejects_field_narrower_than_bird_lane() {
        let mut session = playing();
        let before = *session.viewport();
        // Bird lane ends at 150 + 35, plus one pipe width
        assert!(matches!(
            session.resize(Viewport::new(83.3, 800.0, 100.0)),
            Err(ConfigError::FieldTooNarrow { .. })
        ));
        assert!(session.resize(Viewport::new(255.0, 800.0, 100.0)).is_err());
        assert_eq!(*session.viewport(), before);

        assert!(session.resize(Viewport::new(256.0, 800.0, 100.0)).is_ok());
        assert_eq!(session.viewport().width, 256.0);
    }

    #[test]
    fn test_resize_rejects_non_finite_field() {
        let mut session = playing();
        let before = *session.viewport();
        assert!(session.resize(Viewport::new(1280.0, f64::NAN, 100.0)).is_err());
        assert!(session
            .resize(Viewport::new(f64::INFINITY, 800.0, 100.0))
            .is_err());
        assert_eq!(*session.viewport(), before);
    }

    #[test]
    fn test_resize_keeps_pipes_and_recentres_idle_bird() {
        let mut session = playing();
        session
            .obstacles
            .obstacles
            .push(Obstacle::new(640.0, 70.0, 200.0, 180.0, 700.0));
        session.resize(Viewport::new(1600.0, 1000.0, 100.0)).unwrap();

        assert_eq!(session.obstacles()[0].x, 640.0);
        assert_eq!(session.bird.y, 500.0);
        assert_eq!(session.viewport().ground_y(), 900.0);
    }

    #[test]
    fn test_resize_leaves_flying_bird_alone() {
        let mut session = playing();
        session.activate();
        session.bird.y = 123.0;
        session.resize(Viewport::new(1600.0, 1000.0, 100.0)).unwrap();
        assert_eq!(session.bird.y, 123.0);
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "nope").into())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "nope").into())
        }
    }

    #[test]
    fn test_storage_failures_do_not_stop_play() {
        let mut session =
            GameSession::new(GameConfig::default(), Records::new(BrokenStore)).unwrap();
        assert_eq!(session.high_score(), 0);
        session.start(StartTrigger::Start);
        for _ in 0..10 {
            session.on_score();
        }
        assert_eq!(session.state(), GameState::Win);
        assert_eq!(session.high_score(), 10);
        assert!(session.start(StartTrigger::PlayAgain));
    }

    #[test]
    fn test_start_trigger_for_state() {
        assert_eq!(StartTrigger::for_state(GameState::Start), StartTrigger::Start);
        assert_eq!(
            StartTrigger::for_state(GameState::GameOver),
            StartTrigger::Restart
        );
        assert_eq!(StartTrigger::for_state(GameState::Win), StartTrigger::PlayAgain);
    }
}
