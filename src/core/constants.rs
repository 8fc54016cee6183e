// Frame timing
pub const TICK_SECONDS: f64 = 1.0 / 60.0;
pub const REALTIME_FRAME_MS: u64 = 16; // ~60 FPS
pub const MAX_CATCH_UP_TICKS: u32 = 5;

// Play field
pub const DEFAULT_FIELD_WIDTH: f64 = 1280.0;
pub const DEFAULT_FIELD_HEIGHT: f64 = 800.0;
pub const GROUND_HEIGHT: f64 = 100.0;

// Bird
pub const BIRD_X: f64 = 150.0;
pub const BIRD_WIDTH: f64 = 35.0;
pub const BIRD_HEIGHT: f64 = 35.0;
pub const GRAVITY: f64 = 0.5;
pub const JUMP_IMPULSE: f64 = -10.0;
pub const MAX_VELOCITY: f64 = 8.0;
pub const JUMP_ROTATION_DEG: f64 = -25.0;
pub const MIN_ROTATION_DEG: f64 = -30.0;
pub const MAX_ROTATION_DEG: f64 = 90.0;
pub const ROTATION_PER_VELOCITY: f64 = 4.0;

// Pipes
pub const PIPE_WIDTH: f64 = 70.0;
pub const PIPE_GAP: f64 = 180.0;
pub const PIPE_SPEED: f64 = 3.0;
pub const PIPE_SPAWN_INTERVAL_TICKS: u32 = 120;
pub const MIN_GAP_MARGIN: f64 = 100.0;

// Session
pub const MAX_SCORE: u32 = 10;
pub const STARTING_LIVES: u32 = 3;

// Cosmetic effect timings
pub const HIT_FLASH_SECONDS: f64 = 0.2;
pub const SCORE_PULSE_SECONDS: f64 = 0.3;
pub const MUSIC_START_DELAY_SECONDS: f64 = 0.5;
pub const MUSIC_LOOP_PAUSE_SECONDS: f64 = 2.0;

// Persistence keys
pub const HIGH_SCORE_KEY: &str = "high_score";
pub const AUDIO_ENABLED_KEY: &str = "audio_enabled";
