use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use flappy::audio::{Bell, Silent};
use flappy::config::GameConfig;
use flappy::core::constants::REALTIME_FRAME_MS;
use flappy::core::{AudioSink, Command, GameLoop, GameSession, Renderer};
use flappy::input;
use flappy::logging;
use flappy::ui::TerminalRenderer;
use flappy::utils::persistence::{data_path, FileStore, Records};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Flappy Bird in your terminal
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Write debug messages to the log file
    #[arg(short, long)]
    verbose: bool,

    /// Config file (default: ~/.flappy/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Logical field height
    #[arg(long)]
    field_height: Option<f64>,

    /// Pipes to pass to win
    #[arg(long)]
    max_score: Option<u32>,

    /// Lives per session
    #[arg(long)]
    lives: Option<u32>,

    /// Play no sound this run
    #[arg(long)]
    mute: bool,

    /// Seed for pipe placement
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn load_config(&self) -> GameConfig {
        let path = match &self.config {
            Some(path) => Some(path.clone()),
            None => match data_path("config.json") {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("no config directory, using defaults: {}", e);
                    None
                }
            },
        };
        let mut config = GameConfig::load(path.as_deref());

        if let Some(height) = self.field_height {
            config.field_height = height;
        }
        if let Some(max_score) = self.max_score {
            config.max_score = max_score;
        }
        if let Some(lives) = self.lives {
            config.starting_lives = lives;
        }
        config
    }
}

#[cfg(feature = "sound")]
fn audio_device() -> Option<Box<dyn AudioSink>> {
    match flappy::audio::Synth::try_default() {
        Ok(synth) => Some(Box::new(synth)),
        Err(e) => {
            log::warn!("falling back to terminal bell: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "sound"))]
fn audio_device() -> Option<Box<dyn AudioSink>> {
    None
}

fn audio_backend(mute: bool) -> Box<dyn AudioSink> {
    if mute {
        return Box::new(Silent);
    }
    audio_device().unwrap_or_else(|| Box::new(Bell::new(io::stdout())))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = data_path("flappy.log")
        .and_then(|path| logging::open_log_file(&path))
        .ok();
    logging::init(args.verbose, log_file);

    let config = args.load_config();
    let records = match FileStore::in_home() {
        Ok(store) => Records::new(store),
        Err(e) => {
            log::warn!("records will not persist: {}", e);
            Records::in_memory()
        }
    };
    let session =
        GameSession::new(config.clone(), records).context("invalid game configuration")?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = GameLoop::new(session, rng);
    let mut audio = audio_backend(args.mute);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    stdout.execute(EnableFocusChange)?;
    let mut renderer = TerminalRenderer::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut game, &mut renderer, &mut audio, &config);

    restore_terminal(&mut renderer)?;
    log::info!("exiting with high score {}", game.session().high_score());
    result
}

/// Real-time loop: drain input until the frame is due, then run one frame.
fn run<R: Renderer>(
    game: &mut GameLoop<StdRng>,
    renderer: &mut R,
    audio: &mut Box<dyn AudioSink>,
    config: &GameConfig,
) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    game.handle(Command::Resize(input::viewport_for_terminal(
        cols, rows, config,
    )));

    let frame_budget = Duration::from_millis(REALTIME_FRAME_MS);
    let mut last_frame = Instant::now();

    while game.is_running() {
        let timeout = frame_budget.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            if let Some(command) = input::map_event(event::read()?, config) {
                game.handle(command);
            }
            continue;
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;
        if !game.frame(dt, renderer, audio) {
            break;
        }
    }
    Ok(())
}

fn restore_terminal(renderer: &mut TerminalRenderer<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    let backend = renderer.terminal_mut().backend_mut();
    backend.execute(DisableFocusChange)?;
    backend.execute(DisableMouseCapture)?;
    backend.execute(LeaveAlternateScreen)?;
    renderer.terminal_mut().show_cursor()?;
    Ok(())
}
