//! Terminal runner (default binary).
//!
//! Reads keys with crossterm, forwards them to the session host and redraws
//! the latest snapshot every frame.

use std::fs::File;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::{info, LevelFilter};

use blockfall::input::should_quit;
use blockfall::runtime::{ControlEvent, SessionConfig, SessionHost};
use blockfall::term::TerminalScreen;

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that keeps repeating.
const FALLBACK_KEY_RELEASE_TIMEOUT_MS: u64 = 150;

fn init_logging() -> Result<()> {
    let Some(path) = std::env::var("BLOCKFALL_LOG_PATH")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    else {
        // Logging to the terminal would corrupt the screen.
        return Ok(());
    };

    let file = File::create(&path).with_context(|| format!("failed to open log file {}", path))?;
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to install logger")?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let mut screen = TerminalScreen::new();
    screen.enter()?;

    let result = run(&mut screen);

    // Always try to restore terminal state.
    let _ = screen.exit();
    result
}

fn run(screen: &mut TerminalScreen) -> Result<()> {
    let mut config = SessionConfig::from_env();
    if !screen.key_release_events() && config.key_release_timeout_ms.is_none() {
        config.key_release_timeout_ms = Some(FALLBACK_KEY_RELEASE_TIMEOUT_MS);
    }
    info!("starting session with {:?}", config);

    let frame = Duration::from_millis(config.frame_ms);
    let mut host = SessionHost::start(config)?;

    loop {
        screen.draw(&host.snapshot())?;
        while let Some(note) = host.try_notification() {
            info!("notification: {}", note);
        }

        if !event::poll(frame)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match key.kind {
            KeyEventKind::Press => {
                if should_quit(key) {
                    break;
                }
                host.send(ControlEvent::KeyDown(key.code))?;
            }
            // The held-key set filters these out for one-shot bindings.
            KeyEventKind::Repeat => host.send(ControlEvent::KeyDown(key.code))?,
            KeyEventKind::Release => host.send(ControlEvent::KeyUp(key.code))?,
        }
    }

    host.shutdown()
}
