//! Flipdeck - flashcard study TUI
//!
//! A terminal flashcard viewer: page through a deck, flip cards to reveal
//! answers, and add, edit, or delete cards as you go.

mod config;
mod deck;
mod models;
mod ui;

use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::prelude::*;

use config::Config;
use deck::DeckController;
use ui::App;

// ══════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ══════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug)]
#[command(name = "flipdeck")]
#[command(author, version, about = "Flashcard study TUI", long_about = None)]
struct Args {
    /// Keep the starter deck in its authored order
    #[arg(long)]
    no_shuffle: bool,

    /// Theme to use for this session (default, notebook)
    #[arg(short, long)]
    theme: Option<String>,
}

// ══════════════════════════════════════════════════════════════════════════
// Main Entry Point
// ══════════════════════════════════════════════════════════════════════════

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Load config, with CLI overrides
    let mut config = Config::load().unwrap_or_default();
    if let Some(theme) = args.theme {
        config.theme = theme;
    }

    // Seed the session deck
    let mut deck = DeckController::new(models::starter_cards());
    if config.shuffle_on_start && !args.no_shuffle {
        deck.shuffle(&mut rand::thread_rng());
    }
    info!("session started with {} cards", deck.len());

    // Run TUI
    run_tui(deck, config)
}

fn run_tui(deck: DeckController, config: Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(deck, config);

    // Run main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {}", err);
        return Err(err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| app.render(frame))?;
        app.handle_events()?;
    }
    Ok(())
}
