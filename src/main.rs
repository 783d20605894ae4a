//! launchpad: a terminal dashboard for launching developer projects.
//!
//! This is the entry point of the application. It parses command-line
//! arguments, loads the project catalog, and runs the event loop until the
//! user quits. Launches requested from the table are dispatched to the
//! launcher and their outcomes surfaced on the status line.

mod app;
mod events;
mod launcher;
mod project;
mod store;
mod tui;
mod view;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;

use crate::app::{App, AppAction};
use crate::events::Event;
use crate::store::CatalogStore;

/// Command-line interface definition.
#[derive(Debug, Parser)]
#[command(
    name = "launchpad",
    version,
    about = "Terminal dashboard for launching developer projects"
)]
struct Cli {
    /// Path to the catalog file (defaults to ~/.config/launchpad/projects.json).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // The home directory is the one thing there is no sensible default for;
    // failing to resolve it is fatal before the terminal is touched.
    let path = match cli.config {
        Some(path) => path,
        None => store::default_path()?,
    };
    let store = CatalogStore::new(path);
    let mut app = App::new(store.load(), store);

    let (event_tx, mut event_rx) = mpsc::channel(64);
    spawn_input_listener(event_tx.clone());
    spawn_signal_listener(event_tx);

    let mut terminal = tui::init_terminal()?;
    if let Ok((width, height)) = crossterm::terminal::size() {
        app.handle_resize(width, height);
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(150));
    let result = loop {
        if let Err(err) = tui::draw(&mut app, &mut terminal) {
            break Err(err.into());
        }
        tokio::select! {
            Some(event) = event_rx.recv() => match event {
                Event::Key(key) => match app.handle_key(key) {
                    AppAction::Launch(project) => app.report(launcher::launch(&project)),
                    AppAction::OpenLink(project) => app.report(launcher::open_link(&project)),
                    AppAction::Quit | AppAction::None => {}
                },
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize { width, height } => app.handle_resize(width, height),
                Event::Shutdown => app.should_quit = true,
            },
            // The tick only re-enters draw so expired status messages clear.
            _ = ticker.tick() => {}
        }
        if app.should_quit {
            break Ok(());
        }
    };

    tui::restore_terminal(terminal)?;
    result
}

fn spawn_input_listener(tx: mpsc::Sender<Event>) {
    std::thread::spawn(move || loop {
        if crossterm::event::poll(Duration::from_millis(100)).unwrap_or(false) {
            match crossterm::event::read() {
                Ok(crossterm::event::Event::Key(key)) => {
                    let _ = tx.blocking_send(Event::Key(key));
                }
                Ok(crossterm::event::Event::Mouse(mouse)) => {
                    let _ = tx.blocking_send(Event::Mouse(mouse));
                }
                Ok(crossterm::event::Event::Resize(width, height)) => {
                    let _ = tx.blocking_send(Event::Resize { width, height });
                }
                _ => {}
            }
        }
    });
}

fn spawn_signal_listener(tx: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(_) => return,
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
            let _ = tx.send(Event::Shutdown).await;
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            let _ = tx.send(Event::Shutdown).await;
        }
    });
}
