// this_file: fontpick/src/tui/mod.rs
//
// Interactive font browser

mod state;
mod ui;

use std::{
    sync::{mpsc, Arc},
    thread,
    time::Duration,
};

use log::debug;
use ratatui::{
    crossterm::event::{self, Event, KeyEventKind},
    DefaultTerminal,
};

use crate::{catalog::Catalog, config::Config, installer::Installer, FontpickError, Result};
use state::{Action, BrowserEvent, BrowserState};

/// Run the browser until the user quits
pub fn run(catalog: Arc<Catalog>, config: &Config) -> Result<()> {
    let installer = Arc::new(Installer::from_config(catalog.clone(), config)?);
    let font_dir = installer.target().ok().map(|target| target.directory);
    let mut state = BrowserState::new(catalog, config.repository(), font_dir);

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut state, &installer);
    ratatui::restore();
    result
}

fn ui_error(err: std::io::Error) -> FontpickError {
    FontpickError::Ui(err.to_string())
}

/// Draw, drain install progress, then wait briefly for a key
fn event_loop(
    terminal: &mut DefaultTerminal,
    state: &mut BrowserState,
    installer: &Arc<Installer>,
) -> Result<()> {
    let (event_tx, event_rx) = mpsc::channel();

    loop {
        terminal
            .draw(|frame| ui::render(frame, state))
            .map_err(ui_error)?;

        while let Ok(message) = event_rx.try_recv() {
            state.apply(message);
        }

        if !event::poll(Duration::from_millis(50)).map_err(ui_error)? {
            continue;
        }

        if let Event::Key(key) = event::read().map_err(ui_error)? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match state.handle_key(key) {
                Action::Quit => break,
                Action::Install(id) => spawn_install(installer.clone(), id, event_tx.clone()),
                Action::None => {}
            }
        }
    }

    Ok(())
}

/// Install on a background thread so the screen keeps redrawing
fn spawn_install(installer: Arc<Installer>, id: String, tx: mpsc::Sender<BrowserEvent>) {
    debug!("Starting install of {}", id);
    thread::spawn(move || {
        let progress_tx = tx.clone();
        let observer = move |progress| {
            let _ = progress_tx.send(BrowserEvent::Progress(progress));
        };
        let outcome = installer
            .install_with_progress(&id, &observer)
            .map_err(|e| e.to_string());
        let _ = tx.send(BrowserEvent::Finished { id, outcome });
    });
}
