// this_file: fontpick/src/tui/state.rs
//
// Browser state and key handling, kept free of terminal I/O

use std::{path::PathBuf, sync::Arc};

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::catalog::{Catalog, FontEntry};
use crate::installer::{InstallEvent, InstallResult};

/// Which pane receives typed keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Message shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    fn info(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            message: message.into(),
        }
    }

    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Install(String),
}

/// Messages from the background install thread
#[derive(Debug)]
pub enum BrowserEvent {
    Progress(InstallEvent),
    Finished {
        id: String,
        outcome: Result<InstallResult, String>,
    },
}

/// Everything the browser screen shows
pub struct BrowserState {
    catalog: Arc<Catalog>,
    /// Search box, edited in place
    pub query: Input,
    /// Catalog entries matching `query`, in catalog order
    pub matches: Vec<FontEntry>,
    /// Highlighted row in `matches`
    pub selected: usize,
    pub focus: Focus,
    pub status: Status,
    /// Font currently being installed
    pub installing: Option<String>,
    files_total: usize,
    files_done: usize,
    /// `owner/name` of the source repository
    pub repository: String,
    /// Resolved install directory, if the platform has one
    pub font_dir: Option<PathBuf>,
}

impl BrowserState {
    pub fn new(catalog: Arc<Catalog>, repository: String, font_dir: Option<PathBuf>) -> Self {
        let matches = catalog.list().to_vec();
        Self {
            catalog,
            query: Input::default(),
            matches,
            selected: 0,
            focus: Focus::List,
            status: Status::info("Ready. Select a font to view details."),
            installing: None,
            files_total: 0,
            files_done: 0,
            repository,
            font_dir,
        }
    }

    /// Entry under the cursor
    pub fn selected_entry(&self) -> Option<&FontEntry> {
        self.matches.get(self.selected)
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::List => self.handle_list_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => self.focus = Focus::List,
            KeyCode::Down => self.move_down(),
            KeyCode::Up => self.move_up(),
            _ => {
                // Editing and cursor movement belong to the input widget
                if let Some(change) = self.query.handle_event(&Event::Key(key)) {
                    if change.value {
                        self.refilter();
                    }
                }
            }
        }
        Action::None
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Action::Quit,
            KeyCode::Char('/') | KeyCode::Tab => self.focus = Focus::Search,
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.matches.len().saturating_sub(1)
            }
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('i') | KeyCode::Enter => return self.request_install(),
            _ => {}
        }
        Action::None
    }

    fn move_down(&mut self) {
        if self.selected + 1 < self.matches.len() {
            self.selected += 1;
        }
    }

    fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn refilter(&mut self) {
        self.matches = self
            .catalog
            .filter(self.query.value())
            .into_iter()
            .cloned()
            .collect();
        self.selected = 0;
    }

    /// Clear the search and show the whole catalog again
    fn reset(&mut self) {
        self.query.reset();
        self.refilter();
        self.status = Status::info("Font list refreshed");
    }

    fn request_install(&mut self) -> Action {
        if let Some(current) = &self.installing {
            self.status = Status::error(format!("Already installing {}", current));
            return Action::None;
        }

        let Some(entry) = self.selected_entry() else {
            self.status = Status::error("Please select a font first");
            return Action::None;
        };

        let id = entry.id.clone();
        self.installing = Some(id.clone());
        self.files_total = 0;
        self.files_done = 0;
        self.status = Status::info(format!("Installing {}...", id));
        Action::Install(id)
    }

    /// Apply a message from the install thread
    pub fn apply(&mut self, event: BrowserEvent) {
        match event {
            BrowserEvent::Progress(progress) => self.apply_progress(progress),
            BrowserEvent::Finished { id, outcome } => {
                self.installing = None;
                self.status = match outcome {
                    Ok(result) => {
                        let mut message = format!(
                            "✓ Installed {} of {} font file(s) for {}",
                            result.installed_paths.len(),
                            result.expected_files,
                            id
                        );
                        if let Some(warning) = result.warnings.first() {
                            message.push_str(&format!(" ({})", warning));
                        }
                        Status::success(message)
                    }
                    Err(e) => Status::error(format!("✗ {}", e)),
                };
            }
        }
    }

    fn apply_progress(&mut self, progress: InstallEvent) {
        let Some(id) = self.installing.clone() else {
            return;
        };

        let message = match progress {
            InstallEvent::ResolvingTarget => format!("Installing {}: preparing font directory", id),
            InstallEvent::ListingRemote => format!("Installing {}: listing files", id),
            InstallEvent::Downloading { total } => {
                self.files_total = total;
                format!("Installing {}: downloading 0/{}", id, total)
            }
            InstallEvent::FileFinished { total, .. } => {
                self.files_done += 1;
                format!("Installing {}: downloading {}/{}", id, self.files_done, total)
            }
            InstallEvent::RefreshingCache => format!("Installing {}: refreshing font cache", id),
            InstallEvent::Done => return,
        };
        self.status = Status::info(message);
    }

    /// Download progress as (done, total)
    pub fn progress(&self) -> (usize, usize) {
        (self.files_done, self.files_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> BrowserState {
        let catalog = Arc::new(Catalog::new(["Fira Code", "JetBrains Mono", "Hack"]));
        BrowserState::new(catalog, "ProgrammingFonts/ProgrammingFonts".to_string(), None)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(state: &mut BrowserState, text: &str) {
        for c in text.chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn ids(state: &BrowserState) -> Vec<&str> {
        state.matches.iter().map(|entry| entry.id.as_str()).collect()
    }

    #[test]
    fn test_search_filters_live() {
        let mut state = state();
        state.handle_key(key(KeyCode::Char('/')));
        assert_eq!(state.focus, Focus::Search);

        type_text(&mut state, "Code");
        assert_eq!(ids(&state), vec!["Fira Code"]);

        state.handle_key(key(KeyCode::Backspace));
        state.handle_key(key(KeyCode::Backspace));
        state.handle_key(key(KeyCode::Backspace));
        assert_eq!(state.query.value(), "C");
        assert_eq!(ids(&state), vec!["Fira Code", "Hack"]);

        // Typing 'q' while searching edits the query instead of quitting
        assert_eq!(state.handle_key(key(KeyCode::Char('q'))), Action::None);
        assert!(state.matches.is_empty());
        assert!(state.selected_entry().is_none());
    }

    #[test]
    fn test_search_query_is_editable_in_the_middle() {
        let mut state = state();
        state.handle_key(key(KeyCode::Char('/')));
        type_text(&mut state, "Hck");

        state.handle_key(key(KeyCode::Left));
        state.handle_key(key(KeyCode::Left));
        assert_eq!(state.query.visual_cursor(), 1);
        type_text(&mut state, "a");
        assert_eq!(state.query.value(), "Hack");
        assert_eq!(ids(&state), vec!["Hack"]);

        state.handle_key(key(KeyCode::Home));
        state.handle_key(key(KeyCode::Delete));
        assert_eq!(state.query.value(), "ack");
        assert_eq!(ids(&state), vec!["Hack"]);

        // Cursor-only moves keep the selection
        state.handle_key(key(KeyCode::End));
        assert_eq!(state.query.visual_cursor(), 3);
        assert_eq!(state.focus, Focus::Search);
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut state = state();
        state.handle_key(key(KeyCode::Char('k')));
        assert_eq!(state.selected, 0);

        for _ in 0..5 {
            state.handle_key(key(KeyCode::Char('j')));
        }
        assert_eq!(state.selected, 2);
        assert_eq!(state.selected_entry().unwrap().id, "Hack");

        state.handle_key(key(KeyCode::Home));
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_reset_restores_full_list() {
        let mut state = state();
        state.handle_key(key(KeyCode::Char('/')));
        type_text(&mut state, "hack");
        state.handle_key(key(KeyCode::Esc));
        assert_eq!(state.focus, Focus::List);
        assert_eq!(ids(&state), vec!["Hack"]);

        state.handle_key(key(KeyCode::Char('r')));
        assert_eq!(state.query.value(), "");
        assert_eq!(state.matches.len(), 3);
        assert_eq!(state.status.message, "Font list refreshed");
    }

    #[test]
    fn test_install_request_and_completion() {
        let mut state = state();
        state.handle_key(key(KeyCode::Down));

        let action = state.handle_key(key(KeyCode::Char('i')));
        assert_eq!(action, Action::Install("JetBrains Mono".to_string()));
        assert_eq!(state.installing.as_deref(), Some("JetBrains Mono"));

        // A second request while busy is refused
        assert_eq!(state.handle_key(key(KeyCode::Enter)), Action::None);
        assert_eq!(state.status.kind, StatusKind::Error);

        state.apply(BrowserEvent::Progress(InstallEvent::Downloading { total: 2 }));
        state.apply(BrowserEvent::Progress(InstallEvent::FileFinished {
            index: 1,
            total: 2,
            name: "b.ttf".to_string(),
            ok: true,
        }));
        assert_eq!(state.progress(), (1, 2));
        assert!(state.status.message.contains("downloading 1/2"));

        state.apply(BrowserEvent::Finished {
            id: "JetBrains Mono".to_string(),
            outcome: Ok(InstallResult {
                font: "JetBrains Mono".to_string(),
                directory: PathBuf::from("/fonts"),
                installed_paths: vec![PathBuf::from("/fonts/a.ttf"), PathBuf::from("/fonts/b.ttf")],
                expected_files: 2,
                failures: Vec::new(),
                cache_refreshed: true,
                warnings: Vec::new(),
            }),
        });
        assert!(state.installing.is_none());
        assert_eq!(state.status.kind, StatusKind::Success);
        assert_eq!(
            state.status.message,
            "✓ Installed 2 of 2 font file(s) for JetBrains Mono"
        );
    }

    #[test]
    fn test_install_failure_status() {
        let mut state = state();
        state.handle_key(key(KeyCode::Enter));
        state.apply(BrowserEvent::Finished {
            id: "Fira Code".to_string(),
            outcome: Err("Network error: timed out".to_string()),
        });
        assert_eq!(state.status.kind, StatusKind::Error);
        assert_eq!(state.status.message, "✗ Network error: timed out");
    }

    #[test]
    fn test_install_with_empty_matches() {
        let mut state = state();
        state.handle_key(key(KeyCode::Char('/')));
        type_text(&mut state, "zzz");
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.handle_key(key(KeyCode::Char('i'))), Action::None);
        assert_eq!(state.status.message, "Please select a font first");
    }

    #[test]
    fn test_quit_keys() {
        let mut state = state();
        assert_eq!(state.handle_key(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(state.handle_key(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(
            state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }
}
