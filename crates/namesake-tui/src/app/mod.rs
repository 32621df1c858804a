//! Main application state and logic.

mod constants;
pub mod input;
mod render;
mod rows;
mod scanning;
pub mod state;

use std::path::PathBuf;
use std::time::Duration;

use color_eyre::eyre::WrapErr;
use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use namesake_core::{FilterParams, ScanConfig, ScanProgress, Session};
use namesake_scan::ProjectHost;

use crate::TuiConfig;
use crate::event::KeyAction;
use crate::theme::Theme;

use self::constants::TICK_INTERVAL_MS;
use self::input::{InputResult, InputState};
use self::render::{RenderContext, render_app};
use self::rows::{build_rows, member_window};
use self::state::{AppMode, Row, ScanResult, StatusMessage, UserSettings};

/// Application result type.
pub type AppResult<T> = color_eyre::Result<T>;

/// Main application state.
pub struct App {
    /// Project root.
    path: PathBuf,
    /// Scan configuration, kept to reopen the project after a lost scan.
    scan_config: ScanConfig,
    /// Current mode.
    mode: AppMode,
    /// Color theme.
    theme: Theme,
    /// The session; `None` while it is away in a background scan.
    session: Option<Session<ProjectHost>>,
    /// Cursor row within the current page.
    cursor: usize,
    /// Input state for rename/search modes.
    input_state: Option<InputState>,
    /// Last command result.
    status: Option<StatusMessage>,
    /// Current scan progress (for display during scanning).
    scan_progress: Option<ScanProgress>,
    /// Channel for receiving scan results.
    scan_rx: Option<mpsc::Receiver<ScanResult>>,
    /// Flag indicating UI needs redraw.
    needs_redraw: bool,
    /// User settings (persistent configuration).
    user_settings: UserSettings,
}

impl App {
    /// Open the project described by `config`.
    pub fn new(config: TuiConfig) -> AppResult<Self> {
        let host = ProjectHost::open(config.scan.clone())
            .wrap_err_with(|| format!("cannot open project {}", config.scan.root.display()))?;
        let path = host.root().to_path_buf();

        let session = Session::new(host, config.scan.clone())
            .with_filter(FilterParams::new(config.duplicates_only, ""));

        Ok(Self {
            path,
            scan_config: config.scan,
            mode: AppMode::default(),
            theme: Theme::from_variant(config.theme),
            session: Some(session),
            cursor: 0,
            input_state: None,
            status: None,
            scan_progress: None,
            scan_rx: None,
            needs_redraw: true,
            user_settings: UserSettings::load(),
        })
    }

    /// Run the application with async event loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> AppResult<()> {
        self.start_scan();

        let period = Duration::from_millis(TICK_INTERVAL_MS);
        let mut interval = tokio::time::interval(period);
        let mut events = EventStream::new();

        while self.mode != AppMode::Quit {
            if self.needs_redraw {
                self.resolve_visible_thumbnails();
                terminal.draw(|frame| self.render(frame))?;
                self.needs_redraw = false;
            }

            tokio::select! {
                biased;

                Some(Ok(event)) = events.next() => {
                    if let Event::Key(key_event) = event {
                        self.handle_key_event(key_event);
                    }

                    // Drain any additional pending events
                    while self.mode != AppMode::Quit && crossterm::event::poll(Duration::ZERO)? {
                        if let Ok(Event::Key(key_event)) = crossterm::event::read() {
                            self.handle_key_event(key_event);
                        }
                    }
                    self.needs_redraw = true;
                }

                Some(result) = async {
                    if let Some(rx) = &mut self.scan_rx {
                        rx.recv().await
                    } else {
                        std::future::pending().await
                    }
                } => {
                    self.handle_scan_result(result);
                    self.needs_redraw = true;
                }

                _ = interval.tick() => {}
            }
        }

        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }
        match self.mode {
            AppMode::Search | AppMode::Renaming => self.handle_input_event(key_event),
            _ => {
                let action = KeyAction::from_key_event(key_event);
                self.handle_action(action);
            }
        }
    }

    /// Move the session into a background rescan.
    fn start_scan(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.scan_progress = Some(ScanProgress::default());
        self.cursor = 0;
        self.scan_rx = Some(scanning::start_scan(session));
    }

    fn is_scanning(&self) -> bool {
        self.session.is_none()
    }

    /// Handle a scan result from the background task.
    fn handle_scan_result(&mut self, result: ScanResult) {
        match result {
            ScanResult::Progress(progress) => {
                self.scan_progress = Some(progress);
            }
            ScanResult::Complete { session, result } => {
                self.session = Some(*session);
                self.scan_rx = None;
                self.scan_progress = None;
                self.cursor = 0;
                self.status = Some(match result {
                    Ok(groups) => {
                        info!(groups, "scan finished");
                        StatusMessage::ok(format!("Found {groups} names"))
                    }
                    Err(e) => {
                        warn!(error = %e, "scan failed");
                        StatusMessage::error(format!("Scan failed: {e}"))
                    }
                });
            }
            ScanResult::Failed(e) => {
                self.scan_rx = None;
                self.scan_progress = None;
                self.status = Some(StatusMessage::error(format!("Scan failed: {e}")));
                self.reopen();
            }
        }
    }

    /// Recreate an empty session after the previous one was lost.
    fn reopen(&mut self) {
        match ProjectHost::open(self.scan_config.clone()) {
            Ok(host) => {
                let params = FilterParams::new(self.user_settings.duplicates_only, "");
                self.session =
                    Some(Session::new(host, self.scan_config.clone()).with_filter(params));
            }
            Err(e) => {
                self.status = Some(StatusMessage::error(format!("Cannot reopen project: {e}")));
                self.mode = AppMode::Quit;
            }
        }
    }

    /// Render the application.
    fn render(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    /// Rows of the current page.
    fn rows(&self) -> Vec<Row> {
        self.session
            .as_ref()
            .map(|s| build_rows(&s.current_entries()))
            .unwrap_or_default()
    }

    fn current_row(&self) -> Option<Row> {
        self.rows().into_iter().nth(self.cursor)
    }

    fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Resolve thumbnails for members about to be drawn.
    fn resolve_visible_thumbnails(&mut self) {
        let rows = self.rows();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for row in rows {
            if let Row::Member { key, index } = row {
                if let Err(e) = session.thumbnail(&key, index) {
                    debug!(key = %key, index, error = %e, "thumbnail unavailable");
                }
            }
        }
    }

    /// Handle a key action.
    fn handle_action(&mut self, action: KeyAction) {
        if self.mode == AppMode::Help {
            if matches!(
                action,
                KeyAction::ToggleHelp | KeyAction::Quit | KeyAction::Cancel
            ) {
                self.mode = AppMode::Normal;
            }
            return;
        }

        match action {
            KeyAction::Quit | KeyAction::ForceQuit => {
                self.mode = AppMode::Quit;
                return;
            }
            KeyAction::ToggleHelp => {
                self.mode = AppMode::Help;
                return;
            }
            KeyAction::ToggleTheme => {
                self.toggle_theme();
                return;
            }
            KeyAction::Cancel => {
                self.status = None;
                return;
            }
            _ => {}
        }

        // Everything else needs the session
        if self.is_scanning() {
            return;
        }

        match action {
            KeyAction::MoveUp => self.move_up(),
            KeyAction::MoveDown => self.move_down(),
            KeyAction::JumpToTop => self.cursor = 0,
            KeyAction::JumpToBottom => self.cursor = self.rows().len().saturating_sub(1),
            KeyAction::Collapse => self.set_expanded(false),
            KeyAction::Expand => self.set_expanded(true),
            KeyAction::ToggleExpand => self.toggle_expanded(),
            KeyAction::PrevPage => self.change_page(false),
            KeyAction::NextPage => self.change_page(true),
            KeyAction::ToggleSelect => self.toggle_select(),
            KeyAction::Rename => self.start_rename(),
            KeyAction::Search => self.start_search(),
            KeyAction::ResetSearch => self.reset_search(),
            KeyAction::ToggleDuplicates => self.toggle_duplicates(),
            KeyAction::Rescan => self.start_scan(),
            _ => {}
        }
    }

    fn move_up(&mut self) {
        if let Some(Row::Member { key, index }) = self.current_row() {
            if let Some(session) = self.session.as_mut() {
                if let Some(members) = session.groups().get(&key) {
                    let scroll = session.view().get(&key).map_or(0, |ui| ui.scroll);
                    let window = member_window(members.len(), scroll);
                    if index == window.start && window.start > 0 {
                        if let Err(e) = session.set_scroll(&key, window.start - 1) {
                            self.status = Some(StatusMessage::error(e.to_string()));
                        }
                        return;
                    }
                }
            }
        }
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_down(&mut self) {
        if let Some(Row::Member { key, index }) = self.current_row() {
            if let Some(session) = self.session.as_mut() {
                if let Some(members) = session.groups().get(&key) {
                    let len = members.len();
                    let scroll = session.view().get(&key).map_or(0, |ui| ui.scroll);
                    let window = member_window(len, scroll);
                    if index + 1 == window.end && window.end < len {
                        if let Err(e) = session.set_scroll(&key, window.start + 1) {
                            self.status = Some(StatusMessage::error(e.to_string()));
                        }
                        return;
                    }
                }
            }
        }
        let len = self.rows().len();
        self.cursor = (self.cursor + 1).min(len.saturating_sub(1));
    }

    fn set_expanded(&mut self, expanded: bool) {
        let Some(row) = self.current_row() else {
            return;
        };
        let key = row.key().clone();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(e) = session.set_expanded(&key, expanded) {
            self.status = Some(StatusMessage::error(e.to_string()));
            return;
        }
        if !expanded {
            // Land on the header of the collapsed group
            if let Some(pos) = self
                .rows()
                .iter()
                .position(|r| matches!(r, Row::Group { key: k } if *k == key))
            {
                self.cursor = pos;
            }
        }
    }

    fn toggle_expanded(&mut self) {
        let Some(row) = self.current_row() else {
            return;
        };
        let expanded = self
            .session
            .as_ref()
            .and_then(|s| s.view().get(row.key()))
            .is_some_and(|ui| ui.expanded);
        self.set_expanded(!expanded);
    }

    fn change_page(&mut self, forward: bool) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let moved = if forward {
            session.next_page()
        } else {
            session.prev_page()
        };
        if moved {
            self.cursor = 0;
        }
    }

    /// Space: flip a member, or the whole group on a header row.
    fn toggle_select(&mut self) {
        let Some(row) = self.current_row() else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let result = match &row {
            Row::Member { key, index } => session.toggle_selected(key, *index).map(|_| ()),
            Row::Group { key } => {
                let all = session
                    .groups()
                    .get(key)
                    .is_some_and(|m| m.iter().all(|r| r.is_selected()));
                session.select_all(key, !all)
            }
        };
        if let Err(e) = result {
            self.status = Some(StatusMessage::error(e.to_string()));
        }
    }

    /// Start rename for the group under the cursor.
    fn start_rename(&mut self) {
        let Some(row) = self.current_row() else {
            return;
        };
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let key = row.key().clone();

        let any_selected = session
            .groups()
            .get(&key)
            .is_some_and(|m| m.iter().any(|r| r.is_selected()));
        if !any_selected {
            self.status = Some(StatusMessage::error(format!(
                "Select members of {key} with Space first"
            )));
            return;
        }

        let pending = session
            .view()
            .get(&key)
            .map(|ui| ui.pending_name.clone())
            .unwrap_or_default();
        let mut input = InputState::with_initial(&pending);
        input.context_key = Some(key);
        self.input_state = Some(input);
        self.mode = AppMode::Renaming;
    }

    fn start_search(&mut self) {
        let current = self
            .session
            .as_ref()
            .map(|s| s.params().search.clone())
            .unwrap_or_default();
        self.input_state = Some(InputState::with_initial(&current));
        self.mode = AppMode::Search;
    }

    /// Handle key events in input modes (Renaming, Search).
    fn handle_input_event(&mut self, key: KeyEvent) {
        let Some(input) = self.input_state.as_mut() else {
            self.mode = AppMode::Normal;
            return;
        };

        match input.handle_key(key) {
            InputResult::Continue => {}
            InputResult::Cancel => {
                self.input_state = None;
                self.mode = AppMode::Normal;
            }
            InputResult::Submit(value) => match self.mode {
                AppMode::Renaming => {
                    if let Err(reason) = input.validate_base_name() {
                        // Keep the modal open so the name can be fixed
                        input.set_error(reason);
                        return;
                    }
                    let key = input.context_key.clone();
                    self.input_state = None;
                    self.mode = AppMode::Normal;
                    if let Some(key) = key {
                        self.execute_rename(&key, value);
                    }
                }
                AppMode::Search => {
                    self.input_state = None;
                    self.mode = AppMode::Normal;
                    self.apply_search(value);
                }
                _ => {
                    self.input_state = None;
                    self.mode = AppMode::Normal;
                }
            },
        }
    }

    fn execute_rename(&mut self, key: &str, new_base_name: String) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let result = session
            .set_pending_name(key, new_base_name)
            .and_then(|()| session.rename_selected(key));

        self.status = Some(match result {
            Ok(outcome) if outcome.renamed.is_empty() => {
                StatusMessage::ok(format!("{key} already has that name"))
            }
            Ok(outcome) => {
                let merged = if outcome.merged { " (merged)" } else { "" };
                StatusMessage::ok(format!(
                    "Renamed {} to {}{merged}",
                    outcome.renamed.len(),
                    outcome.target_key
                ))
            }
            Err(e) => StatusMessage::error(e.to_string()),
        });
        self.clamp_cursor();
    }

    fn apply_search(&mut self, term: String) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.search(term);
        self.cursor = 0;
        self.status = Some(StatusMessage::ok(format!(
            "{} matching names",
            session.view().len()
        )));
    }

    fn reset_search(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        // Always re-filter; this also drops groups a rename left behind
        session.reset_search();
        self.cursor = 0;
        self.status = Some(StatusMessage::ok(format!(
            "Search cleared, {} names",
            session.view().len()
        )));
    }

    fn toggle_duplicates(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let on = session.toggle_duplicates_only();
        self.cursor = 0;
        self.status = Some(StatusMessage::ok(if on {
            "Showing duplicates only"
        } else {
            "Showing all names"
        }));
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        self.user_settings.theme = self.theme.variant;
        if let Err(e) = self.user_settings.save() {
            warn!(error = %e, "could not save settings");
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.rows();
        let ctx = RenderContext {
            mode: self.mode,
            theme: &self.theme,
            path: &self.path,
            session: self.session.as_ref(),
            rows: &rows,
            cursor: self.cursor,
            scan_progress: self.scan_progress.as_ref(),
            status: self.status.as_ref(),
            input_state: self.input_state.as_ref(),
        };

        render_app(&ctx, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crossterm::event::{KeyCode, KeyModifiers};
    use tempfile::TempDir;

    use super::constants::MEMBER_WINDOW;
    use crate::theme::ThemeVariant;

    fn app_with(paths: &[&str]) -> (TempDir, App) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");
        for rel in paths {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"png").unwrap();
        }
        let mut app = App::new(TuiConfig {
            scan: ScanConfig::new(&root),
            duplicates_only: true,
            theme: ThemeVariant::Dark,
        })
        .unwrap();
        app.session.as_mut().unwrap().scan().unwrap();
        (temp, app)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_rename_from_keys() {
        let (temp, mut app) = app_with(&["Assets/a/icon.png", "Assets/b/icon.png"]);

        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.mode, AppMode::Renaming);
        assert_eq!(app.input_state.as_ref().unwrap().buffer(), "icon");

        app.handle_key_event(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        type_text(&mut app, "logo");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        let status = app.status.as_ref().unwrap();
        assert!(status.success, "{}", status.text);
        assert_eq!(status.text, "Renamed 1 to logo.png");

        let root = temp.path().join("project");
        assert!(root.join("Assets/a/logo.png").exists());
        assert!(root.join("Assets/b/icon.png").exists());

        let session = app.session.as_ref().unwrap();
        assert_eq!(session.groups().get("icon.png").unwrap().len(), 1);
        assert_eq!(session.groups().get("logo.png").unwrap().len(), 1);
    }

    #[test]
    fn test_rename_requires_selection() {
        let (_temp, mut app) = app_with(&["Assets/a/icon.png", "Assets/b/icon.png"]);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!app.status.as_ref().unwrap().success);
    }

    #[test]
    fn test_invalid_name_keeps_modal_open() {
        let (_temp, mut app) = app_with(&["Assets/a/icon.png", "Assets/b/icon.png"]);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('r'));
        type_text(&mut app, "/x");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Renaming);
        assert!(app.input_state.as_ref().unwrap().error().is_some());
    }

    #[test]
    fn test_search_and_duplicates_toggle() {
        let (_temp, mut app) = app_with(&[
            "Assets/a/icon.png",
            "Assets/b/icon.png",
            "Assets/a/logo.png",
            "Assets/b/logo.png",
            "Assets/c/solo.png",
        ]);
        assert_eq!(app.rows().len(), 2);

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "ICO");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.rows().len(), 1);
        assert_eq!(app.status.as_ref().unwrap().text, "1 matching names");

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.rows().len(), 3);
    }

    #[test]
    fn test_member_window_scrolls_from_keys() {
        let paths: Vec<String> = (0..10).map(|i| format!("Assets/{i}/b.png")).collect();
        let paths: Vec<&str> = paths.iter().map(String::as_str).collect();
        let (_temp, mut app) = app_with(&paths);
        let scroll = |app: &App| app.session.as_ref().unwrap().view().get("b.png").unwrap().scroll;

        press(&mut app, KeyCode::Char('l'));
        for _ in 0..MEMBER_WINDOW {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.cursor, MEMBER_WINDOW);
        assert_eq!(scroll(&app), 0);

        // At the bottom of the window the list scrolls instead of the cursor
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(scroll(&app), 2);
        assert_eq!(app.cursor, MEMBER_WINDOW);

        for _ in 0..MEMBER_WINDOW + 1 {
            press(&mut app, KeyCode::Char('k'));
        }
        assert_eq!(scroll(&app), 0);
        assert_eq!(app.cursor, 1);
        assert!(app.status.as_ref().is_none_or(|s| s.success));
    }

    fn view_keys(app: &App) -> Vec<String> {
        let session = app.session.as_ref().unwrap();
        session.view().keys().map(|k| k.to_string()).collect()
    }

    fn rename_first_member(app: &mut App, name: &str) {
        press(app, KeyCode::Char('g'));
        press(app, KeyCode::Char('l'));
        press(app, KeyCode::Char('j'));
        press(app, KeyCode::Char(' '));
        press(app, KeyCode::Char('r'));
        app.handle_key_event(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        type_text(app, name);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_reset_and_search_refilter_after_rename() {
        let (_temp, mut app) = app_with(&["Assets/a/b.png", "Assets/b/b.png", "Assets/c/b.png"]);

        rename_first_member(&mut app, "z");
        assert_eq!(view_keys(&app), vec!["b.png", "z.png"]);

        // Backspace with no active search still re-filters
        press(&mut app, KeyCode::Backspace);
        assert_eq!(view_keys(&app), vec!["b.png"]);

        rename_first_member(&mut app, "y");
        assert_eq!(view_keys(&app), vec!["b.png", "y.png"]);

        // Submitting the same empty term re-filters too
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(view_keys(&app), vec!["b.png"]);
        assert_eq!(app.mode, AppMode::Normal);
    }
}
