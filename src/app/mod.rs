// App module - split into submodules
// - mod.rs: App struct, constructors, accessors
// - event_loop.rs: main run() loop and backend-event polling
// - handlers.rs: action dispatch and backend-call spawning
// - rendering.rs: UI drawing

mod event_loop;
mod handlers;
mod rendering;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Instant;

use arboard::Clipboard;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::api::BackendClient;
use crate::cli::Cli;
use crate::components::input_box::InputBox;
use crate::components::lang_bar::{self, LangBar};
use crate::components::output_view::OutputView;
use crate::components::saved_models::SavedModelsList;
use crate::components::settings_modal::SettingsModal;
use crate::error::{AppError, Result};
use crate::event::BackendEvent;
use crate::prefs::Prefs;
use crate::session::ActiveModel;

pub(super) const TICK_INTERVAL_MS: u64 = 250;
/// How long a status-bar notice stays up.
pub(super) const STATUS_TTL_MS: u64 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusArea {
    Input,
    Output,
    SavedModels,
    LangBar,
}

impl FocusArea {
    const ORDER: [FocusArea; 4] = [
        FocusArea::Input,
        FocusArea::Output,
        FocusArea::SavedModels,
        FocusArea::LangBar,
    ];

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> FocusArea {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> FocusArea {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    should_quit: bool,
    needs_redraw: bool,
    focus: FocusArea,

    api: BackendClient,
    backend_tx: mpsc::UnboundedSender<BackendEvent>,
    backend_rx: mpsc::UnboundedReceiver<BackendEvent>,

    /// The effective engine/model/key triple translations run with.
    active: ActiveModel,

    input_box: InputBox,
    output_view: OutputView,
    lang_bar: LangBar,
    saved_models: SavedModelsList,
    settings: SettingsModal,

    clipboard: Option<Clipboard>,
    prefs: Prefs,
    prefs_path: Option<PathBuf>,
    status: Option<(String, Instant)>,
    last_tick: Instant,
    terminal_restored: bool,
}

impl App {
    pub fn with_cli(cli: &Cli) -> Result<Self> {
        let api = BackendClient::new(&cli.server)?;

        let prefs_path = Prefs::default_path().ok();
        let mut prefs = prefs_path
            .as_deref()
            .map(|path| {
                Prefs::load(path).unwrap_or_else(|e| {
                    tracing::warn!("Falling back to default prefs: {e}");
                    Prefs::default()
                })
            })
            .unwrap_or_default();
        if !lang_bar::is_known_lang(&prefs.target_lang) {
            prefs.target_lang = Prefs::default().target_lang;
        }
        if let Some(lang) = cli.target_lang.as_deref() {
            if lang_bar::is_known_lang(lang) {
                prefs.target_lang = lang.to_string();
            } else {
                tracing::warn!("Ignoring unknown target language {lang:?}");
            }
        }

        enable_raw_mode().map_err(|e| AppError::Terminal(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
            .map_err(|e| AppError::Terminal(e.to_string()))?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(|e| AppError::Terminal(e.to_string()))?;

        let clipboard = Clipboard::new().ok();
        let (backend_tx, backend_rx) = mpsc::unbounded_channel();
        let lang_bar = LangBar::new(&prefs.target_lang);

        Ok(Self {
            terminal,
            should_quit: false,
            needs_redraw: true,
            focus: FocusArea::Input,
            api,
            backend_tx,
            backend_rx,
            active: ActiveModel::default(),
            input_box: InputBox::new(),
            output_view: OutputView::new(),
            lang_bar,
            saved_models: SavedModelsList::new(),
            settings: SettingsModal::new(),
            clipboard,
            prefs,
            prefs_path,
            status: None,
            last_tick: Instant::now(),
            terminal_restored: false,
        })
    }

    /// Kick off the startup loads: server config plus saved models, fetched
    /// concurrently and applied together.
    pub fn bootstrap(&mut self) {
        self.spawn_registry_refresh();
    }

    pub(super) fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    pub(super) fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some((text.into(), Instant::now()));
        self.mark_dirty();
    }

    pub(super) fn restore_terminal(&mut self) -> Result<()> {
        if self.terminal_restored {
            return Ok(());
        }
        self.terminal_restored = true;
        disable_raw_mode().map_err(|e| AppError::Terminal(e.to_string()))?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )
        .map_err(|e| AppError::Terminal(e.to_string()))?;
        self.terminal
            .show_cursor()
            .map_err(|e| AppError::Terminal(e.to_string()))?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
