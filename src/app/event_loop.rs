// Event loop - main run() method and backend-event polling

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyModifiers};

use super::{App, FocusArea, TICK_INTERVAL_MS};
use crate::action::Action;
use crate::components::Component;
use crate::error::{AppError, Result};

impl App {
    /// Drain completed backend calls. Returns true if anything arrived.
    fn poll_backend_events(&mut self) -> bool {
        let mut had_events = false;
        while let Ok(event) = self.backend_rx.try_recv() {
            had_events = true;
            self.handle_backend(event);
        }
        had_events
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            // ---- 1. Poll non-input sources ----

            if self.poll_backend_events() {
                self.mark_dirty();
            }

            if self.last_tick.elapsed() >= Duration::from_millis(TICK_INTERVAL_MS) {
                self.dispatch(Action::Tick);
                self.last_tick = Instant::now();
            }

            if self.should_quit {
                break;
            }

            // ---- 2. Poll user input ----

            if event::poll(Duration::from_millis(16))
                .map_err(|e| AppError::Terminal(e.to_string()))?
            {
                let event = event::read().map_err(|e| AppError::Terminal(e.to_string()))?;
                self.mark_dirty();
                if let Some(action) = self.handle_event(&event) {
                    self.dispatch(action);
                }
            }

            if self.should_quit {
                break;
            }

            // ---- 3. Draw once if anything changed ----

            if self.needs_redraw {
                self.draw()?;
                self.needs_redraw = false;
            }
        }

        self.restore_terminal()
    }

    /// Route an input event: the settings overlay claims everything while
    /// open; otherwise global bindings run first, then the focused
    /// component.
    pub(super) fn handle_event(&mut self, event: &CrosstermEvent) -> Option<Action> {
        if matches!(event, CrosstermEvent::Resize(..)) {
            return None;
        }

        if self.settings.session.open {
            return self.settings.handle_event(event);
        }

        if let CrosstermEvent::Key(key) = event {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('c') => return Some(Action::Quit),
                    KeyCode::Char('t') => return Some(Action::Translate),
                    KeyCode::Char('o') => return Some(Action::OpenSettings),
                    KeyCode::Char('x') => return Some(Action::SwapTexts),
                    KeyCode::Char('y') => return Some(Action::CopyOutput),
                    _ => {}
                }
            }
            match key.code {
                KeyCode::Tab => return Some(Action::FocusNext),
                KeyCode::BackTab => return Some(Action::FocusPrev),
                _ => {}
            }
        }

        match self.focus {
            FocusArea::Input => self.input_box.handle_event(event),
            FocusArea::Output => self.output_view.handle_event(event),
            FocusArea::SavedModels => self.saved_models.handle_event(event),
            FocusArea::LangBar => self.lang_bar.handle_event(event),
        }
    }
}
