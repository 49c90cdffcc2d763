//! Settings overlay: API configuration and translation-mode panels.
//!
//! The overlay owns the [`SettingsSession`] state machine and the
//! translation-mode form; everything that needs a backend call is emitted as
//! an [`Action`] and handled by the app. Switching panels is a pure
//! visibility toggle, no data reload.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::action::Action;
use crate::components::Component;
use crate::modes::ModesForm;
use crate::session::{ModelList, SettingsPanel, SettingsSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiField {
    Engine,
    ApiKey,
    Fetch,
    Models,
    Save,
}

const API_FIELDS: [ApiField; 5] = [
    ApiField::Engine,
    ApiField::ApiKey,
    ApiField::Fetch,
    ApiField::Models,
    ApiField::Save,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModesField {
    Mode,
    Prompt,
    Thinking,
    Save,
    Reset,
}

const MODES_FIELDS: [ModesField; 5] = [
    ModesField::Mode,
    ModesField::Prompt,
    ModesField::Thinking,
    ModesField::Save,
    ModesField::Reset,
];

pub struct SettingsModal {
    pub session: SettingsSession,
    pub modes: ModesForm,
    api_focus: usize,
    modes_focus: usize,
}

impl SettingsModal {
    pub fn new() -> Self {
        Self {
            session: SettingsSession::default(),
            modes: ModesForm::default(),
            api_focus: 0,
            modes_focus: 0,
        }
    }

    pub fn set_modes(&mut self, modes: ModesForm) {
        self.modes = modes;
        self.modes_focus = 0;
    }

    /// Reset field focus when the overlay opens.
    pub fn reset_focus(&mut self) {
        self.api_focus = 0;
        self.modes_focus = 0;
    }

    fn api_field(&self) -> ApiField {
        API_FIELDS[self.api_focus]
    }

    fn modes_field(&self) -> ModesField {
        MODES_FIELDS[self.modes_focus]
    }

    /// True while keystrokes feed a text buffer, which claims digit keys.
    fn editing_text(&self) -> bool {
        match self.session.panel {
            SettingsPanel::ApiConfig => {
                self.api_field() == ApiField::ApiKey && !self.session.key_locked()
            }
            SettingsPanel::TranslationModes => self.modes_field() == ModesField::Prompt,
        }
    }

    fn focus_next(&mut self) {
        match self.session.panel {
            SettingsPanel::ApiConfig => {
                self.api_focus = (self.api_focus + 1) % API_FIELDS.len();
            }
            SettingsPanel::TranslationModes => {
                self.modes_focus = (self.modes_focus + 1) % MODES_FIELDS.len();
            }
        }
    }

    fn focus_prev(&mut self) {
        match self.session.panel {
            SettingsPanel::ApiConfig => {
                self.api_focus = (self.api_focus + API_FIELDS.len() - 1) % API_FIELDS.len();
            }
            SettingsPanel::TranslationModes => {
                self.modes_focus = (self.modes_focus + MODES_FIELDS.len() - 1) % MODES_FIELDS.len();
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => return Some(Action::CloseSettings),
            KeyCode::Tab => {
                self.focus_next();
                return None;
            }
            KeyCode::BackTab => {
                self.focus_prev();
                return None;
            }
            KeyCode::Char('1') if !self.editing_text() => {
                return Some(Action::ShowPanel(SettingsPanel::ApiConfig));
            }
            KeyCode::Char('2') if !self.editing_text() => {
                return Some(Action::ShowPanel(SettingsPanel::TranslationModes));
            }
            _ => {}
        }

        match self.session.panel {
            SettingsPanel::ApiConfig => self.handle_api_key_event(key),
            SettingsPanel::TranslationModes => self.handle_modes_key_event(key),
        }
    }

    fn handle_api_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        match (self.api_field(), key.code) {
            (ApiField::Engine, KeyCode::Right) => {
                Some(Action::EngineChanged(self.session.engine.next()))
            }
            (ApiField::Engine, KeyCode::Left) => {
                Some(Action::EngineChanged(self.session.engine.prev()))
            }
            // Re-selecting the current engine is still a change event.
            (ApiField::Engine, KeyCode::Enter) => {
                Some(Action::EngineChanged(self.session.engine))
            }
            (ApiField::ApiKey, KeyCode::Char(c))
                if !self.session.key_locked() && !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.session.api_key.push(c);
                None
            }
            (ApiField::ApiKey, KeyCode::Backspace) if !self.session.key_locked() => {
                self.session.api_key.pop();
                None
            }
            (ApiField::Fetch, KeyCode::Enter) => Some(Action::FetchModels),
            (ApiField::Models, KeyCode::Down) => {
                self.session.select_next_model();
                None
            }
            (ApiField::Models, KeyCode::Up) => {
                self.session.select_prev_model();
                None
            }
            (ApiField::Save, KeyCode::Enter) => Some(Action::SaveSettings),
            (_, KeyCode::Down) => {
                self.focus_next();
                None
            }
            (_, KeyCode::Up) => {
                self.focus_prev();
                None
            }
            _ => None,
        }
    }

    fn handle_modes_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        match (self.modes_field(), key.code) {
            (ModesField::Mode, KeyCode::Right) => {
                self.modes.select_next();
                None
            }
            (ModesField::Mode, KeyCode::Left) => {
                self.modes.select_prev();
                None
            }
            (ModesField::Prompt, KeyCode::Char(c))
                if !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.modes.prompt.push(c);
                None
            }
            (ModesField::Prompt, KeyCode::Backspace) => {
                self.modes.prompt.pop();
                None
            }
            (ModesField::Prompt, KeyCode::Enter) => {
                self.modes.prompt.push('\n');
                None
            }
            (ModesField::Thinking, KeyCode::Enter | KeyCode::Char(' ')) => {
                self.modes.toggle_thinking();
                None
            }
            (ModesField::Save, KeyCode::Enter) => Some(Action::SaveModes),
            (ModesField::Reset, KeyCode::Enter) => Some(Action::ResetModePrompt),
            (_, KeyCode::Down) => {
                self.focus_next();
                None
            }
            (_, KeyCode::Up) => {
                self.focus_prev();
                None
            }
            _ => None,
        }
    }

    fn tab_line(&self) -> Line<'static> {
        let active = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let inactive = Style::default().fg(Color::DarkGray);
        let (api_style, modes_style) = match self.session.panel {
            SettingsPanel::ApiConfig => (active, inactive),
            SettingsPanel::TranslationModes => (inactive, active),
        };
        Line::from(vec![
            Span::styled(" [1] API Configuration ", api_style),
            Span::raw("  "),
            Span::styled(" [2] Translation Mode ", modes_style),
        ])
    }

    fn field_label(text: &str, focused: bool) -> Span<'static> {
        let mut style = Style::default();
        if focused {
            style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
        }
        Span::styled(format!("{text:<10}"), style)
    }

    fn render_api_panel(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // engine
                Constraint::Length(1), // api key
                Constraint::Length(1), // fetch button
                Constraint::Min(3),    // model list
                Constraint::Length(1), // save button
                Constraint::Length(2), // error text
            ])
            .split(area);

        let engine_focused = self.api_field() == ApiField::Engine;
        let engine_line = Line::from(vec![
            Self::field_label("Engine:", engine_focused),
            Span::styled(
                format!("◀ {} ▶", self.session.engine.display_name()),
                if engine_focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                },
            ),
        ]);
        frame.render_widget(Paragraph::new(engine_line), rows[0]);

        let key_focused = self.api_field() == ApiField::ApiKey;
        let key_value = if self.session.api_key.is_empty() {
            Span::styled(
                self.session.key_placeholder(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            // Never echo the key itself.
            Span::raw("•".repeat(self.session.api_key.chars().count()))
        };
        let mut key_line = vec![Self::field_label("API key:", key_focused), key_value];
        if key_focused && !self.session.key_locked() {
            key_line.push(Span::styled(
                "▏",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(key_line)), rows[1]);

        let fetch_focused = self.api_field() == ApiField::Fetch;
        frame.render_widget(
            Paragraph::new(Line::from(button("[ Fetch models ]", fetch_focused))),
            rows[2],
        );

        self.render_model_list(frame, rows[3]);

        let save_focused = self.api_field() == ApiField::Save;
        let save_text = if self.session.saving {
            "[ Saving... ]"
        } else {
            "[ Save ]"
        };
        frame.render_widget(
            Paragraph::new(Line::from(button(save_text, save_focused))),
            rows[4],
        );

        if let Some(error) = &self.session.error {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    error.clone(),
                    Style::default().fg(Color::Red),
                )))
                .wrap(Wrap { trim: true }),
                rows[5],
            );
        }
    }

    fn render_model_list(&self, frame: &mut Frame, area: Rect) {
        let models_focused = self.api_field() == ApiField::Models;
        let block = Block::default()
            .title(" Model ")
            .borders(Borders::ALL)
            .border_style(if models_focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            });
        let inner_height = area.height.saturating_sub(2).max(1) as usize;

        let lines: Vec<Line> = match &self.session.models {
            ModelList::Idle => Vec::new(),
            ModelList::Fetching => vec![Line::from(Span::styled(
                "Fetching models...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))],
            ModelList::Ready(models) => {
                let selected = self.session.selected.unwrap_or(0);
                let top = selected.saturating_sub(inner_height.saturating_sub(1) / 2);
                models
                    .iter()
                    .enumerate()
                    .skip(top)
                    .take(inner_height)
                    .map(|(idx, model)| {
                        let mut style = Style::default();
                        if Some(idx) == self.session.selected {
                            style = style.add_modifier(Modifier::BOLD);
                            if models_focused {
                                style = style.add_modifier(Modifier::REVERSED);
                            }
                        }
                        let marker = if Some(idx) == self.session.selected {
                            "> "
                        } else {
                            "  "
                        };
                        Line::from(Span::styled(format!("{marker}{}", model.text), style))
                    })
                    .collect()
            }
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_modes_panel(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // mode selector
                Constraint::Min(4),    // prompt
                Constraint::Length(1), // thinking toggle
                Constraint::Length(1), // buttons
            ])
            .split(area);

        if self.modes.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "Translation modes unavailable",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ))),
                rows[0],
            );
            return;
        }

        let mode_focused = self.modes_field() == ModesField::Mode;
        let label = self
            .modes
            .labels()
            .get(self.modes.selected)
            .cloned()
            .unwrap_or_default();
        let mode_line = Line::from(vec![
            Self::field_label("Mode:", mode_focused),
            Span::styled(
                format!("◀ {label} ▶"),
                if mode_focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                },
            ),
        ]);
        frame.render_widget(Paragraph::new(mode_line), rows[0]);

        let prompt_focused = self.modes_field() == ModesField::Prompt;
        let mut prompt_text = self.modes.prompt.clone();
        if prompt_focused {
            prompt_text.push('▏');
        }
        let prompt = Paragraph::new(prompt_text)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(" Prompt ")
                    .borders(Borders::ALL)
                    .border_style(if prompt_focused {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    }),
            );
        frame.render_widget(prompt, rows[1]);

        let thinking_focused = self.modes_field() == ModesField::Thinking;
        let check = if self.modes.thinking_enabled { "x" } else { " " };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Self::field_label("Thinking:", thinking_focused),
                Span::styled(
                    format!("[{check}] enabled"),
                    if thinking_focused {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    },
                ),
            ])),
            rows[2],
        );

        let save_focused = self.modes_field() == ModesField::Save;
        let reset_focused = self.modes_field() == ModesField::Reset;
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                button("[ Save ]", save_focused),
                Span::raw("  "),
                button("[ Reset prompt ]", reset_focused),
            ])),
            rows[3],
        );
    }
}

fn button(text: &str, focused: bool) -> Span<'static> {
    let mut style = Style::default().fg(Color::Cyan);
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(text.to_string(), style)
}

/// Centered overlay rect, clamped to the terminal area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

impl Default for SettingsModal {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SettingsModal {
    fn handle_event(&mut self, event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(*key),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _focused: bool) {
        let overlay = centered_rect(70, 80, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .title(" Settings [esc=close tab=next field] ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        frame.render_widget(Paragraph::new(self.tab_line()), chunks[0]);

        match self.session.panel {
            SettingsPanel::ApiConfig => self.render_api_panel(frame, chunks[1]),
            SettingsPanel::TranslationModes => self.render_modes_panel(frame, chunks[1]),
        }
    }
}
