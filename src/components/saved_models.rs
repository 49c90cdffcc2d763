//! Saved-model list: persisted (engine, model) pairs for quick switching.

use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::action::Action;
use crate::api::SavedModel;
use crate::components::Component;
use crate::registry::composite_key;

pub const NO_SAVED_MODELS: &str = "No saved models";
pub const LOAD_ERROR: &str = "Error loading";

#[derive(Debug, Clone, Default, PartialEq)]
enum RegistryView {
    #[default]
    Loading,
    Failed,
    Empty,
    Loaded {
        /// Sorted ascending by display name before they get here.
        entries: Vec<SavedModel>,
        /// Index of the current default, if resolved.
        current: Option<usize>,
        cursor: usize,
    },
}

pub struct SavedModelsList {
    view: RegistryView,
}

impl SavedModelsList {
    pub fn new() -> Self {
        Self {
            view: RegistryView::Loading,
        }
    }

    pub fn set_loading(&mut self) {
        self.view = RegistryView::Loading;
    }

    pub fn set_failed(&mut self) {
        self.view = RegistryView::Failed;
    }

    pub fn set_entries(&mut self, entries: Vec<SavedModel>, current: Option<usize>) {
        self.view = if entries.is_empty() {
            RegistryView::Empty
        } else {
            RegistryView::Loaded {
                cursor: current.unwrap_or(0),
                entries,
                current,
            }
        };
    }

    /// Mark the entry with this composite key as the current default.
    pub fn mark_current(&mut self, key: &str) {
        if let RegistryView::Loaded {
            entries, current, ..
        } = &mut self.view
        {
            *current = entries
                .iter()
                .position(|e| composite_key(e.engine, &e.model_id) == key);
        }
    }

    pub fn entry_count(&self) -> usize {
        match &self.view {
            RegistryView::Loaded { entries, .. } => entries.len(),
            _ => 0,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let RegistryView::Loaded {
            entries, cursor, ..
        } = &mut self.view
        else {
            return None;
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                *cursor = (*cursor + entries.len() - 1) % entries.len();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                *cursor = (*cursor + 1) % entries.len();
                None
            }
            KeyCode::Enter => {
                let entry = &entries[*cursor];
                Some(Action::SavedModelChosen(composite_key(
                    entry.engine,
                    &entry.model_id,
                )))
            }
            _ => None,
        }
    }

    fn placeholder(text: &str) -> Line<'static> {
        Line::from(Span::styled(
            text.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    }
}

impl Default for SavedModelsList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SavedModelsList {
    fn handle_event(&mut self, event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(*key),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .title(" Saved models [↵=make default] ")
            .borders(Borders::ALL)
            .border_style(border_style);

        let lines: Vec<Line> = match &self.view {
            RegistryView::Loading => vec![Self::placeholder("Loading...")],
            RegistryView::Failed => vec![Self::placeholder(LOAD_ERROR)],
            RegistryView::Empty => vec![Self::placeholder(NO_SAVED_MODELS)],
            RegistryView::Loaded {
                entries,
                current,
                cursor,
            } => entries
                .iter()
                .enumerate()
                .map(|(idx, entry)| {
                    let marker = if Some(idx) == *current { "● " } else { "  " };
                    let mut style = Style::default();
                    if Some(idx) == *current {
                        style = style.fg(Color::Green);
                    }
                    if focused && idx == *cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Line::from(Span::styled(
                        format!("{marker}{}", entry.display_name),
                        style,
                    ))
                })
                .collect(),
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn entry(engine: Engine, model_id: &str, display_name: &str) -> SavedModel {
        SavedModel {
            engine,
            model_id: model_id.to_string(),
            display_name: display_name.to_string(),
        }
    }

    fn press(list: &mut SavedModelsList, code: KeyCode) -> Option<Action> {
        list.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn placeholders_ignore_input() {
        let mut list = SavedModelsList::new();
        assert_eq!(press(&mut list, KeyCode::Enter), None);
        list.set_failed();
        assert_eq!(press(&mut list, KeyCode::Enter), None);
        list.set_entries(Vec::new(), None);
        assert_eq!(list.view, RegistryView::Empty);
        assert_eq!(press(&mut list, KeyCode::Enter), None);
    }

    #[test]
    fn enter_emits_the_composite_key_under_the_cursor() {
        let mut list = SavedModelsList::new();
        list.set_entries(
            vec![
                entry(Engine::OpenAi, "m1", "Alpha"),
                entry(Engine::Gemini, "g1", "Gamma"),
            ],
            Some(0),
        );
        assert_eq!(
            press(&mut list, KeyCode::Enter),
            Some(Action::SavedModelChosen("openai::m1".to_string()))
        );
        press(&mut list, KeyCode::Down);
        assert_eq!(
            press(&mut list, KeyCode::Enter),
            Some(Action::SavedModelChosen("gemini::g1".to_string()))
        );
    }

    #[test]
    fn cursor_starts_on_current_and_wraps() {
        let mut list = SavedModelsList::new();
        list.set_entries(
            vec![
                entry(Engine::OpenAi, "m1", "Alpha"),
                entry(Engine::OpenAi, "m2", "Beta"),
            ],
            Some(1),
        );
        assert_eq!(
            press(&mut list, KeyCode::Enter),
            Some(Action::SavedModelChosen("openai::m2".to_string()))
        );
        press(&mut list, KeyCode::Down);
        assert_eq!(
            press(&mut list, KeyCode::Enter),
            Some(Action::SavedModelChosen("openai::m1".to_string()))
        );
    }

    #[test]
    fn mark_current_moves_the_default_marker() {
        let mut list = SavedModelsList::new();
        list.set_entries(
            vec![
                entry(Engine::OpenAi, "m1", "Alpha"),
                entry(Engine::OpenAi, "m2", "Beta"),
            ],
            None,
        );
        list.mark_current("openai::m2");
        match &list.view {
            RegistryView::Loaded { current, .. } => assert_eq!(*current, Some(1)),
            other => panic!("unexpected view {other:?}"),
        }
    }
}
