//! Target-language selector.

use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::Action;
use crate::components::Component;

/// The closed set of target languages offered by the UI. The stored
/// preference is clamped to this list at startup.
pub const TARGET_LANGS: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh", "Chinese"),
];

pub fn is_known_lang(code: &str) -> bool {
    TARGET_LANGS.iter().any(|(c, _)| *c == code)
}

pub struct LangBar {
    selected: usize,
}

impl LangBar {
    pub fn new(code: &str) -> Self {
        Self {
            selected: Self::index_of(code).unwrap_or(0),
        }
    }

    fn index_of(code: &str) -> Option<usize> {
        TARGET_LANGS.iter().position(|(c, _)| *c == code)
    }

    pub fn code(&self) -> &'static str {
        TARGET_LANGS[self.selected].0
    }

    pub fn name(&self) -> &'static str {
        TARGET_LANGS[self.selected].1
    }

    pub fn set_lang(&mut self, code: &str) {
        if let Some(index) = Self::index_of(code) {
            self.selected = index;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected = (self.selected + TARGET_LANGS.len() - 1) % TARGET_LANGS.len();
                Some(Action::SetTargetLang(self.code().to_string()))
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected = (self.selected + 1) % TARGET_LANGS.len();
                Some(Action::SetTargetLang(self.code().to_string()))
            }
            _ => None,
        }
    }
}

impl Component for LangBar {
    fn handle_event(&mut self, event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(*key),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let mut spans = vec![Span::styled(
            " To: ",
            Style::default().fg(Color::DarkGray),
        )];
        for (idx, (_, name)) in TARGET_LANGS.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
            }
            let style = if idx == self.selected {
                let mut s = Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD);
                if focused {
                    s = s.add_modifier(Modifier::UNDERLINED);
                }
                s
            } else {
                Style::default()
            };
            spans.push(Span::styled(*name, style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_on_stored_language() {
        assert_eq!(LangBar::new("ja").code(), "ja");
    }

    #[test]
    fn unknown_code_falls_back_to_english() {
        assert_eq!(LangBar::new("tlh").code(), "en");
        assert!(!is_known_lang("tlh"));
        assert!(is_known_lang("de"));
    }

    #[test]
    fn cycling_emits_the_new_language() {
        let mut bar = LangBar::new("en");
        let action = bar.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        assert_eq!(action, Some(Action::SetTargetLang("es".to_string())));
        let action = bar.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        assert_eq!(action, Some(Action::SetTargetLang("en".to_string())));
        let action = bar.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        assert_eq!(action, Some(Action::SetTargetLang("zh".to_string())));
    }
}
