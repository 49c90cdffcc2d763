//! Rendered translation output.
//!
//! Plain segments render as-is; thinking segments render collapsed behind a
//! one-line header and expand individually. Placeholder and error states
//! share the same surface, exactly one of which is visible at a time.

use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::action::Action;
use crate::components::Component;
use crate::output::Segment;

pub const TRANSLATING: &str = "Translating...";

#[derive(Debug, Clone, Default, PartialEq)]
enum OutputState {
    #[default]
    Empty,
    /// Transient placeholder while a request is in flight. It stays up
    /// indefinitely if the request hangs; nothing cancels it.
    Translating,
    /// A user-facing message (validation or error text).
    Message(String),
    Output(Vec<Segment>),
}

pub struct OutputView {
    state: OutputState,
    /// Expansion flag per thinking segment, positional.
    expanded: Vec<bool>,
    /// Which thinking segment the toggle cursor is on.
    think_cursor: usize,
    scroll_offset: u16,
}

impl OutputView {
    pub fn new() -> Self {
        Self {
            state: OutputState::Empty,
            expanded: Vec::new(),
            think_cursor: 0,
            scroll_offset: 0,
        }
    }

    pub fn set_translating(&mut self) {
        self.state = OutputState::Translating;
        self.reset_view();
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.state = OutputState::Message(message.into());
        self.reset_view();
    }

    pub fn set_output(&mut self, segments: Vec<Segment>) {
        let think_count = segments
            .iter()
            .filter(|s| matches!(s, Segment::Thinking(_)))
            .count();
        self.expanded = vec![false; think_count];
        self.state = if segments.is_empty() {
            OutputState::Empty
        } else {
            OutputState::Output(segments)
        };
        self.think_cursor = 0;
        self.scroll_offset = 0;
    }

    fn reset_view(&mut self) {
        self.expanded.clear();
        self.think_cursor = 0;
        self.scroll_offset = 0;
    }

    /// The visible non-thinking text: what swap and copy operate on.
    pub fn plain_text(&self) -> String {
        match &self.state {
            OutputState::Empty => String::new(),
            OutputState::Translating => TRANSLATING.to_string(),
            OutputState::Message(message) => message.clone(),
            OutputState::Output(segments) => segments
                .iter()
                .filter_map(|s| match s {
                    Segment::Text(text) => Some(text.as_str()),
                    Segment::Thinking(_) => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn think_count(&self) -> usize {
        self.expanded.len()
    }

    fn toggle_current(&mut self) {
        if let Some(flag) = self.expanded.get_mut(self.think_cursor) {
            *flag = !*flag;
        }
    }

    fn next_think(&mut self) {
        let count = self.think_count();
        if count > 0 {
            self.think_cursor = (self.think_cursor + 1) % count;
        }
    }

    fn prev_think(&mut self) {
        let count = self.think_count();
        if count > 0 {
            self.think_cursor = (self.think_cursor + count - 1) % count;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            KeyCode::Down => self.scroll_offset = self.scroll_offset.saturating_add(1),
            KeyCode::PageUp => self.scroll_offset = self.scroll_offset.saturating_sub(10),
            KeyCode::PageDown => self.scroll_offset = self.scroll_offset.saturating_add(10),
            KeyCode::Char('n') => self.next_think(),
            KeyCode::Char('p') => self.prev_think(),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_current(),
            _ => return None,
        }
        None
    }

    fn body_lines(&self, focused: bool) -> Vec<Line<'static>> {
        match &self.state {
            OutputState::Empty => Vec::new(),
            OutputState::Translating => vec![Line::from(Span::styled(
                TRANSLATING.to_string(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))],
            OutputState::Message(message) => vec![Line::from(message.clone())],
            OutputState::Output(segments) => {
                let mut lines = Vec::new();
                let mut think_idx = 0;
                for segment in segments {
                    match segment {
                        Segment::Text(text) => {
                            for l in text.lines() {
                                lines.push(Line::from(l.to_string()));
                            }
                        }
                        Segment::Thinking(text) => {
                            let expanded = self.expanded.get(think_idx).copied().unwrap_or(false);
                            let on_cursor = focused && think_idx == self.think_cursor;
                            let arrow = if expanded { "▼" } else { "▶" };
                            let mut style = Style::default().fg(Color::Magenta);
                            if on_cursor {
                                style = style.add_modifier(Modifier::BOLD);
                            }
                            lines.push(Line::from(Span::styled(
                                format!("{arrow} thinking"),
                                style,
                            )));
                            if expanded {
                                for l in text.lines() {
                                    lines.push(Line::from(Span::styled(
                                        format!("  {l}"),
                                        Style::default()
                                            .fg(Color::DarkGray)
                                            .add_modifier(Modifier::ITALIC),
                                    )));
                                }
                            }
                            think_idx += 1;
                        }
                    }
                }
                lines
            }
        }
    }
}

impl Default for OutputView {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for OutputView {
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
        let title = if self.think_count() > 0 {
            " Output [n/p=thinking ↵=toggle] "
        } else {
            " Output "
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let paragraph = Paragraph::new(self.body_lines(focused))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset, 0));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::parse_segments;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_skips_thinking() {
        let mut view = OutputView::new();
        view.set_output(parse_segments("<think>draft</think>Bonjour\nle monde"));
        assert_eq!(view.plain_text(), "Bonjour\nle monde");
    }

    #[test]
    fn segments_toggle_independently() {
        let mut view = OutputView::new();
        view.set_output(parse_segments("<think>a</think>x<think>b</think>"));
        assert_eq!(view.expanded, vec![false, false]);
        view.toggle_current();
        assert_eq!(view.expanded, vec![true, false]);
        view.next_think();
        view.toggle_current();
        assert_eq!(view.expanded, vec![true, true]);
        view.toggle_current();
        assert_eq!(view.expanded, vec![true, false]);
    }

    #[test]
    fn think_cursor_wraps() {
        let mut view = OutputView::new();
        view.set_output(parse_segments("<think>a</think><think>b</think>"));
        view.next_think();
        assert_eq!(view.think_cursor, 1);
        view.next_think();
        assert_eq!(view.think_cursor, 0);
        view.prev_think();
        assert_eq!(view.think_cursor, 1);
    }

    #[test]
    fn new_output_collapses_everything() {
        let mut view = OutputView::new();
        view.set_output(parse_segments("<think>a</think>x"));
        view.toggle_current();
        view.set_output(parse_segments("<think>b</think>y"));
        assert_eq!(view.expanded, vec![false]);
    }

    #[test]
    fn placeholder_and_message_text() {
        let mut view = OutputView::new();
        assert_eq!(view.plain_text(), "");
        view.set_translating();
        assert_eq!(view.plain_text(), TRANSLATING);
        view.set_message("Please enter text to translate.");
        assert_eq!(view.plain_text(), "Please enter text to translate.");
    }
}
