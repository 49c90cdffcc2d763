//! Multi-line editor for the text to translate.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::action::Action;
use crate::components::Component;

/// Soft input limit; the counter turns red past it but nothing is truncated.
pub const MAX_INPUT_CHARS: usize = 5000;

pub struct InputBox {
    /// Text buffer containing all lines
    lines: Vec<String>,
    /// Cursor position: (line_index, column_index)
    cursor: (usize, usize),
    /// Scroll offset for vertical scrolling
    scroll_offset: u16,
    /// Visible height of the input area
    visible_height: u16,
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: (0, 0),
            scroll_offset: 0,
            visible_height: 5,
        }
    }

    /// Current content as a single string.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    pub fn char_count(&self) -> usize {
        // Newlines count, matching a flat text-area buffer.
        let newlines = self.lines.len().saturating_sub(1);
        self.lines.iter().map(|l| l.chars().count()).sum::<usize>() + newlines
    }

    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(|l| l.trim_end_matches('\r').to_string()).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let last = self.lines.len() - 1;
        self.cursor = (last, self.lines[last].chars().count());
        self.scroll_offset = 0;
        self.ensure_cursor_visible();
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.cursor = (0, 0);
        self.scroll_offset = 0;
    }

    pub fn set_inner_area(&mut self, area: Rect) {
        self.visible_height = area.height.saturating_sub(2).max(1);
        self.ensure_cursor_visible();
    }

    fn insert_char(&mut self, c: char) {
        let (line, col) = self.cursor;
        if line < self.lines.len() {
            let current = &mut self.lines[line];
            let byte_pos = char_to_byte_pos(current, col);
            current.insert(byte_pos, c);
            self.cursor.1 = col + 1;
        }
        self.ensure_cursor_visible();
    }

    fn insert_newline(&mut self) {
        let (line, col) = self.cursor;
        if line < self.lines.len() {
            let current = &self.lines[line];
            let byte_pos = char_to_byte_pos(current, col);
            let remainder = current[byte_pos..].to_string();
            self.lines[line] = current[..byte_pos].to_string();
            self.lines.insert(line + 1, remainder);
            self.cursor = (line + 1, 0);
        }
        self.ensure_cursor_visible();
    }

    fn delete_char_before(&mut self) {
        let (line, col) = self.cursor;
        if col > 0 {
            let current = &mut self.lines[line];
            let start = char_to_byte_pos(current, col - 1);
            let end = char_to_byte_pos(current, col);
            current.replace_range(start..end, "");
            self.cursor.1 = col - 1;
        } else if line > 0 {
            let removed = self.lines.remove(line);
            let prev_len = self.lines[line - 1].chars().count();
            self.lines[line - 1].push_str(&removed);
            self.cursor = (line - 1, prev_len);
        }
        self.ensure_cursor_visible();
    }

    fn delete_char_at(&mut self) {
        let (line, col) = self.cursor;
        if line < self.lines.len() {
            let count = self.lines[line].chars().count();
            if col < count {
                let start = char_to_byte_pos(&self.lines[line], col);
                let end = char_to_byte_pos(&self.lines[line], col + 1);
                self.lines[line].replace_range(start..end, "");
            } else if line + 1 < self.lines.len() {
                let next = self.lines.remove(line + 1);
                self.lines[line].push_str(&next);
            }
        }
    }

    fn move_left(&mut self) {
        let (line, col) = self.cursor;
        if col > 0 {
            self.cursor.1 = col - 1;
        } else if line > 0 {
            self.cursor = (line - 1, self.lines[line - 1].chars().count());
        }
        self.ensure_cursor_visible();
    }

    fn move_right(&mut self) {
        let (line, col) = self.cursor;
        let len = self.lines[line].chars().count();
        if col < len {
            self.cursor.1 = col + 1;
        } else if line + 1 < self.lines.len() {
            self.cursor = (line + 1, 0);
        }
        self.ensure_cursor_visible();
    }

    fn move_up(&mut self) {
        let (line, col) = self.cursor;
        if line > 0 {
            self.cursor = (line - 1, col.min(self.lines[line - 1].chars().count()));
        }
        self.ensure_cursor_visible();
    }

    fn move_down(&mut self) {
        let (line, col) = self.cursor;
        if line + 1 < self.lines.len() {
            self.cursor = (line + 1, col.min(self.lines[line + 1].chars().count()));
        }
        self.ensure_cursor_visible();
    }

    fn ensure_cursor_visible(&mut self) {
        let line = self.cursor.0 as u16;
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + self.visible_height {
            self.scroll_offset = line + 1 - self.visible_height;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_char(c)
            }
            KeyCode::Enter => self.insert_newline(),
            KeyCode::Backspace => self.delete_char_before(),
            KeyCode::Delete => self.delete_char_at(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Home => {
                self.cursor.1 = 0;
            }
            KeyCode::End => {
                self.cursor.1 = self.lines[self.cursor.0].chars().count();
            }
            _ => return None,
        }
        None
    }

    fn counter_line(&self) -> Line<'static> {
        let count = self.char_count();
        let style = if count > MAX_INPUT_CHARS {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Line::from(Span::styled(format!(" {} / {} ", count, MAX_INPUT_CHARS), style))
    }
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for InputBox {
    fn handle_event(&mut self, event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Paste(text) => {
                for c in text.chars() {
                    match c {
                        '\n' => self.insert_newline(),
                        '\r' => {}
                        c => self.insert_char(c),
                    }
                }
                None
            }
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
            .title(" Input ")
            .title_bottom(self.counter_line())
            .borders(Borders::ALL)
            .border_style(border_style);

        let lines: Vec<Line> = self
            .lines
            .iter()
            .enumerate()
            .map(|(idx, text)| {
                if focused && idx == self.cursor.0 {
                    cursor_line(text, self.cursor.1)
                } else {
                    Line::from(text.clone())
                }
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((self.scroll_offset, 0));
        frame.render_widget(paragraph, area);
    }
}

/// Split a line into spans with a reversed cell at the cursor column.
fn cursor_line(text: &str, col: usize) -> Line<'static> {
    let before: String = text.chars().take(col).collect();
    let at: String = text.chars().skip(col).take(1).collect();
    let after: String = text.chars().skip(col + 1).collect();
    let cursor_span = if at.is_empty() {
        Span::styled(" ".to_string(), Style::default().add_modifier(Modifier::REVERSED))
    } else {
        Span::styled(at, Style::default().add_modifier(Modifier::REVERSED))
    };
    Line::from(vec![Span::raw(before), cursor_span, Span::raw(after)])
}

/// Convert a character index to a byte position within a line.
fn char_to_byte_pos(line: &str, char_pos: usize) -> usize {
    line.char_indices()
        .nth(char_pos)
        .map(|(pos, _)| pos)
        .unwrap_or(line.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press(input: &mut InputBox, code: KeyCode) {
        input.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(input: &mut InputBox, text: &str) {
        for c in text.chars() {
            press(input, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_builds_text() {
        let mut input = InputBox::new();
        type_str(&mut input, "hola");
        press(&mut input, KeyCode::Enter);
        type_str(&mut input, "mundo");
        assert_eq!(input.text(), "hola\nmundo");
        assert_eq!(input.char_count(), 10);
    }

    #[test]
    fn blank_detection_ignores_whitespace() {
        let mut input = InputBox::new();
        assert!(input.is_blank());
        type_str(&mut input, "   ");
        press(&mut input, KeyCode::Enter);
        assert!(input.is_blank());
        type_str(&mut input, "x");
        assert!(!input.is_blank());
    }

    #[test]
    fn backspace_joins_lines() {
        let mut input = InputBox::new();
        type_str(&mut input, "ab");
        press(&mut input, KeyCode::Enter);
        type_str(&mut input, "cd");
        press(&mut input, KeyCode::Home);
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.text(), "abcd");
    }

    #[test]
    fn set_text_replaces_and_clears() {
        let mut input = InputBox::new();
        type_str(&mut input, "old");
        input.set_text("new\ncontent");
        assert_eq!(input.text(), "new\ncontent");
        input.clear();
        assert_eq!(input.text(), "");
        assert!(input.is_blank());
    }

    #[test]
    fn multibyte_editing_is_char_based() {
        let mut input = InputBox::new();
        type_str(&mut input, "héllo");
        press(&mut input, KeyCode::Backspace);
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.text(), "hél");
        assert_eq!(input.char_count(), 3);
    }

    #[test]
    fn counter_reflects_overflow() {
        let mut input = InputBox::new();
        input.set_text(&"x".repeat(MAX_INPUT_CHARS + 1));
        assert!(input.char_count() > MAX_INPUT_CHARS);
    }
}
