// Rendering - draw() method and UI layout helpers

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{App, FocusArea};
use crate::components::Component;
use crate::error::{AppError, Result};

struct Areas {
    lang_bar: Rect,
    input: Rect,
    output: Rect,
    saved: Rect,
    status: Rect,
}

fn layout_areas(area: Rect) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(38),
            Constraint::Percentage(38),
            Constraint::Percentage(24),
        ])
        .split(rows[1]);
    Areas {
        lang_bar: rows[0],
        input: columns[0],
        output: columns[1],
        saved: columns[2],
        status: rows[2],
    }
}

const KEY_HINTS: &str = " ^T translate  ^O settings  ^X swap  ^Y copy  tab focus  ^Q quit";

impl App {
    /// Main drawing method - renders the entire UI
    pub(super) fn draw(&mut self) -> Result<()> {
        // Pre-compute the input area so cursor-follow scrolling has the
        // right viewport height before the frame closure runs.
        let size = self
            .terminal
            .size()
            .map_err(|e| AppError::Terminal(e.to_string()))?;
        let term_rect = Rect::new(0, 0, size.width, size.height);
        let areas = layout_areas(term_rect);
        self.input_box.set_inner_area(areas.input);

        let focus = self.focus;
        let modal_open = self.settings.session.open;
        let status_text = self.status.as_ref().map(|(text, _)| text.clone());
        let active_label = self.active.describe();

        self.terminal
            .draw(|frame| {
                let full_area = frame.area();
                let areas = layout_areas(full_area);

                self.lang_bar.render(
                    frame,
                    areas.lang_bar,
                    !modal_open && focus == FocusArea::LangBar,
                );
                self.input_box.render(
                    frame,
                    areas.input,
                    !modal_open && focus == FocusArea::Input,
                );
                self.output_view.render(
                    frame,
                    areas.output,
                    !modal_open && focus == FocusArea::Output,
                );
                self.saved_models.render(
                    frame,
                    areas.saved,
                    !modal_open && focus == FocusArea::SavedModels,
                );

                let left = status_text.as_deref().unwrap_or(KEY_HINTS);
                let right = format!("{} → {} ", active_label, self.lang_bar.name());
                let pad = (areas.status.width as usize)
                    .saturating_sub(left.chars().count() + right.chars().count());
                let status_line = Line::from(vec![
                    Span::styled(left.to_string(), Style::default().fg(Color::DarkGray)),
                    Span::raw(" ".repeat(pad)),
                    Span::styled(right, Style::default().fg(Color::Cyan)),
                ]);
                frame.render_widget(Paragraph::new(status_line), areas.status);

                if modal_open {
                    self.settings.render(frame, full_area, true);
                }
            })
            .map_err(|e| AppError::Terminal(e.to_string()))?;

        Ok(())
    }
}
