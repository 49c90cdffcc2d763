pub mod input_box;
pub mod lang_bar;
pub mod output_view;
pub mod saved_models;
pub mod settings_modal;

use crossterm::event::Event;
use ratatui::{layout::Rect, Frame};

use crate::action::Action;

pub trait Component {
    fn handle_event(&mut self, event: &Event) -> Option<Action>;

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool);
}
