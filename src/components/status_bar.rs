use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::event_form::{FormField, Phase};
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    /// Show the pending notification, or hints for the focused field.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        message: Option<&str>,
        field: FormField,
        phase: Phase,
    ) {
        let w = area.width as usize;

        let left = match phase {
            Phase::Saving => " [Saving...] ",
            Phase::Editing | Phase::Submitted => " [New Event] ",
        };

        let right = match message {
            Some(msg) => format!(" {} ", msg),
            None if field.is_text() && w >= 50 => " Tab:Next ^S:Save Esc:Cancel ".to_string(),
            None if w >= 50 => " Enter:Pick Tab:Next ^S:Save Esc:Cancel ".to_string(),
            None => " ^S:Save Esc:Cancel ".to_string(),
        };

        let padding = " ".repeat(w.saturating_sub(left.len() + right.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, theme::current().status),
            Span::styled(padding, theme::current().status),
            Span::styled(right, theme::current().status),
        ]);

        let bar = Paragraph::new(line).style(theme::current().status);
        frame.render_widget(bar, area);
    }
}
