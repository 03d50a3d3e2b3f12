use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::event_form::{DatePick, EventFormState, Target, TimePick};
use crate::theme;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerValue {
    Date(DatePick),
    Time(TimePick),
}

/// What a key press inside the picker amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    Pending,
    Confirmed(Target, PickerValue),
    Cancelled,
}

/// Modal date or time picker for one end of the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub target: Target,
    pub value: PickerValue,
    /// Index of the component being adjusted (day/month/year or hour/minute).
    pub cursor: usize,
}

impl Picker {
    pub fn date(form: &EventFormState, target: Target) -> Self {
        Self {
            target,
            value: PickerValue::Date(form.date_picker_seed(target)),
            cursor: 0,
        }
    }

    pub fn time(form: &EventFormState, target: Target) -> Self {
        Self {
            target,
            value: PickerValue::Time(form.time_picker_seed(target)),
            cursor: 0,
        }
    }

    fn components(&self) -> usize {
        match self.value {
            PickerValue::Date(_) => 3,
            PickerValue::Time(_) => 2,
        }
    }

    pub fn on_key(&mut self, code: KeyCode) -> PickerOutcome {
        match code {
            KeyCode::Esc => return PickerOutcome::Cancelled,
            KeyCode::Enter => return PickerOutcome::Confirmed(self.target, self.value),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                self.cursor = (self.cursor + self.components() - 1) % self.components();
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                self.cursor = (self.cursor + 1) % self.components();
            }
            KeyCode::Up | KeyCode::Char('k') => self.step(1),
            KeyCode::Down | KeyCode::Char('j') => self.step(-1),
            _ => {}
        }
        PickerOutcome::Pending
    }

    fn step(&mut self, delta: i32) {
        match &mut self.value {
            PickerValue::Date(date) => {
                match self.cursor {
                    0 => {
                        let len = days_in_month(date.year, date.month0 + 1) as i32;
                        date.day = ((date.day as i32 - 1 + delta).rem_euclid(len) + 1) as u32;
                    }
                    1 => date.month0 = (date.month0 as i32 + delta).rem_euclid(12) as u32,
                    _ => {
                        let (min, max) = (NaiveDate::MIN.year(), NaiveDate::MAX.year());
                        date.year = (date.year + delta).clamp(min, max);
                    }
                }
                date.day = date.day.min(days_in_month(date.year, date.month0 + 1));
            }
            PickerValue::Time(time) => match self.cursor {
                0 => time.hour = (time.hour as i32 + delta).rem_euclid(24) as u32,
                _ => time.minute = (time.minute as i32 + delta).rem_euclid(60) as u32,
            },
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_w = area.width.min(34).max(24);
        let popup_h = area.height.min(6).max(5);
        let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
        let popup_area = Rect::new(x, y, popup_w, popup_h);

        frame.render_widget(Clear, popup_area);

        let which = match self.target {
            Target::Start => "Start",
            Target::End => "End",
        };
        let title = match self.value {
            PickerValue::Date(_) => format!(" {} date ", which),
            PickerValue::Time(_) => format!(" {} time ", which),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme::current().header)
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        let parts: Vec<String> = match self.value {
            PickerValue::Date(d) => vec![
                d.day.to_string(),
                MONTH_NAMES[d.month0 as usize % 12].to_string(),
                d.year.to_string(),
            ],
            PickerValue::Time(t) => vec![format!("{:02}", t.hour), format!("{:02}", t.minute)],
        };
        let separator = match self.value {
            PickerValue::Date(_) => " ",
            PickerValue::Time(_) => ":",
        };

        let mut spans = Vec::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(separator));
            }
            let style = if i == self.cursor {
                theme::current().selected
            } else {
                Style::default()
            };
            spans.push(Span::styled(part, style));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            rows[0],
        );

        let help = Line::from(vec![
            Span::styled("\u{2191}\u{2193}", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Adjust ", theme::current().dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":OK ", theme::current().dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme::current().dim),
        ]);
        frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), rows[1]);
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::event_form::LaunchPayload;

    fn date(year: i32, month0: u32, day: u32) -> PickerValue {
        PickerValue::Date(DatePick { year, month0, day })
    }

    fn time(hour: u32, minute: u32) -> PickerValue {
        PickerValue::Time(TimePick { hour, minute })
    }

    fn form(code: &str) -> EventFormState {
        let now = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        EventFormState::new(
            Some(&LaunchPayload {
                day_code: Some(code.into()),
            }),
            now,
        )
    }

    #[test]
    fn date_picker_seeds_zero_based_month() {
        let picker = Picker::date(&form("20240131"), Target::End);
        assert_eq!(picker.value, date(2024, 0, 31));
    }

    #[test]
    fn enter_confirms_current_value() {
        let mut picker = Picker::time(&form("202403101000"), Target::Start);
        picker.on_key(KeyCode::Up);
        picker.on_key(KeyCode::Right);
        picker.on_key(KeyCode::Down);

        assert_eq!(
            picker.on_key(KeyCode::Enter),
            PickerOutcome::Confirmed(Target::Start, time(11, 59))
        );
    }

    #[test]
    fn escape_cancels() {
        let mut picker = Picker::date(&form("20240310"), Target::Start);
        picker.on_key(KeyCode::Up);
        assert_eq!(picker.on_key(KeyCode::Esc), PickerOutcome::Cancelled);
    }

    #[test]
    fn time_components_wrap() {
        let mut picker = Picker::time(&form("202403100000"), Target::End);
        picker.on_key(KeyCode::Down);
        picker.on_key(KeyCode::Left);
        picker.on_key(KeyCode::Down);
        assert_eq!(picker.value, time(23, 59));
    }

    #[test]
    fn day_is_clamped_to_month_length() {
        let mut picker = Picker::date(&form("20240131"), Target::Start);
        picker.on_key(KeyCode::Right);
        picker.on_key(KeyCode::Up);
        assert_eq!(picker.value, date(2024, 1, 29));

        picker.on_key(KeyCode::Right);
        picker.on_key(KeyCode::Up);
        assert_eq!(picker.value, date(2025, 1, 28));
    }

    #[test]
    fn early_years_step_by_one() {
        let mut picker = Picker::date(&form("00010101"), Target::Start);
        picker.on_key(KeyCode::Left);
        picker.on_key(KeyCode::Up);
        assert_eq!(picker.value, date(2, 0, 1));

        picker.on_key(KeyCode::Down);
        picker.on_key(KeyCode::Down);
        assert_eq!(picker.value, date(0, 0, 1));
    }

    #[test]
    fn year_stops_at_calendar_limit() {
        let mut picker = Picker::date(&form("20240101"), Target::Start);
        if let PickerValue::Date(d) = &mut picker.value {
            d.year = NaiveDate::MAX.year();
        }
        picker.on_key(KeyCode::Left);
        picker.on_key(KeyCode::Up);
        assert_eq!(picker.value, date(NaiveDate::MAX.year(), 0, 1));
    }

    #[test]
    fn day_wraps_within_month() {
        let mut picker = Picker::date(&form("20240401"), Target::Start);
        picker.on_key(KeyCode::Down);
        assert_eq!(picker.value, date(2024, 3, 30));
    }

    #[test]
    fn month_wraps_december_to_january() {
        let mut picker = Picker::date(&form("20241215"), Target::Start);
        picker.on_key(KeyCode::Tab);
        picker.on_key(KeyCode::Up);
        assert_eq!(picker.value, date(2024, 0, 15));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_month(2023, 4), 30);
    }
}
