use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::Event;
use crate::formatter;
use crate::theme;

/// Which of the two date-times a picker edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Start,
    End,
}

/// Result of a date picker. `month0` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePick {
    pub year: i32,
    pub month0: u32,
    pub day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePick {
    pub hour: u32,
    pub minute: u32,
}

/// What the screen was launched with.
#[derive(Debug, Clone, Default)]
pub struct LaunchPayload {
    pub day_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("Start and end time are required")]
    Unscheduled,
    #[error("End time cannot be before start time")]
    EndBeforeStart,
    #[error("Selected date does not exist")]
    InvalidDate,
    #[error("Selected time does not exist")]
    InvalidTime,
    #[error("Selected time does not exist in the local timezone")]
    NonexistentTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    StartDate,
    StartTime,
    EndDate,
    EndTime,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::StartDate,
            FormField::StartDate => FormField::StartTime,
            FormField::StartTime => FormField::EndDate,
            FormField::EndDate => FormField::EndTime,
            FormField::EndTime => FormField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Title => FormField::EndTime,
            FormField::Description => FormField::Title,
            FormField::StartDate => FormField::Description,
            FormField::StartTime => FormField::StartDate,
            FormField::EndDate => FormField::StartTime,
            FormField::EndTime => FormField::EndDate,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, FormField::Title | FormField::Description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    /// An insert has been handed to storage and not yet confirmed.
    Saving,
    Submitted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
}

/// Controller state for the new-event screen.
#[derive(Debug, Clone)]
pub struct EventFormState {
    pub title: String,
    pub description: String,
    pub active_field: FormField,
    pub labels: Labels,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    // Seeds pickers for a date-time that is still unset.
    fallback: NaiveDateTime,
    phase: Phase,
}

impl EventFormState {
    pub fn new(payload: Option<&LaunchPayload>, now: NaiveDateTime) -> Self {
        let fallback = now
            .with_second(0)
            .and_then(|dt| dt.with_nanosecond(0))
            .unwrap_or(now);

        let mut form = Self {
            title: String::new(),
            description: String::new(),
            active_field: FormField::Title,
            labels: Labels::default(),
            start: None,
            end: None,
            fallback,
            phase: Phase::Editing,
        };

        let Some(code) = payload
            .and_then(|p| p.day_code.as_deref())
            .filter(|c| !c.is_empty())
        else {
            return form;
        };

        match formatter::parse_day_code(code) {
            Some(dt) => {
                form.start = Some(dt);
                form.render_start_date();
                form.render_start_time();

                form.end = Some(dt);
                form.render_end_date();
                form.render_end_time();
            }
            None => tracing::warn!(code, "ignoring unparseable day code"),
        }

        form
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn render_start_date(&mut self) {
        self.labels.start_date = self
            .start
            .as_ref()
            .map(formatter::event_date)
            .unwrap_or_default();
    }

    pub fn render_start_time(&mut self) {
        self.labels.start_time = self
            .start
            .as_ref()
            .map(formatter::event_time)
            .unwrap_or_default();
    }

    pub fn render_end_date(&mut self) {
        self.labels.end_date = self
            .end
            .as_ref()
            .map(formatter::event_date)
            .unwrap_or_default();
    }

    pub fn render_end_time(&mut self) {
        self.labels.end_time = self
            .end
            .as_ref()
            .map(formatter::event_time)
            .unwrap_or_default();
    }

    fn value(&self, target: Target) -> NaiveDateTime {
        match target {
            Target::Start => self.start,
            Target::End => self.end,
        }
        .unwrap_or(self.fallback)
    }

    pub fn date_picker_seed(&self, target: Target) -> DatePick {
        let dt = self.value(target);
        DatePick {
            year: dt.year(),
            month0: dt.month0(),
            day: dt.day(),
        }
    }

    pub fn time_picker_seed(&self, target: Target) -> TimePick {
        let dt = self.value(target);
        TimePick {
            hour: dt.hour(),
            minute: dt.minute(),
        }
    }

    /// Replace the date part of `target`, keeping its time of day.
    pub fn confirm_date(&mut self, target: Target, pick: DatePick) -> Result<(), FormError> {
        let month = pick.month0.checked_add(1).ok_or(FormError::InvalidDate)?;
        let date =
            NaiveDate::from_ymd_opt(pick.year, month, pick.day).ok_or(FormError::InvalidDate)?;
        let merged = date.and_time(self.value(target).time());
        tracing::debug!(?target, %merged, "date picked");

        let was_unset = self.replace(target, merged).is_none();
        match target {
            Target::Start => {
                self.render_start_date();
                if was_unset {
                    self.render_start_time();
                }
            }
            Target::End => {
                self.render_end_date();
                if was_unset {
                    self.render_end_time();
                }
            }
        }
        Ok(())
    }

    /// Replace hour and minute of `target`, keeping its date and seconds.
    pub fn confirm_time(&mut self, target: Target, pick: TimePick) -> Result<(), FormError> {
        let base = self.value(target);
        let time =
            NaiveTime::from_hms_nano_opt(pick.hour, pick.minute, base.second(), base.nanosecond())
                .ok_or(FormError::InvalidTime)?;
        let merged = base.date().and_time(time);
        tracing::debug!(?target, %merged, "time picked");

        let was_unset = self.replace(target, merged).is_none();
        match target {
            Target::Start => {
                self.render_start_time();
                if was_unset {
                    self.render_start_date();
                }
            }
            Target::End => {
                self.render_end_time();
                if was_unset {
                    self.render_end_date();
                }
            }
        }
        Ok(())
    }

    fn replace(&mut self, target: Target, value: NaiveDateTime) -> Option<NaiveDateTime> {
        match target {
            Target::Start => self.start.replace(value),
            Target::End => self.end.replace(value),
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            FormField::Title => self.title.push(c),
            FormField::Description => self.description.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Description => {
                self.description.pop();
            }
            _ => {}
        }
    }

    /// Validate the form and build the event to insert.
    ///
    /// On success the form waits for the insert to be confirmed; on failure
    /// nothing but the focus changes.
    pub fn save(&mut self) -> Result<Event, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            self.active_field = FormField::Title;
            return Err(FormError::EmptyTitle);
        }

        let (Some(start), Some(end)) = (self.start, self.end) else {
            return Err(FormError::Unscheduled);
        };
        let start_ts = formatter::unix_seconds(&start).ok_or(FormError::NonexistentTime)?;
        let end_ts = formatter::unix_seconds(&end).ok_or(FormError::NonexistentTime)?;

        if start_ts > end_ts {
            return Err(FormError::EndBeforeStart);
        }

        let event = Event::new(
            start_ts,
            end_ts,
            title.to_string(),
            self.description.trim().to_string(),
        );
        self.phase = Phase::Saving;
        Ok(event)
    }

    pub fn insert_confirmed(&mut self) {
        self.phase = Phase::Submitted;
    }

    pub fn insert_failed(&mut self) {
        self.phase = Phase::Editing;
    }
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EventFormState) {
        let block = Block::default()
            .title(" New Event ")
            .title_style(theme::current().header)
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // description
            Constraint::Length(1), // spacer
            Constraint::Length(1), // start
            Constraint::Length(1), // end
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let active = state.active_field;
        render_row(
            frame,
            rows[0],
            "Title:",
            &[(state.title.as_str(), active == FormField::Title, true)],
        );
        render_row(
            frame,
            rows[1],
            "Notes:",
            &[(state.description.as_str(), active == FormField::Description, true)],
        );
        render_row(
            frame,
            rows[3],
            "Start:",
            &[
                (state.labels.start_date.as_str(), active == FormField::StartDate, false),
                (state.labels.start_time.as_str(), active == FormField::StartTime, false),
            ],
        );
        render_row(
            frame,
            rows[4],
            "End:",
            &[
                (state.labels.end_date.as_str(), active == FormField::EndDate, false),
                (state.labels.end_time.as_str(), active == FormField::EndTime, false),
            ],
        );

        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", theme::current().dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Pick ", theme::current().dim),
            Span::styled("^S", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Save ", theme::current().dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme::current().dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[6]);
    }
}

/// One labelled row; each part is `(text, active, is_text_input)`.
fn render_row(frame: &mut Frame, area: Rect, label: &str, parts: &[(&str, bool, bool)]) {
    let mut spans = vec![Span::styled(format!("{:<7}", label), theme::current().dim)];

    for (i, (value, active, is_text)) in parts.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let shown = if value.is_empty() && !is_text { "--" } else { *value };
        let style = if *active {
            theme::current().highlight
        } else {
            Style::default()
        };
        let cursor = if *active && *is_text { "_" } else { "" };
        spans.push(Span::styled(format!("{}{}", shown, cursor), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn launched(code: &str) -> EventFormState {
        let payload = LaunchPayload {
            day_code: Some(code.to_string()),
        };
        EventFormState::new(Some(&payload), at(2020, 1, 1, 8, 30))
    }

    fn date(year: i32, month0: u32, day: u32) -> DatePick {
        DatePick { year, month0, day }
    }

    fn time(hour: u32, minute: u32) -> TimePick {
        TimePick { hour, minute }
    }

    fn epoch(dt: NaiveDateTime) -> i64 {
        formatter::unix_seconds(&dt).unwrap()
    }

    #[test]
    fn day_code_seeds_both_ends() {
        let form = launched("202403101000");
        assert_eq!(form.start(), Some(at(2024, 3, 10, 10, 0)));
        assert_eq!(form.end(), form.start());
        assert_eq!(form.labels.start_date, "10 March 2024");
        assert_eq!(form.labels.start_time, "10:00");
        assert_eq!(form.labels.end_date, "10 March 2024");
        assert_eq!(form.labels.end_time, "10:00");
    }

    #[test]
    fn missing_or_empty_day_code_is_a_no_op() {
        let now = at(2020, 1, 1, 8, 30);
        for form in [
            EventFormState::new(None, now),
            EventFormState::new(Some(&LaunchPayload::default()), now),
            launched(""),
            launched("not-a-day"),
        ] {
            assert_eq!(form.start(), None);
            assert_eq!(form.end(), None);
            assert_eq!(form.labels, Labels::default());
            assert_eq!(form.phase(), Phase::Editing);
        }
    }

    #[test]
    fn picking_a_date_keeps_time_of_day() {
        let mut form = launched("202403101000");
        form.confirm_time(Target::Start, time(14, 45)).unwrap();
        form.confirm_date(Target::Start, date(2025, 6, 4)).unwrap();

        assert_eq!(form.start(), Some(at(2025, 7, 4, 14, 45)));
        assert_eq!(form.labels.start_date, "4 July 2025");
        assert_eq!(form.labels.start_time, "14:45");
        assert_eq!(form.end(), Some(at(2024, 3, 10, 10, 0)));
    }

    #[test]
    fn picking_a_time_keeps_date_and_seconds() {
        let payload = LaunchPayload {
            day_code: Some("20240310".into()),
        };
        let mut form = EventFormState::new(Some(&payload), at(2020, 1, 1, 8, 30));
        form.end = Some(
            NaiveDate::from_ymd_opt(2024, 3, 10)
                .unwrap()
                .and_hms_opt(9, 0, 42)
                .unwrap(),
        );

        form.confirm_time(Target::End, time(23, 5)).unwrap();

        let end = form.end().unwrap();
        assert_eq!(end.date(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 5, 42));
        assert_eq!(form.labels.end_time, "23:05");
        assert_eq!(form.labels.end_date, "10 March 2024");
    }

    #[test]
    fn month_is_zero_based_in_pickers() {
        let mut form = launched("20240115");
        let seed = form.date_picker_seed(Target::Start);
        assert_eq!(seed, date(2024, 0, 15));

        form.confirm_date(Target::Start, date(2024, 0, 20)).unwrap();
        assert_eq!(form.start().unwrap().month(), 1);

        form.confirm_date(Target::End, date(2024, 11, 31)).unwrap();
        assert_eq!(form.end().unwrap().month(), 12);
        assert_eq!(form.date_picker_seed(Target::End).month0, 11);
    }

    #[test]
    fn time_seed_reflects_current_value() {
        let form = launched("202403101000");
        assert_eq!(form.time_picker_seed(Target::End), time(10, 0));
    }

    #[test]
    fn unset_fields_seed_from_fallback() {
        let now = NaiveDate::from_ymd_opt(2021, 6, 2)
            .unwrap()
            .and_hms_opt(7, 15, 33)
            .unwrap();
        let mut form = EventFormState::new(None, now);
        assert_eq!(form.date_picker_seed(Target::Start), date(2021, 5, 2));
        assert_eq!(form.time_picker_seed(Target::End), time(7, 15));

        form.confirm_date(Target::Start, date(2021, 5, 3)).unwrap();
        assert_eq!(form.start(), Some(at(2021, 6, 3, 7, 15)));
        assert_eq!(form.labels.start_date, "3 June 2021");
        assert_eq!(form.labels.start_time, "07:15");
        assert_eq!(form.end(), None);
        assert_eq!(form.labels.end_date, "");
    }

    #[test]
    fn impossible_pick_is_rejected_without_change() {
        let mut form = launched("202403101000");
        let before = form.clone();

        assert_eq!(
            form.confirm_date(Target::Start, date(2024, 1, 30)),
            Err(FormError::InvalidDate)
        );
        assert_eq!(
            form.confirm_date(Target::Start, date(2024, 12, 1)),
            Err(FormError::InvalidDate)
        );
        assert_eq!(
            form.confirm_time(Target::End, time(24, 0)),
            Err(FormError::InvalidTime)
        );
        assert_eq!(form.start(), before.start());
        assert_eq!(form.end(), before.end());
        assert_eq!(form.labels, before.labels);
    }

    #[test]
    fn save_builds_trimmed_event() {
        let mut form = launched("202403101000");
        form.confirm_time(Target::End, time(11, 30)).unwrap();
        form.title = "  Standup ".into();
        form.description = "\tdaily sync \n".into();

        let event = form.save().unwrap();
        assert_eq!(event.id, 0);
        assert_eq!(event.title, "Standup");
        assert_eq!(event.description, "daily sync");
        assert_eq!(event.start, epoch(at(2024, 3, 10, 10, 0)));
        assert_eq!(event.end, epoch(at(2024, 3, 10, 11, 30)));
        assert_eq!(form.phase(), Phase::Saving);
    }

    #[test]
    fn equal_start_and_end_is_allowed() {
        let mut form = launched("202403101000");
        form.title = "Standup".into();
        let event = form.save().unwrap();
        assert_eq!(event.start, event.end);
        assert_eq!(event.description, "");
    }

    #[test]
    fn blank_title_refocuses_title() {
        let mut form = launched("202403101000");
        form.title = " \t ".into();
        form.active_field = FormField::EndTime;

        assert_eq!(form.save(), Err(FormError::EmptyTitle));
        assert_eq!(form.active_field, FormField::Title);
        assert_eq!(form.phase(), Phase::Editing);
    }

    #[test]
    fn blank_title_wins_over_bad_order() {
        let mut form = launched("202403101000");
        form.confirm_date(Target::End, date(2024, 2, 9)).unwrap();
        assert_eq!(form.save(), Err(FormError::EmptyTitle));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut form = launched("202403101000");
        form.title = "Standup".into();
        form.confirm_time(Target::End, time(9, 59)).unwrap();
        form.active_field = FormField::EndTime;

        assert_eq!(form.save(), Err(FormError::EndBeforeStart));
        assert_eq!(form.active_field, FormField::EndTime);
        assert_eq!(form.phase(), Phase::Editing);
        assert_eq!(form.end(), Some(at(2024, 3, 10, 9, 59)));
    }

    #[test]
    fn unscheduled_form_is_rejected() {
        let mut form = EventFormState::new(None, at(2020, 1, 1, 8, 30));
        form.title = "Standup".into();
        form.confirm_time(Target::Start, time(9, 0)).unwrap();
        assert_eq!(form.save(), Err(FormError::Unscheduled));
    }

    #[test]
    fn text_input_follows_focus() {
        let mut form = launched("20240310");
        form.input_char('H');
        form.input_char('i');
        form.active_field = form.active_field.next();
        form.input_char('x');
        form.backspace();
        form.input_char('y');
        form.active_field = FormField::StartDate;
        form.input_char('z');

        assert_eq!(form.title, "Hi");
        assert_eq!(form.description, "y");
    }

    #[test]
    fn focus_cycles_through_all_fields() {
        let mut field = FormField::Title;
        for _ in 0..6 {
            assert_eq!(field.next().prev(), field);
            field = field.next();
        }
        assert_eq!(field, FormField::Title);
    }

    #[test]
    fn renders_labels() {
        let mut form = launched("202403101000");
        form.title = "Standup".into();

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|frame| EventForm::render(frame, frame.area(), &form))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("New Event"));
        assert!(text.contains("Standup"));
        assert!(text.contains("10 March 2024"));
        assert!(text.contains("10:00"));
    }
}
