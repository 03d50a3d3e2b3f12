mod app;
mod calendar;
mod cli;
mod components;
mod config;
mod event;
mod formatter;
mod logging;
mod theme;
mod tui;

use std::time::Duration;

use app::App;
use calendar::{EventStore, SqliteStore};
use chrono::Local;
use clap::Parser;
use cli::Cli;
use color_eyre::Result;
use components::event_form::Phase;
use config::Config;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    logging::init(&config::data_dir()?, config.log_level())?;
    theme::init(&config.theme);

    let db_path = match cli.database.clone() {
        Some(path) => path,
        None => config.database_path()?,
    };
    let store = SqliteStore::open(&db_path)?;
    tracing::info!(day_code = ?cli.day_code, db = %db_path.display(), "starting");

    let payload = cli.payload();
    let mut app = App::new(store, Some(&payload), Local::now().naive_local());

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    tracing::info!(
        phase = ?app.form.phase(),
        start = ?app.form.start(),
        end = ?app.form.end(),
        "screen closed"
    );

    if app.form.phase() == Phase::Submitted {
        if let Some(msg) = &app.status_message {
            println!("{msg}");
        }
    }
    result
}

fn run<S: EventStore>(terminal: &mut tui::Tui, app: &mut App<S>) -> Result<()> {
    while app.running {
        terminal.draw(|frame| {
            let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            components::EventForm::render(frame, layout[0], &app.form);

            if let Some(ref picker) = app.picker {
                picker.render(frame, layout[0]);
            }

            components::StatusBar::render(
                frame,
                layout[1],
                app.status_message.as_deref(),
                app.form.active_field,
                app.form.phase(),
            );
        })?;

        if let Some(key) = event::next_key_press(Duration::from_millis(100))? {
            // Notifications last until the next key
            app.status_message = None;

            if app.picker.is_some() {
                app.picker_key(key.code);
            } else {
                handle_form_input(app, key.code, key.modifiers);
            }
        }

        app.poll_inserts();
    }

    Ok(())
}

fn handle_form_input<S: EventStore>(app: &mut App<S>, code: KeyCode, modifiers: KeyModifiers) {
    if app.is_saving() {
        return;
    }

    match (code, modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => app.close(),
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => app.save(),
        (KeyCode::Enter, _) => {
            if app.form.active_field.is_text() {
                app.save();
            } else {
                app.open_picker();
            }
        }
        (KeyCode::Tab, _) | (KeyCode::Down, _) => {
            app.form.active_field = app.form.active_field.next();
        }
        (KeyCode::BackTab, _) | (KeyCode::Up, _) => {
            app.form.active_field = app.form.active_field.prev();
        }
        (KeyCode::Backspace, _) => app.form.backspace(),
        (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => app.form.input_char(c),
        _ => {}
    }
}
