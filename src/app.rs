use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use tokio::sync::mpsc;

use crate::calendar::{Event, EventStore, StoreError};
use crate::components::event_form::{EventFormState, FormField, LaunchPayload, Phase, Target};
use crate::components::picker::{Picker, PickerOutcome, PickerValue};

type InsertOutcome = Result<i64, StoreError>;

pub struct App<S: EventStore> {
    pub running: bool,
    pub form: EventFormState,
    pub picker: Option<Picker>,
    pub status_message: Option<String>,
    store: Arc<Mutex<S>>,
    outcome_tx: mpsc::UnboundedSender<InsertOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<InsertOutcome>,
}

impl<S: EventStore> App<S> {
    pub fn new(store: S, payload: Option<&LaunchPayload>, now: NaiveDateTime) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            form: EventFormState::new(payload, now),
            picker: None,
            status_message: None,
            store: Arc::new(Mutex::new(store)),
            outcome_tx,
            outcome_rx,
        }
    }

    /// Whether an insert is in flight. The form is frozen until it settles.
    pub fn is_saving(&self) -> bool {
        self.form.phase() == Phase::Saving
    }

    /// Open the picker belonging to the focused field, if it has one.
    pub fn open_picker(&mut self) {
        if self.is_saving() {
            return;
        }
        let picker = match self.form.active_field {
            FormField::StartDate => Picker::date(&self.form, Target::Start),
            FormField::StartTime => Picker::time(&self.form, Target::Start),
            FormField::EndDate => Picker::date(&self.form, Target::End),
            FormField::EndTime => Picker::time(&self.form, Target::End),
            FormField::Title | FormField::Description => return,
        };
        self.picker = Some(picker);
    }

    pub fn picker_key(&mut self, code: crossterm::event::KeyCode) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };

        match picker.on_key(code) {
            PickerOutcome::Pending => {}
            PickerOutcome::Cancelled => self.picker = None,
            PickerOutcome::Confirmed(target, value) => {
                self.picker = None;
                let merged = match value {
                    PickerValue::Date(pick) => self.form.confirm_date(target, pick),
                    PickerValue::Time(pick) => self.form.confirm_time(target, pick),
                };
                if let Err(err) = merged {
                    self.status_message = Some(err.to_string());
                }
            }
        }
    }

    /// Validate the form and, if it passes, hand the event to storage.
    pub fn save(&mut self) {
        if self.form.phase() != Phase::Editing {
            tracing::debug!(phase = ?self.form.phase(), "save ignored");
            return;
        }

        match self.form.save() {
            Ok(event) => self.dispatch_insert(event),
            Err(err) => {
                tracing::debug!(%err, "event rejected");
                self.status_message = Some(err.to_string());
            }
        }
    }

    fn dispatch_insert(&self, event: Event) {
        tracing::info!(
            title = %event.title,
            start = event.start,
            end = event.end,
            "inserting event"
        );
        let store = Arc::clone(&self.store);
        let tx = self.outcome_tx.clone();
        tokio::task::spawn_blocking(move || {
            let outcome = match store.lock() {
                Ok(mut store) => store.insert(&event),
                Err(poisoned) => poisoned.into_inner().insert(&event),
            };
            let _ = tx.send(outcome);
        });
    }

    /// Apply any insert results that arrived since the last call.
    pub fn poll_inserts(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.on_insert_outcome(outcome);
        }
    }

    fn on_insert_outcome(&mut self, outcome: InsertOutcome) {
        match outcome {
            Ok(id) => {
                tracing::info!(id, "event inserted");
                self.form.insert_confirmed();
                self.status_message = Some("Event added".to_string());
                self.running = false;
            }
            Err(err) => {
                tracing::error!(%err, "event insert failed");
                self.form.insert_failed();
                self.status_message = Some("Failed to save event".to_string());
            }
        }
    }

    /// Leave the screen, unless an insert has yet to report back.
    pub fn close(&mut self) {
        if self.is_saving() {
            tracing::debug!("close ignored while saving");
            return;
        }
        self.running = false;
    }
}
