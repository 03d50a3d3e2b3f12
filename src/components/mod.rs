pub mod event_form;
pub mod picker;
pub mod status_bar;

pub use event_form::EventForm;
pub use status_bar::StatusBar;
