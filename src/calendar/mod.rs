pub mod event;
pub mod store;

pub use event::Event;
pub use store::{EventStore, SqliteStore, StoreError};
