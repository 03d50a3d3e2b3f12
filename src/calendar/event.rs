/// A calendar entry as handed to storage.
///
/// Only the store assigns `id`; a freshly built event always carries 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub start: i64,
    pub end: i64,
    pub title: String,
    pub description: String,
}

impl Event {
    pub fn new(start: i64, end: i64, title: String, description: String) -> Self {
        Self {
            id: 0,
            start,
            end,
            title,
            description,
        }
    }
}
