use crate::model::{Button, Call};

/// Number of calls kept when history is written out
pub const HISTORY_LIMIT: usize = 50;

/// In-memory buttons and call history, newest first
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    buttons: Vec<Button>,
    calls: Vec<Call>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already ordered collections
    pub fn from_parts(buttons: Vec<Button>, calls: Vec<Call>) -> Self {
        Self { buttons, calls }
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn button(&self, id: &str) -> Option<&Button> {
        self.buttons.iter().find(|b| b.id == id)
    }

    pub fn call(&self, id: &str) -> Option<&Call> {
        self.calls.iter().find(|c| c.id == id)
    }

    pub fn add_button(&mut self, button: Button) {
        tracing::debug!("Adding button {} ({})", button.name, button.id);
        self.buttons.insert(0, button);
    }

    /// Remove a button together with every call made for it
    pub fn remove_button(&mut self, id: &str) -> Option<Button> {
        let index = self.buttons.iter().position(|b| b.id == id)?;
        let button = self.buttons.remove(index);

        let before = self.calls.len();
        self.calls.retain(|call| call.button_id != id);

        tracing::debug!(
            "Removed button {} and {} related call(s)",
            id,
            before - self.calls.len()
        );

        Some(button)
    }

    pub fn add_call(&mut self, call: Call) {
        self.calls.insert(0, call);
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// The slice of history that gets persisted
    pub fn persisted_calls(&self) -> &[Call] {
        &self.calls[..self.calls.len().min(HISTORY_LIMIT)]
    }
}
