// session.rs — Per-session state lifecycle

use crate::history::InteractionHistory;
use uuid::Uuid;

/// Created when a user session starts, discarded when it ends. Owns the
/// interaction history; single writer, so an append is atomic with respect
/// to `recent()` readers.
pub struct Session {
    id: String,
    history: InteractionHistory,
}

impl Session {
    pub fn new() -> Self {
        let id = Uuid::new_v4().to_string();
        tracing::info!("Started session {}", id);

        Self {
            id,
            history: InteractionHistory::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn history(&self) -> &InteractionHistory {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut InteractionHistory {
        &mut self.history
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
