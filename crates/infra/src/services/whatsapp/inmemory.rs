use super::{IMessenger, SessionStatus};
use std::collections::HashSet;
use std::sync::Mutex;

/// Transport stub used in tests: records every send and can be told to
/// fail for specific recipients or to report any session state.
pub struct InMemoryMessenger {
    status: Mutex<SessionStatus>,
    sent: Mutex<Vec<(String, String)>>,
    failing: Mutex<HashSet<String>>,
}

impl InMemoryMessenger {
    pub fn new() -> Self {
        Self {
            status: Mutex::new(SessionStatus::Ready),
            sent: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    pub fn set_status(&self, status: SessionStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().insert(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMessenger for InMemoryMessenger {
    async fn session_status(&self) -> SessionStatus {
        self.status.lock().unwrap().clone()
    }

    async fn send_text(&self, recipient: &str, body: &str) -> anyhow::Result<()> {
        if self.failing.lock().unwrap().contains(recipient) {
            return Err(anyhow::Error::msg("simulated transport failure"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), body.to_string()));
        Ok(())
    }
}
