mod inmemory;
mod rest_api;

pub use inmemory::InMemoryMessenger;
pub use rest_api::WhatsAppRestApi;

/// Lifecycle state of the messaging session as reported by the bridge.
/// The scheduler only acts while the session is `Ready`; reconnecting is
/// the bridge's responsibility, not this component's.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Ready,
    Disconnected,
    WaitingForPairing { qr: Option<String> },
}

#[async_trait::async_trait]
pub trait IMessenger: Send + Sync {
    async fn session_status(&self) -> SessionStatus;
    async fn send_text(&self, recipient: &str, body: &str) -> anyhow::Result<()>;
}
