mod inmemory;
mod sheets;

pub use inmemory::InMemoryMessageLogRepo;
pub use sheets::SheetsMessageLogRepo;

use chrono::NaiveDate;
use estancia_domain::MessageLogEntry;

/// The append-only send log, which doubles as the same-day dedup gateway.
/// Entries are never mutated or deleted.
#[async_trait::async_trait]
pub trait IMessageLogRepo: Send + Sync {
    /// Writes the log header when the log is still empty. Idempotent.
    async fn init(&self) -> anyhow::Result<()>;

    /// Whether any entry for `(recipient, code)` was appended on `day`,
    /// regardless of its status: failed and dry-run sends also block a
    /// second attempt within the same calendar day.
    async fn has_sent_on_day(
        &self,
        recipient: &str,
        code: &str,
        day: NaiveDate,
    ) -> anyhow::Result<bool>;

    async fn append(&self, entry: &MessageLogEntry) -> anyhow::Result<()>;
}
