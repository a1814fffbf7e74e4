use super::IMessageLogRepo;
use chrono::NaiveDate;
use chrono_tz::Tz;
use estancia_domain::{civil_day_at, MessageLogEntry};
use std::sync::Mutex;

pub struct InMemoryMessageLogRepo {
    entries: Mutex<Vec<MessageLogEntry>>,
    tz: Tz,
}

impl InMemoryMessageLogRepo {
    pub fn new(tz: Tz) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            tz,
        }
    }

    pub fn entries(&self) -> Vec<MessageLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IMessageLogRepo for InMemoryMessageLogRepo {
    async fn init(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn has_sent_on_day(
        &self,
        recipient: &str,
        code: &str,
        day: NaiveDate,
    ) -> anyhow::Result<bool> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().any(|entry| {
            entry.recipient == recipient
                && entry.code.eq_ignore_ascii_case(code)
                && civil_day_at(entry.timestamp_millis, self.tz) == day
        }))
    }

    async fn append(&self, entry: &MessageLogEntry) -> anyhow::Result<()> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::prelude::*;
    use estancia_domain::MessageStatus;

    fn repo() -> InMemoryMessageLogRepo {
        InMemoryMessageLogRepo::new("Europe/Madrid".parse().unwrap())
    }

    fn entry_at(ts: i64, status: MessageStatus) -> MessageLogEntry {
        MessageLogEntry {
            timestamp_millis: ts,
            recipient: "+34612345678".into(),
            code: "E-05".into(),
            status,
        }
    }

    #[tokio::test]
    async fn any_status_counts_as_sent_on_that_day() {
        let repo = repo();
        let day = NaiveDate::from_ymd(2025, 1, 5);
        let noon = Utc.ymd(2025, 1, 5).and_hms(11, 0, 0).timestamp_millis();

        for status in vec![
            MessageStatus::Sent,
            MessageStatus::Dry,
            MessageStatus::Error("boom".into()),
        ] {
            let repo = self::repo();
            repo.append(&entry_at(noon, status)).await.unwrap();
            assert!(repo.has_sent_on_day("+34612345678", "E-05", day).await.unwrap());
        }

        // untouched repo knows nothing
        assert!(!repo.has_sent_on_day("+34612345678", "E-05", day).await.unwrap());
    }

    #[tokio::test]
    async fn the_day_boundary_follows_the_configured_timezone() {
        let repo = repo();
        // 23:30 UTC on Jan 5 is already Jan 6 in Madrid
        let ts = Utc.ymd(2025, 1, 5).and_hms(23, 30, 0).timestamp_millis();
        repo.append(&entry_at(ts, MessageStatus::Sent)).await.unwrap();

        assert!(!repo
            .has_sent_on_day("+34612345678", "E-05", NaiveDate::from_ymd(2025, 1, 5))
            .await
            .unwrap());
        assert!(repo
            .has_sent_on_day("+34612345678", "E-05", NaiveDate::from_ymd(2025, 1, 6))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn other_codes_and_recipients_do_not_match() {
        let repo = repo();
        let noon = Utc.ymd(2025, 1, 5).and_hms(11, 0, 0).timestamp_millis();
        repo.append(&entry_at(noon, MessageStatus::Sent)).await.unwrap();

        let day = NaiveDate::from_ymd(2025, 1, 5);
        assert!(!repo.has_sent_on_day("+34612345678", "E-04", day).await.unwrap());
        assert!(!repo.has_sent_on_day("+34699999999", "E-05", day).await.unwrap());
        // matching is case-insensitive on the code token
        assert!(repo.has_sent_on_day("+34612345678", "e-05", day).await.unwrap());
    }
}
