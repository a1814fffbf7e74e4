use super::IMessageLogRepo;
use crate::services::google_sheets::SheetsRestApi;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use estancia_domain::MessageLogEntry;
use std::sync::Arc;

const LOG_HEADER: [&str; 4] = ["timestamp", "number", "code", "status"];

pub struct SheetsMessageLogRepo {
    api: Arc<SheetsRestApi>,
    spreadsheet_id: String,
    sheet: String,
    /// Timezone the same-day check is evaluated in
    tz: Tz,
}

impl SheetsMessageLogRepo {
    pub fn new(api: Arc<SheetsRestApi>, spreadsheet_id: String, sheet: String, tz: Tz) -> Self {
        Self {
            api,
            spreadsheet_id,
            sheet,
            tz,
        }
    }
}

#[async_trait::async_trait]
impl IMessageLogRepo for SheetsMessageLogRepo {
    async fn init(&self) -> anyhow::Result<()> {
        let header_range = format!("{}!A1:D1", self.sheet);
        match self.api.values_get(&self.spreadsheet_id, &header_range).await {
            Ok(rows) if !rows.is_empty() => Ok(()),
            _ => {
                let header = LOG_HEADER.iter().map(|h| h.to_string()).collect();
                self.api
                    .values_update(&self.spreadsheet_id, &header_range, vec![header])
                    .await
            }
        }
    }

    async fn has_sent_on_day(
        &self,
        recipient: &str,
        code: &str,
        day: NaiveDate,
    ) -> anyhow::Result<bool> {
        let range = format!("{}!A1:D2000", self.sheet);
        let rows = self.api.values_get(&self.spreadsheet_id, &range).await?;
        for row in rows.iter().skip(1) {
            let entry_recipient = row.get(1).map(String::as_str).unwrap_or("");
            let entry_code = row.get(2).map(String::as_str).unwrap_or("");
            if entry_recipient != recipient || !entry_code.trim().eq_ignore_ascii_case(code) {
                continue;
            }
            let timestamp = row.get(0).map(String::as_str).unwrap_or("");
            if let Ok(instant) = DateTime::parse_from_rfc3339(timestamp) {
                if instant.with_timezone(&self.tz).naive_local().date() == day {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    async fn append(&self, entry: &MessageLogEntry) -> anyhow::Result<()> {
        let range = format!("{}!A:D", self.sheet);
        let timestamp = Utc.timestamp_millis(entry.timestamp_millis).to_rfc3339();
        let row = vec![
            timestamp,
            entry.recipient.clone(),
            entry.code.clone(),
            entry.status.to_string(),
        ];
        self.api
            .values_append(&self.spreadsheet_id, &range, vec![row])
            .await
    }
}
