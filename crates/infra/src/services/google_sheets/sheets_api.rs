use super::auth_provider::ServiceAccountAuth;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;
use url::Url;

const SHEETS_API_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    major_dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<Vec<String>>>,
}

/// Thin client for the `spreadsheets.values` endpoints. Ranges use the
/// `SHEET NAME!A1:D999` notation and are percent-encoded into the path.
pub struct SheetsRestApi {
    client: Client,
    auth: ServiceAccountAuth,
}

impl SheetsRestApi {
    pub fn new(auth: ServiceAccountAuth) -> Self {
        let client = Client::new();

        Self { client, auth }
    }

    fn values_url(&self, spreadsheet_id: &str, tail: &str) -> String {
        let mut url = Url::parse(SHEETS_API_BASE_URL).expect("Valid sheets api base url");
        url.path_segments_mut()
            .expect("Sheets api base url to have a path")
            .push(spreadsheet_id)
            .push("values")
            .push(tail);
        url.into_string()
    }

    /// Reads a range. A missing or empty range yields zero rows, not an
    /// error.
    pub async fn values_get(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> anyhow::Result<Vec<Vec<String>>> {
        let token = self.auth.access_token().await?;
        let url = self.values_url(spreadsheet_id, range);
        match self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {}", token))
            .send()
            .await
        {
            Ok(res) => {
                let body = res.json::<ValueRange>().await.map_err(|e| {
                    error!(
                        "[Unexpected Response] Sheets API values get error for range: {}. Error message: {:?}",
                        range, e
                    );
                    anyhow::Error::new(e)
                })?;
                Ok(body.values.unwrap_or_default())
            }
            Err(e) => {
                error!(
                    "[Network Error] Sheets API values get error for range: {}. Error message: {:?}",
                    range, e
                );
                Err(anyhow::Error::new(e))
            }
        }
    }

    /// Appends one row after the last row of the range's table.
    pub async fn values_append(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> anyhow::Result<()> {
        let mut url = Url::parse(&self.values_url(spreadsheet_id, &format!("{}:append", range)))
            .expect("Valid sheets api values url");
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = ValueRange {
            range: None,
            major_dimension: None,
            values: Some(rows),
        };
        self.post_values(url, &body, range).await
    }

    /// Overwrites the cells of the range.
    pub async fn values_update(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> anyhow::Result<()> {
        let token = self.auth.access_token().await?;
        let mut url = Url::parse(&self.values_url(spreadsheet_id, range))
            .expect("Valid sheets api values url");
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = ValueRange {
            range: Some(range.to_string()),
            major_dimension: None,
            values: Some(rows),
        };
        match self
            .client
            .put(url.as_str())
            .header("authorization", format!("Bearer {}", token))
            .json(&body)
            .send()
            .await
        {
            Ok(res) => {
                res.error_for_status().map_err(|e| {
                    error!(
                        "[Unexpected Response] Sheets API values update error for range: {}. Error message: {:?}",
                        range, e
                    );
                    anyhow::Error::new(e)
                })?;
                Ok(())
            }
            Err(e) => {
                error!(
                    "[Network Error] Sheets API values update error for range: {}. Error message: {:?}",
                    range, e
                );
                Err(anyhow::Error::new(e))
            }
        }
    }

    async fn post_values(&self, url: Url, body: &ValueRange, range: &str) -> anyhow::Result<()> {
        let token = self.auth.access_token().await?;
        match self
            .client
            .post(url.as_str())
            .header("authorization", format!("Bearer {}", token))
            .json(body)
            .send()
            .await
        {
            Ok(res) => {
                res.error_for_status().map_err(|e| {
                    error!(
                        "[Unexpected Response] Sheets API values append error for range: {}. Error message: {:?}",
                        range, e
                    );
                    anyhow::Error::new(e)
                })?;
                Ok(())
            }
            Err(e) => {
                error!(
                    "[Network Error] Sheets API values append error for range: {}. Error message: {:?}",
                    range, e
                );
                Err(anyhow::Error::new(e))
            }
        }
    }
}
