use super::ITemplateRepo;
use crate::config::TemplateSheets;
use crate::services::google_sheets::SheetsRestApi;
use estancia_domain::{DuplicateCodePolicy, TemplateGroup, TemplateSet};
use std::sync::Arc;

pub struct SheetsTemplateRepo {
    api: Arc<SheetsRestApi>,
    spreadsheet_id: String,
    sheets: TemplateSheets,
    policy: DuplicateCodePolicy,
}

impl SheetsTemplateRepo {
    pub fn new(
        api: Arc<SheetsRestApi>,
        spreadsheet_id: String,
        sheets: TemplateSheets,
        policy: DuplicateCodePolicy,
    ) -> Self {
        Self {
            api,
            spreadsheet_id,
            sheets,
            policy,
        }
    }

    async fn load_group(&self, sheet: &str) -> anyhow::Result<TemplateGroup> {
        let range = format!("{}!A1:D999", sheet);
        let rows = self.api.values_get(&self.spreadsheet_id, &range).await?;
        Ok(TemplateGroup::from_rows(rows, self.policy))
    }
}

#[async_trait::async_trait]
impl ITemplateRepo for SheetsTemplateRepo {
    async fn find_all(&self) -> anyhow::Result<TemplateSet> {
        let (madrid, casita43, hoyo2, rrhh, long_stay) = futures::try_join!(
            self.load_group(&self.sheets.madrid),
            self.load_group(&self.sheets.casita43),
            self.load_group(&self.sheets.hoyo2),
            self.load_group(&self.sheets.rrhh),
            self.load_group(&self.sheets.long_stay),
        )?;
        Ok(TemplateSet {
            madrid,
            casita43,
            hoyo2,
            rrhh,
            long_stay,
        })
    }
}
