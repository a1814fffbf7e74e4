use super::ITenantRepo;
use crate::services::google_sheets::SheetsRestApi;
use estancia_domain::{parse_civil_date, Tenant};
use std::sync::Arc;

// Column layout of the tenants sheet (0-based):
// A name, B phone, C entry, D exit, E reservation, F active, G address
const COL_NAME: usize = 0;
const COL_PHONE: usize = 1;
const COL_ENTRY: usize = 2;
const COL_EXIT: usize = 3;
const COL_RESERVATION: usize = 4;
const COL_ACTIVE: usize = 5;
const COL_ADDRESS: usize = 6;

pub struct SheetsTenantRepo {
    api: Arc<SheetsRestApi>,
    spreadsheet_id: String,
    sheet: String,
}

impl SheetsTenantRepo {
    pub fn new(api: Arc<SheetsRestApi>, spreadsheet_id: String, sheet: String) -> Self {
        Self {
            api,
            spreadsheet_id,
            sheet,
        }
    }
}

#[async_trait::async_trait]
impl ITenantRepo for SheetsTenantRepo {
    async fn find_all(&self) -> anyhow::Result<Vec<Tenant>> {
        let range = format!("{}!A1:Z10000", self.sheet);
        let rows = self.api.values_get(&self.spreadsheet_id, &range).await?;
        // The first row is the tenant table header
        if rows.len() < 2 {
            return Ok(Vec::new());
        }
        Ok(rows.iter().skip(1).map(|row| tenant_from_row(row)).collect())
    }
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).map(|c| c.trim().to_string()).unwrap_or_default()
}

fn tenant_from_row(row: &[String]) -> Tenant {
    Tenant {
        name: cell(row, COL_NAME),
        phone: cell(row, COL_PHONE),
        entry_date: parse_civil_date(&cell(row, COL_ENTRY)),
        exit_date: parse_civil_date(&cell(row, COL_EXIT)),
        reservation_date: parse_civil_date(&cell(row, COL_RESERVATION)),
        active: cell(row, COL_ACTIVE).eq_ignore_ascii_case("true"),
        address: cell(row, COL_ADDRESS),
    }
}
