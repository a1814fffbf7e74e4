mod message_log;
mod template;
mod tenant;

pub use message_log::{IMessageLogRepo, InMemoryMessageLogRepo, SheetsMessageLogRepo};
pub use template::{ITemplateRepo, InMemoryTemplateRepo, SheetsTemplateRepo};
pub use tenant::{ITenantRepo, InMemoryTenantRepo, SheetsTenantRepo};

use crate::config::Config;
use crate::services::google_sheets::SheetsRestApi;
use chrono_tz::Tz;
use estancia_domain::{TemplateSet, Tenant};
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub tenants: Arc<dyn ITenantRepo>,
    pub templates: Arc<dyn ITemplateRepo>,
    pub message_log: Arc<dyn IMessageLogRepo>,
}

impl Repos {
    pub fn create_sheets(api: Arc<SheetsRestApi>, spreadsheet_id: &str, config: &Config) -> Self {
        Self {
            tenants: Arc::new(SheetsTenantRepo::new(
                api.clone(),
                spreadsheet_id.to_string(),
                config.tenants_sheet.clone(),
            )),
            templates: Arc::new(SheetsTemplateRepo::new(
                api.clone(),
                spreadsheet_id.to_string(),
                config.template_sheets.clone(),
                config.duplicate_code_policy,
            )),
            message_log: Arc::new(SheetsMessageLogRepo::new(
                api,
                spreadsheet_id.to_string(),
                config.log_sheet.clone(),
                config.timezone,
            )),
        }
    }

    pub fn create_inmemory(tenants: Vec<Tenant>, templates: TemplateSet, tz: Tz) -> Self {
        Self {
            tenants: Arc::new(InMemoryTenantRepo::new(tenants)),
            templates: Arc::new(InMemoryTemplateRepo::new(templates)),
            message_log: Arc::new(InMemoryMessageLogRepo::new(tz)),
        }
    }
}
