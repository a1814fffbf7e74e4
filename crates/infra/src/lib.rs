mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, TemplateSheets};
pub use repos::{
    IMessageLogRepo, ITemplateRepo, ITenantRepo, InMemoryMessageLogRepo, InMemoryTemplateRepo,
    InMemoryTenantRepo, Repos,
};
pub use services::{
    IMessenger, InMemoryMessenger, ServiceAccountAuth, ServiceAccountKey, SessionStatus,
    SheetsRestApi, WhatsAppRestApi,
};
pub use system::{ISys, RealSys};

use std::sync::Arc;

#[derive(Clone)]
pub struct EstanciaContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub messenger: Arc<dyn IMessenger>,
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<EstanciaContext> {
    let config = Config::new();
    let auth = ServiceAccountAuth::from_env()?;
    let api = Arc::new(SheetsRestApi::new(auth));
    let repos = Repos::create_sheets(api, &get_spreadsheet_id(), &config);
    let messenger = Arc::new(WhatsAppRestApi::new(
        config.bridge_url.clone(),
        config.bridge_api_key.clone(),
    ));
    Ok(EstanciaContext {
        repos,
        config,
        sys: Arc::new(RealSys {}),
        messenger,
    })
}

fn get_spreadsheet_id() -> String {
    const SPREADSHEET_ID: &str = "SPREADSHEET_ID";

    std::env::var(SPREADSHEET_ID)
        .unwrap_or_else(|_| panic!("{} env var to be present.", SPREADSHEET_ID))
}
