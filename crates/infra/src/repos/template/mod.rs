mod inmemory;
mod sheets;

pub use inmemory::InMemoryTemplateRepo;
pub use sheets::SheetsTemplateRepo;

use estancia_domain::TemplateSet;

#[async_trait::async_trait]
pub trait ITemplateRepo: Send + Sync {
    /// Loads every template group as one consistent snapshot.
    async fn find_all(&self) -> anyhow::Result<TemplateSet>;
}
