mod inmemory;
mod sheets;

pub use inmemory::InMemoryTenantRepo;
pub use sheets::SheetsTenantRepo;

use estancia_domain::Tenant;

#[async_trait::async_trait]
pub trait ITenantRepo: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<Tenant>>;
}
