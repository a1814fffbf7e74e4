use super::ITenantRepo;
use estancia_domain::Tenant;
use std::sync::Mutex;

pub struct InMemoryTenantRepo {
    tenants: Mutex<Vec<Tenant>>,
}

impl InMemoryTenantRepo {
    pub fn new(tenants: Vec<Tenant>) -> Self {
        Self {
            tenants: Mutex::new(tenants),
        }
    }
}

#[async_trait::async_trait]
impl ITenantRepo for InMemoryTenantRepo {
    async fn find_all(&self) -> anyhow::Result<Vec<Tenant>> {
        Ok(self.tenants.lock().unwrap().clone())
    }
}
