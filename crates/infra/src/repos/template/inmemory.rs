use super::ITemplateRepo;
use estancia_domain::TemplateSet;
use std::sync::Mutex;

pub struct InMemoryTemplateRepo {
    set: Mutex<TemplateSet>,
}

impl InMemoryTemplateRepo {
    pub fn new(set: TemplateSet) -> Self {
        Self {
            set: Mutex::new(set),
        }
    }

    /// Replaces the stored snapshot, for tests that exercise refresh.
    pub fn set_templates(&self, set: TemplateSet) {
        *self.set.lock().unwrap() = set;
    }
}

#[async_trait::async_trait]
impl ITemplateRepo for InMemoryTemplateRepo {
    async fn find_all(&self) -> anyhow::Result<TemplateSet> {
        Ok(self.set.lock().unwrap().clone())
    }
}
