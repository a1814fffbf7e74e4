use crate::shared::usecase::UseCase;
use estancia_domain::TemplateSet;
use estancia_infra::EstanciaContext;
use thiserror::Error;

/// Loads a fresh immutable snapshot of every template group. The snapshot
/// replaces the previous one wholesale, so a tick never observes a
/// partially refreshed template set.
#[derive(Debug)]
pub struct RefreshTemplatesUseCase;

#[derive(Debug, Error)]
pub enum UseCaseErrors {
    #[error("Unable to load template groups: {0}")]
    TemplateStoreUnavailable(String),
}

#[async_trait::async_trait(?Send)]
impl UseCase for RefreshTemplatesUseCase {
    type Response = TemplateSet;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &EstanciaContext) -> Result<Self::Response, Self::Errors> {
        ctx.repos
            .templates
            .find_all()
            .await
            .map_err(|e| UseCaseErrors::TemplateStoreUnavailable(e.to_string()))
    }
}
