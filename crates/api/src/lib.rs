mod job_schedulers;
mod notify;
mod shared;
mod status;

pub use job_schedulers::{
    millis_until_cutover, run_tick, SchedulerState, SchedulerStateHandle, TemplateCache,
};
pub use notify::process_tenants::{PassSummary, ProcessTenantsUseCase};
pub use notify::refresh_templates::RefreshTemplatesUseCase;
pub use shared::usecase::{execute, UseCase};

use actix_web::{dev::Server, middleware, web, App, HttpServer};
use estancia_infra::EstanciaContext;
use job_schedulers::{start_notification_job, start_template_refresh_job};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn new(context: EstanciaContext) -> anyhow::Result<Self> {
        // Log header and first template snapshot are bootstrap
        // requirements; failing either is fatal
        context.repos.message_log.init().await?;
        let templates = execute(RefreshTemplatesUseCase, &context)
            .await
            .map_err(anyhow::Error::new)?;
        let templates = TemplateCache::new(templates);
        let state = SchedulerStateHandle::new();

        let (server, port) = Application::configure_server(context.clone()).await?;
        Application::start_job_schedulers(context, templates, state);

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(
        context: EstanciaContext,
        templates: TemplateCache,
        state: SchedulerStateHandle,
    ) {
        start_notification_job(context.clone(), templates.clone(), state);
        start_template_refresh_job(context, templates);
    }

    async fn configure_server(context: EstanciaContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .data(ctx)
                .configure(|cfg| configure_server_api(cfg))
        })
        .listen(listener)?
        .workers(1)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
