mod telemetry;

use estancia_api::Application;
use estancia_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("estancia".into(), "info".into());
    init_subscriber(subscriber);

    log_boot_diagnostics();

    let context = setup_context().await?;
    info!(
        "Daily cycle configured: timezone {}, cutover {}, dry_run {}",
        context.config.timezone, context.config.cutover_time, context.config.dry_run
    );

    let app = Application::new(context).await?;
    app.start().await?;
    Ok(())
}

fn log_boot_diagnostics() {
    let creds_source = if std::env::var("GOOGLE_CREDS_JSON").is_ok() {
        "GOOGLE_CREDS_JSON"
    } else if std::env::var("GOOGLE_CREDS_JSON_B64").is_ok() {
        "GOOGLE_CREDS_JSON_B64"
    } else {
        "credentials file"
    };
    info!(
        "Booting: credentials from {}, bridge at {}",
        creds_source,
        std::env::var("WHATSAPP_BRIDGE_URL").unwrap_or_else(|_| "default".into())
    );
}
