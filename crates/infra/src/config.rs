use chrono::NaiveTime;
use chrono_tz::Tz;
use estancia_domain::DuplicateCodePolicy;
use estancia_utils::create_random_secret;
use std::time::Duration;
use tracing::{info, warn};

/// Names of the five template group sheets inside the spreadsheet
#[derive(Debug, Clone)]
pub struct TemplateSheets {
    pub madrid: String,
    pub casita43: String,
    pub hoyo2: String,
    pub rrhh: String,
    pub long_stay: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Token that guards the pairing QR endpoint
    pub qr_token: String,
    /// Sheet holding the tenant rows
    pub tenants_sheet: String,
    /// Sheet holding the append-only send log
    pub log_sheet: String,
    pub template_sheets: TemplateSheets,
    /// Country calling code assumed for bare 9-digit numbers
    pub default_country_code: String,
    /// When set, sends are simulated and logged as DRY
    pub dry_run: bool,
    /// The single civil timezone every day-window decision is made in
    pub timezone: Tz,
    /// Local wall-clock time the daily cycle re-arms at
    pub cutover_time: NaiveTime,
    pub tick_interval: Duration,
    /// Pause after every real send, to stay inside transport rate limits
    pub send_delay: Duration,
    pub template_refresh_interval: Duration,
    pub duplicate_code_policy: DuplicateCodePolicy,
    pub bridge_url: String,
    pub bridge_api_key: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        let qr_token = match std::env::var("QR_TOKEN") {
            Ok(token) => token,
            Err(_) => {
                let token = create_random_secret(16);
                info!(
                    "Did not find QR_TOKEN environment variable. Generated one: {}",
                    token
                );
                token
            }
        };

        let default_timezone = "Europe/Madrid";
        let timezone = std::env::var("TIMEZONE").unwrap_or_else(|_| default_timezone.into());
        let timezone = match timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(
                    "The given TIMEZONE: {} is not valid, falling back to the default: {}.",
                    timezone, default_timezone
                );
                default_timezone.parse::<Tz>().unwrap()
            }
        };

        let default_cutover = "12:59";
        let cutover = std::env::var("CUTOVER_TIME").unwrap_or_else(|_| default_cutover.into());
        let cutover_time = match NaiveTime::parse_from_str(&cutover, "%H:%M") {
            Ok(time) => time,
            Err(_) => {
                warn!(
                    "The given CUTOVER_TIME: {} is not valid, falling back to the default: {}.",
                    cutover, default_cutover
                );
                NaiveTime::parse_from_str(default_cutover, "%H:%M").unwrap()
            }
        };

        let duplicate_code_policy = match std::env::var("TEMPLATE_DUPLICATE_CODE_POLICY") {
            Ok(policy) if policy.eq_ignore_ascii_case("first") => DuplicateCodePolicy::FirstWins,
            Ok(policy) if policy.eq_ignore_ascii_case("last") => DuplicateCodePolicy::LastWins,
            Ok(policy) => {
                warn!(
                    "The given TEMPLATE_DUPLICATE_CODE_POLICY: {} is not valid, falling back to: last.",
                    policy
                );
                DuplicateCodePolicy::LastWins
            }
            Err(_) => DuplicateCodePolicy::LastWins,
        };

        Self {
            port: env_parsed("PORT", 8080) as usize,
            qr_token,
            tenants_sheet: env_or("TENANTS_SHEET", "INQUILINOS NOTIFICACIONES"),
            log_sheet: env_or("LOG_SHEET", "LOG"),
            template_sheets: TemplateSheets {
                madrid: env_or("TEMPLATE_SHEET_MADRID", "CORTA ESTANCIA MADRID"),
                casita43: env_or("TEMPLATE_SHEET_C43", "CORTA ESTANCIA C43"),
                hoyo2: env_or("TEMPLATE_SHEET_H2", "CORTA ESTANCIA H2"),
                rrhh: env_or("TEMPLATE_SHEET_RRHH", "RRHH"),
                long_stay: env_or("TEMPLATE_SHEET_LONG_STAY", "LARGA ESTANCIA"),
            },
            default_country_code: env_or("DEFAULT_COUNTRY_CODE", "34"),
            dry_run: env_or("DRY_RUN", "false").eq_ignore_ascii_case("true"),
            timezone,
            cutover_time,
            tick_interval: Duration::from_secs(env_parsed("TICK_INTERVAL_SECS", 60)),
            send_delay: Duration::from_millis(env_parsed("SEND_DELAY_MS", 600)),
            template_refresh_interval: Duration::from_secs(env_parsed(
                "TEMPLATE_REFRESH_SECS",
                5 * 60,
            )),
            duplicate_code_policy,
            bridge_url: env_or("WHATSAPP_BRIDGE_URL", "http://localhost:3000"),
            bridge_api_key: std::env::var("WHATSAPP_BRIDGE_API_KEY").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.into())
}

fn env_parsed(var: &str, default: u64) -> u64 {
    let value = std::env::var(var).unwrap_or_else(|_| default.to_string());
    match value.parse::<u64>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                var, value, default
            );
            default
        }
    }
}
