use crate::shared::usecase::UseCase;
use chrono::NaiveDate;
use estancia_domain::{
    normalize_e164, plan_for_day, render, MessageLogEntry, MessageStatus, TemplateGroup,
    TemplateSet, Tenant,
};
use estancia_infra::EstanciaContext;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Runs one full notification pass over all active tenants, in row order.
/// Sends are strictly sequential and every real send is followed by the
/// configured pacing delay. A failure while processing one tenant never
/// aborts the rest of the pass.
#[derive(Debug)]
pub struct ProcessTenantsUseCase {
    /// The immutable template snapshot this pass reads
    pub templates: Arc<TemplateSet>,
}

#[derive(Debug, Error)]
pub enum UseCaseErrors {
    #[error("Unable to fetch tenants: {0}")]
    TenantStoreUnavailable(String),
}

#[derive(Debug, Default, PartialEq)]
pub struct PassSummary {
    pub tenants_seen: usize,
    /// Messages dispatched this pass, dry-run ones included
    pub dispatched: usize,
    /// Codes skipped because the log already had them for today
    pub duplicates: usize,
    pub failures: usize,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessTenantsUseCase {
    type Response = PassSummary;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &EstanciaContext) -> Result<Self::Response, Self::Errors> {
        let tenants = ctx
            .repos
            .tenants
            .find_all()
            .await
            .map_err(|e| UseCaseErrors::TenantStoreUnavailable(e.to_string()))?;
        let today = ctx.sys.today_in(ctx.config.timezone);

        let mut summary = PassSummary::default();
        for tenant in tenants.iter().filter(|tenant| tenant.active) {
            summary.tenants_seen += 1;
            process_tenant(tenant, today, &self.templates, ctx, &mut summary).await;
        }
        Ok(summary)
    }
}

async fn process_tenant(
    tenant: &Tenant,
    today: NaiveDate,
    templates: &TemplateSet,
    ctx: &EstanciaContext,
    summary: &mut PassSummary,
) {
    let stay = match tenant.stay() {
        Some(stay) => stay,
        None => {
            debug!("Skipping {}: lifecycle dates are incomplete", tenant.name);
            return;
        }
    };
    let recipient = match normalize_e164(&tenant.phone, &ctx.config.default_country_code) {
        Some(recipient) => recipient,
        None => {
            info!(
                "Skipping {}: phone {:?} could not be normalized",
                tenant.name, tenant.phone
            );
            return;
        }
    };

    let group = templates.group_for(&tenant.address);
    let plan = plan_for_day(today, &stay, group);
    if plan.is_empty() {
        debug!("No applicable code today for {}", recipient);
        return;
    }

    for code in plan {
        dispatch_code(&code.to_string(), tenant, &recipient, today, group, ctx, summary).await;
    }
}

async fn dispatch_code(
    code: &str,
    tenant: &Tenant,
    recipient: &str,
    today: NaiveDate,
    group: &TemplateGroup,
    ctx: &EstanciaContext,
    summary: &mut PassSummary,
) {
    match ctx
        .repos
        .message_log
        .has_sent_on_day(recipient, code, today)
        .await
    {
        Ok(true) => {
            debug!("Already sent {} to {} today", code, recipient);
            summary.duplicates += 1;
            return;
        }
        Ok(false) => {}
        Err(e) => {
            // Without a dedup answer a resend is possible, so the code
            // waits for the next tick
            error!(
                "Could not check the send log for {} / {}: {:?}",
                recipient, code, e
            );
            return;
        }
    }

    let template = match group.get(code) {
        Some(template) => template,
        None => {
            debug!("No template for code {} in the resolved group", code);
            return;
        }
    };
    let message = render(template, &tenant.name);

    let status = if ctx.config.dry_run {
        info!("[DRY] {} -> {}", recipient, code);
        summary.dispatched += 1;
        MessageStatus::Dry
    } else {
        match ctx.messenger.send_text(recipient, &message).await {
            Ok(()) => {
                info!("Sent {} to {}", code, recipient);
                summary.dispatched += 1;
                MessageStatus::Sent
            }
            Err(e) => {
                error!("Error sending {} to {}: {:?}", code, recipient, e);
                summary.failures += 1;
                MessageStatus::Error(e.to_string())
            }
        }
    };

    record_outcome(ctx, recipient, code, status).await;

    if !ctx.config.dry_run {
        actix_web::rt::time::sleep(ctx.config.send_delay).await;
    }
}

async fn record_outcome(ctx: &EstanciaContext, recipient: &str, code: &str, status: MessageStatus) {
    let entry = MessageLogEntry {
        timestamp_millis: ctx.sys.get_timestamp_millis(),
        recipient: recipient.to_string(),
        code: code.to_string(),
        status,
    };
    if let Err(e) = ctx.repos.message_log.append(&entry).await {
        // Losing a log row must not abort the pass
        error!(
            "Could not append to the send log for {} / {}: {:?}",
            recipient, code, e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::prelude::*;
    use chrono_tz::Tz;
    use estancia_domain::DuplicateCodePolicy;
    use estancia_infra::{
        Config, IMessageLogRepo, ISys, InMemoryMessageLogRepo, InMemoryMessenger,
        InMemoryTemplateRepo, InMemoryTenantRepo, Repos,
    };
    use std::time::Duration;

    pub struct StaticTimeSys {
        ts: i64,
    }

    impl StaticTimeSys {
        fn at(date: (i32, u32, u32), hour: u32) -> Self {
            // Madrid is UTC+1 on the winter dates these tests use
            let (y, m, d) = date;
            Self {
                ts: Utc.ymd(y, m, d).and_hms(hour - 1, 0, 0).timestamp_millis(),
            }
        }
    }

    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.ts
        }
    }

    fn madrid() -> Tz {
        "Europe/Madrid".parse().unwrap()
    }

    fn group_rows(codes: &[&str]) -> Vec<Vec<String>> {
        codes
            .iter()
            .map(|code| vec![code.to_string(), format!("{} hola {{{{name}}}}", code)])
            .collect()
    }

    fn template_set(codes: &[&str]) -> TemplateSet {
        TemplateSet {
            madrid: TemplateGroup::from_rows(group_rows(codes), DuplicateCodePolicy::LastWins),
            ..Default::default()
        }
    }

    fn tenant() -> Tenant {
        Tenant {
            name: "Ana García".into(),
            phone: "612345678".into(),
            reservation_date: Some(NaiveDate::from_ymd(2025, 1, 1)),
            entry_date: Some(NaiveDate::from_ymd(2025, 1, 10)),
            exit_date: Some(NaiveDate::from_ymd(2025, 1, 20)),
            active: true,
            address: "Calle Mayor 5".into(),
        }
    }

    struct TestContext {
        ctx: EstanciaContext,
        templates: TemplateSet,
        messenger: Arc<InMemoryMessenger>,
        log: Arc<InMemoryMessageLogRepo>,
    }

    fn setup(tenants: Vec<Tenant>, templates: TemplateSet, sys: StaticTimeSys) -> TestContext {
        let messenger = Arc::new(InMemoryMessenger::new());
        let log = Arc::new(InMemoryMessageLogRepo::new(madrid()));
        let repos = Repos {
            tenants: Arc::new(InMemoryTenantRepo::new(tenants)),
            templates: Arc::new(InMemoryTemplateRepo::new(templates.clone())),
            message_log: log.clone(),
        };
        let mut config = Config::new();
        config.timezone = madrid();
        config.dry_run = false;
        config.send_delay = Duration::from_millis(0);
        let ctx = EstanciaContext {
            repos,
            config,
            sys: Arc::new(sys),
            messenger: messenger.clone(),
        };
        TestContext {
            ctx,
            templates,
            messenger,
            log,
        }
    }

    fn usecase(test: &TestContext) -> ProcessTenantsUseCase {
        ProcessTenantsUseCase {
            templates: Arc::new(test.templates.clone()),
        }
    }

    #[actix_web::main]
    #[test]
    async fn a_pass_sends_and_records_and_a_second_pass_is_idempotent() {
        let templates = template_set(&["E-05", "E-00", "S-02", "S-00"]);
        let test = setup(vec![tenant()], templates, StaticTimeSys::at((2025, 1, 5), 12));

        let summary = execute(usecase(&test), &test.ctx).await.unwrap();
        assert_eq!(summary.tenants_seen, 1);
        assert_eq!(summary.dispatched, 1);
        assert_eq!(summary.failures, 0);

        let sent = test.messenger.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+34612345678");
        assert_eq!(sent[0].1, "E-05 hola Ana");

        let entries = test.log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "E-05");
        assert_eq!(entries[0].status, MessageStatus::Sent);

        // same day, same inputs: nothing more goes out
        let summary = execute(usecase(&test), &test.ctx).await.unwrap();
        assert_eq!(summary.dispatched, 0);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(test.messenger.sent().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn inactive_incomplete_and_unnormalizable_tenants_are_skipped() {
        let inactive = Tenant {
            active: false,
            ..tenant()
        };
        let incomplete = Tenant {
            reservation_date: None,
            phone: "699999999".into(),
            ..tenant()
        };
        let bad_phone = Tenant {
            phone: "abc".into(),
            ..tenant()
        };
        let templates = template_set(&["E-05"]);
        let test = setup(
            vec![inactive, incomplete, bad_phone],
            templates,
            StaticTimeSys::at((2025, 1, 5), 12),
        );

        let summary = execute(usecase(&test), &test.ctx).await.unwrap();
        // the inactive row is not even counted as seen
        assert_eq!(summary.tenants_seen, 2);
        assert_eq!(summary.dispatched, 0);
        assert!(test.messenger.sent().is_empty());
        assert!(test.log.entries().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn a_transport_error_is_logged_and_not_retried_within_the_day() {
        let templates = template_set(&["E-05"]);
        let test = setup(vec![tenant()], templates, StaticTimeSys::at((2025, 1, 5), 12));
        test.messenger.fail_for("+34612345678");

        let summary = execute(usecase(&test), &test.ctx).await.unwrap();
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.dispatched, 0);

        let entries = test.log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].status,
            MessageStatus::Error("simulated transport failure".into())
        );

        // the failed code counts as sent today, so no retry storm
        let summary = execute(usecase(&test), &test.ctx).await.unwrap();
        assert_eq!(summary.failures, 0);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(test.log.entries().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn a_failing_tenant_does_not_abort_the_rest_of_the_pass() {
        let failing = tenant();
        let healthy = Tenant {
            phone: "699999999".into(),
            ..tenant()
        };
        let templates = template_set(&["E-05"]);
        let test = setup(
            vec![failing, healthy],
            templates,
            StaticTimeSys::at((2025, 1, 5), 12),
        );
        test.messenger.fail_for("+34612345678");

        let summary = execute(usecase(&test), &test.ctx).await.unwrap();
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.dispatched, 1);
        assert_eq!(test.messenger.sent()[0].0, "+34699999999");
    }

    #[actix_web::main]
    #[test]
    async fn dry_run_simulates_and_still_blocks_a_second_send() {
        let templates = template_set(&["E-05"]);
        let mut test = setup(vec![tenant()], templates, StaticTimeSys::at((2025, 1, 5), 12));
        test.ctx.config.dry_run = true;

        let summary = execute(usecase(&test), &test.ctx).await.unwrap();
        assert_eq!(summary.dispatched, 1);
        assert!(test.messenger.sent().is_empty());
        assert_eq!(test.log.entries()[0].status, MessageStatus::Dry);

        let summary = execute(usecase(&test), &test.ctx).await.unwrap();
        assert_eq!(summary.dispatched, 0);
        assert_eq!(summary.duplicates, 1);
    }

    #[actix_web::main]
    #[test]
    async fn entry_day_catch_up_skips_codes_already_sent_today() {
        let templates = template_set(&["E-09", "E-05", "E-01", "E-00"]);
        let test = setup(
            vec![tenant()],
            templates,
            StaticTimeSys::at((2025, 1, 10), 12),
        );

        // E-09 already went out earlier today
        test.log
            .append(&MessageLogEntry {
                timestamp_millis: test.ctx.sys.get_timestamp_millis() - 1000 * 60 * 60,
                recipient: "+34612345678".into(),
                code: "E-09".into(),
                status: MessageStatus::Sent,
            })
            .await
            .unwrap();

        let summary = execute(usecase(&test), &test.ctx).await.unwrap();
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.dispatched, 3);

        let codes: Vec<String> = test
            .messenger
            .sent()
            .into_iter()
            .map(|(_, body)| body.split(' ').next().unwrap().to_string())
            .collect();
        assert_eq!(codes, vec!["E-05", "E-01", "E-00"]);
    }
}
