use crate::notify::process_tenants::ProcessTenantsUseCase;
use crate::notify::refresh_templates::RefreshTemplatesUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::{interval, sleep};
use chrono::prelude::*;
use chrono::LocalResult;
use chrono_tz::Tz;
use estancia_domain::TemplateSet;
use estancia_infra::{EstanciaContext, SessionStatus};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tracing::{info, warn};

/// Scheduler lifecycle, one explicit value inspected at the top of every
/// tick and transitioned by discrete events: readiness observed,
/// disconnect observed, pass completed, cutover wakeup fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Transport session not ready; ticks are no-ops
    NotReady,
    /// The next tick runs a full pass
    Ready,
    /// A pass completed; ticks are no-ops until the cutover wakeup fires
    Sleeping,
}

#[derive(Clone)]
pub struct SchedulerStateHandle(Arc<Mutex<SchedulerState>>);

impl SchedulerStateHandle {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(SchedulerState::NotReady)))
    }

    pub fn current(&self) -> SchedulerState {
        *self.0.lock().unwrap()
    }

    pub fn transition(&self, state: SchedulerState) {
        let mut current = self.0.lock().unwrap();
        if *current != state {
            info!("Scheduler state: {:?} -> {:?}", *current, state);
        }
        *current = state;
    }
}

impl Default for SchedulerStateHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// The template snapshot shared between the refresh job and the tick loop.
/// A tick clones the inner `Arc` once and reads one fully-loaded snapshot
/// for the whole pass; the refresh job swaps the snapshot wholesale.
#[derive(Clone)]
pub struct TemplateCache(Arc<RwLock<Arc<TemplateSet>>>);

impl TemplateCache {
    pub fn new(set: TemplateSet) -> Self {
        Self(Arc::new(RwLock::new(Arc::new(set))))
    }

    pub fn snapshot(&self) -> Arc<TemplateSet> {
        self.0.read().unwrap().clone()
    }

    pub fn store(&self, set: TemplateSet) {
        *self.0.write().unwrap() = Arc::new(set);
    }
}

pub fn start_notification_job(
    ctx: EstanciaContext,
    templates: TemplateCache,
    state: SchedulerStateHandle,
) {
    actix_web::rt::spawn(async move {
        let mut tick_interval = interval(ctx.config.tick_interval);
        loop {
            tick_interval.tick().await;
            run_tick(&ctx, &templates, &state).await;
        }
    });
}

pub fn start_template_refresh_job(ctx: EstanciaContext, templates: TemplateCache) {
    actix_web::rt::spawn(async move {
        let mut refresh_interval = interval(ctx.config.template_refresh_interval);
        // the cache was already seeded at bootstrap
        refresh_interval.tick().await;
        loop {
            refresh_interval.tick().await;
            match execute(RefreshTemplatesUseCase, &ctx).await {
                Ok(set) => templates.store(set),
                Err(e) => warn!("Keeping the previous template snapshot: {:?}", e),
            }
        }
    });
}

/// One tick of the daily cycle. Skips entirely while sleeping or while the
/// transport session is away; otherwise runs a full pass and then sleeps
/// the cycle until the next local cutover time.
pub async fn run_tick(
    ctx: &EstanciaContext,
    templates: &TemplateCache,
    state: &SchedulerStateHandle,
) {
    if state.current() == SchedulerState::Sleeping {
        return;
    }
    match ctx.messenger.session_status().await {
        SessionStatus::Ready => state.transition(SchedulerState::Ready),
        status => {
            warn!("Transport session not ready ({:?}), skipping tick", status);
            state.transition(SchedulerState::NotReady);
            return;
        }
    }

    let usecase = ProcessTenantsUseCase {
        templates: templates.snapshot(),
    };
    match execute(usecase, ctx).await {
        Ok(summary) => info!("Notification pass done: {:?}", summary),
        // The tenant store was unavailable; retry on the next tick
        // instead of sleeping the day away
        Err(_) => return,
    }

    let now = ctx.sys.get_timestamp_millis();
    let sleep_ms = millis_until_cutover(now, ctx.config.timezone, ctx.config.cutover_time);
    info!(
        "All of today's messages are handled. Sleeping until the next {} cutover ({} minutes away)",
        ctx.config.cutover_time,
        sleep_ms / 1000 / 60
    );
    state.transition(SchedulerState::Sleeping);
    let state = state.clone();
    actix_web::rt::spawn(async move {
        sleep(Duration::from_millis(sleep_ms as u64)).await;
        info!("Cutover reached, resuming the daily cycle");
        state.transition(SchedulerState::Ready);
    });
}

/// Milliseconds from `now` until the next occurrence of the local cutover
/// wall-clock time in `tz`. When the cutover already passed today, the
/// target is tomorrow's occurrence.
pub fn millis_until_cutover(now_millis: i64, tz: Tz, cutover: NaiveTime) -> i64 {
    let now = Utc.timestamp_millis(now_millis).with_timezone(&tz);
    let local_now = now.naive_local();
    let mut target_day = local_now.date();
    if local_now.time() >= cutover {
        target_day = target_day.succ();
    }
    let naive_target = target_day.and_time(cutover);
    let target = match tz.from_local_datetime(&naive_target) {
        LocalResult::Single(target) => target,
        // Fell on a repeated clock hour; the first occurrence wins
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Fell inside a spring-forward gap; push past the missing hour
        LocalResult::None => tz
            .from_local_datetime(&(naive_target + chrono::Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| now + chrono::Duration::days(1)),
    };
    (target.timestamp_millis() - now_millis).max(0)
}
