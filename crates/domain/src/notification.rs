use crate::date::day_diff;
use crate::template::TemplateGroup;
use crate::tenant::StayDates;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How far a countdown or follow-up code family reaches, in days
const WINDOW_DAYS: i64 = 30;

/// A notification code names one lifecycle message: `E-NN` counts down to
/// entry (`E-00` is the entry day), `E+NN` counts days in stay, `S-NN`
/// counts down to exit (`S-00` is the exit day) and `S+NN` counts days
/// since exit. Codes render with zero-padded two-digit offsets and are
/// matched case-insensitively against template keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCode {
    BeforeEntry(i64),
    InStay(i64),
    BeforeExit(i64),
    AfterExit(i64),
}

impl fmt::Display for NotificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationCode::BeforeEntry(n) => write!(f, "E-{:02}", n),
            NotificationCode::InStay(n) => write!(f, "E+{:02}", n),
            NotificationCode::BeforeExit(n) => write!(f, "S-{:02}", n),
            NotificationCode::AfterExit(n) => write!(f, "S+{:02}", n),
        }
    }
}

#[derive(Error, Debug)]
pub enum InvalidCodeError {
    #[error("Notification code: {0} is malformed")]
    Malformed(String),
    #[error("Notification code: {0} is outside its family's day window")]
    OutOfRange(String),
}

impl FromStr for NotificationCode {
    type Err = InvalidCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_uppercase();
        let mut chars = token.chars();
        let family = chars.next();
        let sign = chars.next();
        let digits: String = chars.collect();
        if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidCodeError::Malformed(s.to_string()));
        }
        let n: i64 = digits
            .parse()
            .map_err(|_| InvalidCodeError::Malformed(s.to_string()))?;
        let code = match (family, sign) {
            (Some('E'), Some('-')) => NotificationCode::BeforeEntry(n),
            (Some('E'), Some('+')) => NotificationCode::InStay(n),
            (Some('S'), Some('-')) => NotificationCode::BeforeExit(n),
            (Some('S'), Some('+')) => NotificationCode::AfterExit(n),
            _ => return Err(InvalidCodeError::Malformed(s.to_string())),
        };
        if code.is_in_window() {
            Ok(code)
        } else {
            Err(InvalidCodeError::OutOfRange(s.to_string()))
        }
    }
}

impl NotificationCode {
    fn is_in_window(&self) -> bool {
        match *self {
            NotificationCode::BeforeEntry(n) | NotificationCode::BeforeExit(n) => {
                (0..=WINDOW_DAYS).contains(&n)
            }
            NotificationCode::InStay(n) => n >= 1,
            NotificationCode::AfterExit(n) => (1..=WINDOW_DAYS).contains(&n),
        }
    }
}

/// Computes every notification code applicable to one tenant on one day,
/// in dispatch order, restricted to codes the template group actually
/// defines. The caller still gates each code on the same-day send log, so
/// re-evaluating within one day is harmless.
///
/// On the reservation day the countdown catch-up sweep replaces the
/// ordinary evaluation; on the entry day it precedes it. When reservation
/// and entry fall on the same day only the entry-day path runs.
pub fn plan_for_day(today: NaiveDate, stay: &StayDates, group: &TemplateGroup) -> Vec<NotificationCode> {
    // Silence before the booking becomes actionable
    if today < stay.reservation {
        return Vec::new();
    }

    if today == stay.reservation && today != stay.entry {
        return reservation_day_sweep(today, stay, group);
    }

    let mut plan = Vec::new();

    if today == stay.entry {
        // Countdown days missed before activation, descending from E-30
        for offset in group.countdown_offsets() {
            push_available(&mut plan, NotificationCode::BeforeEntry(offset), group);
        }
    }

    // In-stay codes are evaluated independently of the countdown families
    // and always dispatch before the departure code
    if stay.entry < today && today < stay.exit {
        let nights = day_diff(today, stay.entry);
        push_available(&mut plan, NotificationCode::InStay(nights), group);
    }

    if let Some(code) = base_code(today, stay) {
        push_available(&mut plan, code, group);
    }

    plan
}

/// The single code of the E-/S-/S+ families for one day. The pre-arrival
/// window wins over the pre-departure window when both contain `today`.
fn base_code(today: NaiveDate, stay: &StayDates) -> Option<NotificationCode> {
    if today < stay.reservation {
        return None;
    }
    if today <= stay.entry {
        let n = day_diff(stay.entry, today);
        if (0..=WINDOW_DAYS).contains(&n) {
            return Some(NotificationCode::BeforeEntry(n));
        }
        return None;
    }
    if today <= stay.exit {
        let m = day_diff(stay.exit, today);
        if (0..=WINDOW_DAYS).contains(&m) {
            return Some(NotificationCode::BeforeExit(m));
        }
        return None;
    }
    let k = day_diff(today, stay.exit);
    if (1..=WINDOW_DAYS).contains(&k) {
        return Some(NotificationCode::AfterExit(k));
    }
    None
}

/// A reservation landing inside the countdown window catches up every
/// countdown code from E-30 down to the one matching the remaining days.
/// `E-00` is reserved for the entry day itself.
fn reservation_day_sweep(
    today: NaiveDate,
    stay: &StayDates,
    group: &TemplateGroup,
) -> Vec<NotificationCode> {
    let remaining = day_diff(stay.entry, today);
    group
        .countdown_offsets()
        .into_iter()
        .filter(|offset| *offset >= remaining)
        .map(NotificationCode::BeforeEntry)
        .collect()
}

fn push_available(plan: &mut Vec<NotificationCode>, code: NotificationCode, group: &TemplateGroup) {
    if group.contains(&code.to_string()) && !plan.contains(&code) {
        plan.push(code);
    }
}
