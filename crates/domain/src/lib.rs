mod date;
mod message_log;
mod notification;
mod phone;
mod template;
mod tenant;

pub use date::{civil_day_at, day_diff, parse_civil_date};
pub use message_log::{MessageLogEntry, MessageStatus};
pub use notification::{plan_for_day, InvalidCodeError, NotificationCode};
pub use phone::normalize_e164;
pub use template::{
    render, DuplicateCodePolicy, PropertyKind, TemplateGroup, TemplateSet, NAME_PLACEHOLDER,
};
pub use tenant::{StayDates, Tenant};
