use chrono::NaiveDate;

/// A tenant row from the notifications table. One row per booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Tenant {
    /// Display name; the first whitespace-separated token is used for
    /// greeting personalization
    pub name: String,
    /// Raw phone text as it appears in the source row
    pub phone: String,
    pub reservation_date: Option<NaiveDate>,
    pub entry_date: Option<NaiveDate>,
    pub exit_date: Option<NaiveDate>,
    /// Rows with this flag cleared are skipped entirely
    pub active: bool,
    /// Free text, used only to pick the template group
    pub address: String,
}

/// The three lifecycle milestones of one stay. Only constructed when the
/// source row carries all of them: there is no partial-date inference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StayDates {
    pub reservation: NaiveDate,
    pub entry: NaiveDate,
    pub exit: NaiveDate,
}

impl Tenant {
    pub fn stay(&self) -> Option<StayDates> {
        match (self.reservation_date, self.entry_date, self.exit_date) {
            (Some(reservation), Some(entry), Some(exit)) => Some(StayDates {
                reservation,
                entry,
                exit,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tenant_with_dates(
        reservation: Option<NaiveDate>,
        entry: Option<NaiveDate>,
        exit: Option<NaiveDate>,
    ) -> Tenant {
        Tenant {
            name: "Ana García".into(),
            phone: "612345678".into(),
            reservation_date: reservation,
            entry_date: entry,
            exit_date: exit,
            active: true,
            address: "Madrid".into(),
        }
    }

    #[test]
    fn stay_requires_all_three_dates() {
        let d = NaiveDate::from_ymd(2025, 1, 10);
        assert!(tenant_with_dates(Some(d), Some(d), Some(d)).stay().is_some());
        assert!(tenant_with_dates(None, Some(d), Some(d)).stay().is_none());
        assert!(tenant_with_dates(Some(d), None, Some(d)).stay().is_none());
        assert!(tenant_with_dates(Some(d), Some(d), None).stay().is_none());
        assert!(tenant_with_dates(None, None, None).stay().is_none());
    }
}
