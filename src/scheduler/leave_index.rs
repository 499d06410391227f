use super::SchedError;
use crate::model::{DateRange, EmployeeId, LeaveInterval};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Jours bloqués par employé, construits à partir des congés approuvés.
#[derive(Debug, Clone, Default)]
pub struct LeaveIndex {
    blocked: HashMap<EmployeeId, BTreeSet<NaiveDate>>,
}

impl LeaveIndex {
    /// Seuls les congés `Approved` sont dépliés, et seulement sur `window`
    /// quand elle est fournie. Un congé approuvé inversé est refusé.
    pub fn build<'a, I>(leaves: I, window: Option<DateRange>) -> Result<Self, SchedError>
    where
        I: IntoIterator<Item = &'a LeaveInterval>,
    {
        let mut blocked: HashMap<EmployeeId, BTreeSet<NaiveDate>> = HashMap::new();
        for leave in leaves.into_iter().filter(|l| l.is_approved()) {
            let (mut first, mut last) = leave
                .day_span()
                .ok_or_else(|| SchedError::InvalidLeave(leave.id.as_str().to_string()))?;
            if let Some(w) = window {
                first = first.max(w.start);
                last = last.min(w.end);
                if last < first {
                    continue;
                }
            }
            let days = blocked.entry(leave.employee.clone()).or_default();
            days.extend(first.iter_days().take_while(|d| *d <= last));
        }
        Ok(Self { blocked })
    }

    pub fn is_blocked(&self, employee: &EmployeeId, date: NaiveDate) -> bool {
        self.blocked
            .get(employee)
            .is_some_and(|days| days.contains(&date))
    }

    pub fn blocked_days(&self, employee: &EmployeeId) -> impl Iterator<Item = NaiveDate> + '_ {
        self.blocked.get(employee).into_iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LeaveKind, LeaveStatus};
    use chrono::{TimeZone, Utc};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, day).unwrap()
    }

    #[test]
    fn only_approved_leaves_block() {
        let a = EmployeeId::new("1");
        let approved = LeaveInterval::for_days(a.clone(), LeaveKind::Vacation, d(24), d(25))
            .unwrap()
            .with_status(LeaveStatus::Approved);
        let pending = LeaveInterval::for_days(a.clone(), LeaveKind::Sick, d(28), d(28)).unwrap();
        let rejected = LeaveInterval::for_days(a.clone(), LeaveKind::Personal, d(29), d(29))
            .unwrap()
            .with_status(LeaveStatus::Rejected);

        let index = LeaveIndex::build([&approved, &pending, &rejected], None).unwrap();
        let days: Vec<_> = index.blocked_days(&a).collect();
        assert_eq!(days, vec![d(24), d(25)]);
        assert!(!index.is_blocked(&a, d(28)));
        assert!(!index.is_blocked(&EmployeeId::new("2"), d(24)));
    }

    #[test]
    fn partial_days_are_blocked_whole() {
        let a = EmployeeId::new("1");
        let start = Utc.with_ymd_and_hms(2025, 4, 24, 14, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 4, 26, 9, 0, 0).unwrap();
        let leave = LeaveInterval::new(a.clone(), LeaveKind::Personal, start, end)
            .unwrap()
            .with_status(LeaveStatus::Approved);
        let index = LeaveIndex::build([&leave], None).unwrap();
        assert_eq!(index.blocked_days(&a).count(), 3);
    }

    #[test]
    fn long_leave_is_clamped_to_window() {
        let a = EmployeeId::new("1");
        let first = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2099, 12, 31).unwrap();
        let leave = LeaveInterval::for_days(a.clone(), LeaveKind::Sick, first, last)
            .unwrap()
            .with_status(LeaveStatus::Approved);
        let window = DateRange::new(d(22), d(23)).unwrap();

        let index = LeaveIndex::build([&leave], Some(window)).unwrap();
        assert_eq!(index.blocked_days(&a).collect::<Vec<_>>(), vec![d(22), d(23)]);

        let outside = DateRange::new(first.pred_opt().unwrap(), first.pred_opt().unwrap()).unwrap();
        let index = LeaveIndex::build([&leave], Some(outside)).unwrap();
        assert_eq!(index.blocked_days(&a).count(), 0);
    }

    #[test]
    fn inverted_approved_leave_is_rejected() {
        let a = EmployeeId::new("1");
        let mut leave = LeaveInterval::for_days(a, LeaveKind::Vacation, d(24), d(24))
            .unwrap()
            .with_status(LeaveStatus::Approved);
        std::mem::swap(&mut leave.start, &mut leave.end);
        assert!(matches!(
            LeaveIndex::build([&leave], None),
            Err(SchedError::InvalidLeave(_))
        ));
    }
}
