use crate::model::{AssignmentOrigin, DateRange, ShiftAssignment, ShiftStatus};

/// Compteurs du planning, éventuellement restreints à une période.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleStats {
    pub total: usize,
    pub assigned: usize,
    pub emergency: usize,
    pub understaffed: usize,
    pub manual: usize,
}

impl ScheduleStats {
    pub fn collect(shifts: &[ShiftAssignment], range: Option<DateRange>) -> Self {
        shifts
            .iter()
            .filter(|s| range.map_or(true, |r| r.contains(s.date)))
            .fold(Self::default(), |mut acc, s| {
                acc.total += 1;
                match s.status {
                    ShiftStatus::Assigned => acc.assigned += 1,
                    ShiftStatus::Emergency => acc.emergency += 1,
                }
                if s.is_understaffed() {
                    acc.understaffed += 1;
                }
                if s.origin == AssignmentOrigin::Manual {
                    acc.manual += 1;
                }
                acc
            })
    }
}
