use super::{util, Conflict, ConflictKind, LeaveIndex, Scheduler};
use crate::model::{DateRange, ShiftAssignment};
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub(super) fn detect_conflicts(scheduler: &Scheduler) -> Vec<Conflict> {
    let roster = &scheduler.roster;
    let mut out = Vec::new();

    let first = roster.shifts.iter().map(|s| s.date).min();
    let last = roster.shifts.iter().map(|s| s.date).max();
    let (Some(start), Some(end)) = (first, last) else {
        return out;
    };
    // Les congés inversés sont ignorés ici, `generate` les refuse.
    let leaves = LeaveIndex::build(
        roster.leaves.iter().filter(|l| l.day_span().is_some()),
        Some(DateRange { start, end }),
    )
    .unwrap_or_default();

    for employee in &roster.employees {
        let mut by_date: BTreeMap<NaiveDate, Vec<&ShiftAssignment>> = BTreeMap::new();
        for shift in roster.shifts.iter().filter(|s| s.is_held_by(&employee.id)) {
            by_date.entry(shift.date).or_default().push(shift);
        }

        for (date, mut shifts) in by_date {
            shifts.sort_by_key(|s| s.start_time);

            for shift in &shifts {
                if leaves.is_blocked(&employee.id, date) {
                    out.push(Conflict {
                        employee: employee.id.clone(),
                        date,
                        shift_a: shift.id.clone(),
                        shift_b: None,
                        kind: ConflictKind::LeaveViolation,
                    });
                }
                if !employee.is_active() {
                    out.push(Conflict {
                        employee: employee.id.clone(),
                        date,
                        shift_a: shift.id.clone(),
                        shift_b: None,
                        kind: ConflictKind::InactiveAssignee,
                    });
                }
            }

            for (idx, a) in shifts.iter().enumerate() {
                for b in shifts.iter().skip(idx + 1).filter(|b| util::shifts_overlap(a, b)) {
                    out.push(Conflict {
                        employee: employee.id.clone(),
                        date,
                        shift_a: a.id.clone(),
                        shift_b: Some(b.id.clone()),
                        kind: ConflictKind::DoubleBooking,
                    });
                }
            }
        }
    }

    out
}
