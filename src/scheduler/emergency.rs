use super::{candidates, util, EmergencyOutcome, LeaveIndex, Reassignment, SchedError};
use crate::model::{DateRange, Employee, EmployeeId, LeaveInterval, ShiftAssignment};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Retire `employee` de ses créneaux du jour et cherche, pour chacun, le
/// remplaçant disponible le plus prioritaire. Les employés sans créneau ce
/// jour-là passent d'abord ; à défaut, un employé déjà planifié peut
/// reprendre le créneau si ses horaires ne le chevauchent pas.
pub fn reassign_emergency(
    employee: &EmployeeId,
    date: NaiveDate,
    shifts: &[ShiftAssignment],
    employees: &[Employee],
    leaves: &[LeaveInterval],
) -> Result<(Vec<ShiftAssignment>, EmergencyOutcome), SchedError> {
    if !employees.iter().any(|e| &e.id == employee) {
        return Err(SchedError::UnknownEmployee(employee.as_str().to_string()));
    }
    let index = LeaveIndex::build(leaves, Some(DateRange { start: date, end: date }))?;

    let mut updated = shifts.to_vec();
    let mut affected: Vec<usize> = updated
        .iter()
        .enumerate()
        .filter(|(_, s)| s.date == date && s.is_held_by(employee))
        .map(|(i, _)| i)
        .collect();
    affected.sort_by(|&a, &b| {
        (updated[a].start_time, updated[a].id.as_str())
            .cmp(&(updated[b].start_time, updated[b].id.as_str()))
    });

    let mut outcome = EmergencyOutcome::default();
    for pos in affected {
        updated[pos].assignees.retain(|id| id != employee);

        let mut exclude: HashSet<EmployeeId> = updated[pos].assignees.iter().cloned().collect();
        exclude.insert(employee.clone());
        let eligible = candidates::filter_candidates(employees, &index, date, &exclude);

        let (busy, free): (Vec<&Employee>, Vec<&Employee>) = eligible.into_iter().partition(|e| {
            updated
                .iter()
                .enumerate()
                .any(|(i, s)| i != pos && s.date == date && s.is_held_by(&e.id))
        });
        let busy_ok: Vec<&Employee> = busy
            .into_iter()
            .filter(|e| {
                !updated.iter().enumerate().any(|(i, s)| {
                    i != pos && s.is_held_by(&e.id) && util::shifts_overlap(s, &updated[pos])
                })
            })
            .collect();

        let free = candidates::rank_candidates(free);
        let busy_ok = candidates::rank_candidates(busy_ok);
        let replacement = free.first().or(busy_ok.first()).map(|e| e.id.clone());

        let shift = &mut updated[pos];
        match &replacement {
            Some(id) => {
                debug!(shift = shift.id.as_str(), replacement = id.as_str(), "replacement found");
                shift.assignees.push(id.clone());
            }
            None => warn!(shift = shift.id.as_str(), "no replacement available"),
        }
        shift.refresh_status();

        outcome.reassignments.push(Reassignment {
            shift: shift.id.clone(),
            removed: employee.clone(),
            replacement,
        });
    }

    Ok((updated, outcome))
}
