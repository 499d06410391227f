use super::{util, LeaveIndex, SchedError, Scheduler};
use crate::model::{
    AssignmentOrigin, DateRange, EmployeeId, LeaveId, LeaveInterval, LeaveStatus, ShiftAssignment,
    ShiftId, SlotDef,
};
use chrono::NaiveDate;

/// Cède la place de `from` sur un créneau à `to`. Tout est validé avant de
/// modifier le planning ; le créneau devient une saisie manuelle et un créneau
/// généré reçoit un nouvel identifiant, renvoyé à l'appelant.
pub(super) fn swap(
    scheduler: &mut Scheduler,
    shift_id: &ShiftId,
    from: &EmployeeId,
    to: &EmployeeId,
) -> Result<ShiftId, SchedError> {
    let Some(pos) = util::find_shift_index(&scheduler.roster.shifts, shift_id) else {
        return Err(SchedError::UnknownShift(shift_id.as_str().to_string()));
    };
    let date = scheduler.roster.shifts[pos].date;

    if !scheduler.roster.shifts[pos].is_held_by(from) {
        return Err(SchedError::SwapInvalid("shift not held by requesting employee"));
    }
    let target = scheduler
        .roster
        .find_employee(to)
        .ok_or_else(|| SchedError::UnknownEmployee(to.as_str().to_string()))?;
    if !target.is_active() {
        return Err(SchedError::SwapInvalid("target employee inactive"));
    }
    let day = DateRange { start: date, end: date };
    let leaves = LeaveIndex::build(&scheduler.roster.leaves, Some(day))?;
    if leaves.is_blocked(to, date) {
        return Err(SchedError::SwapInvalid("target employee on leave"));
    }
    if scheduler.roster.shifts_on(date).any(|s| s.is_held_by(to)) {
        return Err(SchedError::SwapInvalid("target employee already working that day"));
    }

    let shift = &mut scheduler.roster.shifts[pos];
    for id in shift.assignees.iter_mut().filter(|id| **id == *from) {
        *id = to.clone();
    }
    if shift.origin == AssignmentOrigin::Generated {
        shift.id = ShiftId::random();
        shift.origin = AssignmentOrigin::Manual;
    }
    shift.refresh_status();
    Ok(shift.id.clone())
}

pub(super) fn add_manual_shift(
    scheduler: &mut Scheduler,
    date: NaiveDate,
    def: &SlotDef,
    assignees: Vec<EmployeeId>,
) -> Result<ShiftId, SchedError> {
    if let Some(unknown) = assignees
        .iter()
        .find(|id| scheduler.roster.find_employee(id).is_none())
    {
        return Err(SchedError::UnknownEmployee(unknown.as_str().to_string()));
    }
    let shift = ShiftAssignment::manual(date, def, assignees);
    let id = shift.id.clone();
    scheduler.roster.shifts.push(shift);
    Ok(id)
}

pub(super) fn add_leave(scheduler: &mut Scheduler, leave: LeaveInterval) -> Result<LeaveId, SchedError> {
    if scheduler.roster.find_employee(&leave.employee).is_none() {
        return Err(SchedError::UnknownEmployee(leave.employee.as_str().to_string()));
    }
    if leave.day_span().is_none() {
        return Err(SchedError::InvalidLeave(leave.id.as_str().to_string()));
    }
    let id = leave.id.clone();
    scheduler.roster.leaves.push(leave);
    Ok(id)
}

/// Seule une demande `Pending` peut être approuvée ou refusée.
pub(super) fn set_leave_status(
    scheduler: &mut Scheduler,
    leave_id: &LeaveId,
    status: LeaveStatus,
) -> Result<(), SchedError> {
    if status == LeaveStatus::Pending {
        return Err(SchedError::LeaveTransition("cannot move back to pending"));
    }
    let leave = scheduler
        .roster
        .find_leave_mut(leave_id)
        .ok_or_else(|| SchedError::UnknownLeave(leave_id.as_str().to_string()))?;
    if leave.status != LeaveStatus::Pending {
        return Err(SchedError::LeaveTransition("leave already decided"));
    }
    leave.status = status;
    Ok(())
}

pub(super) fn set_priority(
    scheduler: &mut Scheduler,
    employee: &EmployeeId,
    priority: i32,
) -> Result<(), SchedError> {
    let e = scheduler
        .roster
        .find_employee_mut(employee)
        .ok_or_else(|| SchedError::UnknownEmployee(employee.as_str().to_string()))?;
    e.priority = priority;
    Ok(())
}
