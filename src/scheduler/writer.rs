use crate::model::{AssignmentOrigin, Employee, ShiftAssignment, ShiftSlot, ShiftStatus};

/// Matérialise un créneau avec au plus `headcount` employés, pris en tête du
/// classement. Sans candidat le créneau est émis en `Emergency`, jamais omis.
pub fn write_assignment(slot: &ShiftSlot, ranked: &[&Employee], headcount: u32) -> ShiftAssignment {
    let assignees: Vec<_> = ranked
        .iter()
        .take(headcount as usize)
        .map(|e| e.id.clone())
        .collect();
    let status = if assignees.is_empty() {
        ShiftStatus::Emergency
    } else {
        ShiftStatus::Assigned
    };
    ShiftAssignment {
        id: slot.shift_id(),
        date: slot.date,
        name: slot.def.name.clone(),
        start_time: slot.def.start_time,
        end_time: slot.def.end_time,
        assignees,
        headcount,
        status,
        origin: AssignmentOrigin::Generated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EmployeeId;
    use crate::scheduler::default_slots;
    use chrono::NaiveDate;

    fn slot() -> ShiftSlot {
        ShiftSlot {
            date: NaiveDate::from_ymd_opt(2025, 4, 22).unwrap(),
            index: 0,
            def: default_slots().remove(0),
        }
    }

    #[test]
    fn empty_candidates_give_emergency_slot() {
        let shift = write_assignment(&slot(), &[], 2);
        assert_eq!(shift.status, ShiftStatus::Emergency);
        assert!(shift.assignees.is_empty());
        assert_eq!(shift.id.as_str(), "20250422-1");
    }

    #[test]
    fn short_staff_is_not_padded() {
        let a = Employee::new(EmployeeId::new("1"), "A", 5);
        let shift = write_assignment(&slot(), &[&a], 2);
        assert_eq!(shift.status, ShiftStatus::Assigned);
        assert_eq!(shift.assignees, vec![a.id.clone()]);
        assert!(shift.is_understaffed());
    }
}
