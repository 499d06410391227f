#![forbid(unsafe_code)]
use equipe::{
    model::{
        Employee, EmployeeId, EmployeeStatus, LeaveInterval, LeaveKind, LeaveStatus, ShiftId, SlotDef,
    },
    scheduler::{CancelToken, ConflictKind, GenerateOptions, ReplacePolicy, RunState, SchedError},
    DateRange, Roster, Scheduler, ShiftStatus,
};
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashSet;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, day).unwrap()
}

fn emp(id: &str, name: &str, priority: i32) -> Employee {
    Employee::new(EmployeeId::new(id), name, priority)
}

fn one_per_slot() -> GenerateOptions {
    GenerateOptions {
        headcount: 1,
        ..GenerateOptions::default()
    }
}

#[test]
fn generate_single_day_two_slots() {
    let mut s = Scheduler::new();
    s.roster_mut().employees = vec![emp("1", "Alice", 5), emp("2", "Bob", 3)];

    let report = s
        .generate(DateRange::new(d(22), d(22)).unwrap(), &one_per_slot(), &CancelToken::new())
        .unwrap();
    assert_eq!(report.slots, 2);
    assert_eq!(s.state(), RunState::Complete);

    let shifts = &s.roster().shifts;
    assert_eq!(shifts[0].name, "day");
    assert_eq!(shifts[0].assignees, vec![EmployeeId::new("1")]);
    assert_eq!(shifts[1].name, "evening");
    assert_eq!(shifts[1].assignees, vec![EmployeeId::new("2")]);
}

#[test]
fn inverted_range_fails_without_touching_roster() {
    let mut s = Scheduler::new();
    s.roster_mut().employees = vec![emp("1", "Alice", 5)];
    s.generate(DateRange::new(d(1), d(1)).unwrap(), &one_per_slot(), &CancelToken::new())
        .unwrap();
    let before = s.roster().shifts.clone();

    let bad = DateRange { start: d(5), end: d(2) };
    let err = s.generate(bad, &one_per_slot(), &CancelToken::new()).unwrap_err();
    assert!(matches!(err, SchedError::InvalidDateRange));
    assert_eq!(s.state(), RunState::Failed);
    assert_eq!(s.roster().shifts, before);
}

#[test]
fn swap_rejects_target_already_working() {
    let mut s = Scheduler::new();
    s.roster_mut().employees = vec![emp("1", "Alice", 5), emp("2", "Bob", 3), emp("3", "Carol", 1)];
    s.generate(DateRange::new(d(22), d(22)).unwrap(), &one_per_slot(), &CancelToken::new())
        .unwrap();
    let day_shift = s.roster().shifts[0].id.clone();

    let err = s
        .swap(&day_shift, &EmployeeId::new("1"), &EmployeeId::new("2"))
        .unwrap_err();
    assert!(matches!(err, SchedError::SwapInvalid(_)));

    let new_id = s
        .swap(&day_shift, &EmployeeId::new("1"), &EmployeeId::new("3"))
        .unwrap();
    assert_ne!(new_id, day_shift);
    assert_eq!(s.roster().shifts[0].id, new_id);
    assert_eq!(s.roster().shifts[0].assignees, vec![EmployeeId::new("3")]);
    assert!(s.detect_conflicts().is_empty());
}

#[test]
fn swapped_shift_survives_regeneration_with_unique_ids() {
    let mut s = Scheduler::new();
    s.roster_mut().employees = vec![emp("1", "Alice", 5), emp("2", "Bob", 3), emp("3", "Carol", 1)];
    let range = DateRange::new(d(22), d(22)).unwrap();
    s.generate(range, &one_per_slot(), &CancelToken::new()).unwrap();
    let day_shift = s.roster().shifts[0].id.clone();
    s.swap(&day_shift, &EmployeeId::new("1"), &EmployeeId::new("3"))
        .unwrap();

    // nouveaux horaires : le créneau généré "20250422-1" ne tombe plus sur la saisie conservée
    let mut opts = GenerateOptions {
        headcount: 1,
        replace_policy: ReplacePolicy::PreserveManual,
        ..GenerateOptions::default()
    };
    opts.slots[0].start_time = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
    s.generate(range, &opts, &CancelToken::new()).unwrap();

    let ids: HashSet<_> = s.roster().shifts.iter().map(|sh| sh.id.clone()).collect();
    assert_eq!(ids.len(), s.roster().shifts.len());
    assert!(ids.contains(&ShiftId::new("20250422-1")));
}

#[test]
fn detect_leave_and_double_booking() {
    let mut roster = Roster::default();
    roster.employees = vec![emp("1", "Alice", 5)];
    let mut s = Scheduler::with_roster(roster);
    s.generate(DateRange::new(d(22), d(22)).unwrap(), &one_per_slot(), &CancelToken::new())
        .unwrap();

    // créneau du soir repris par Alice, puis congé approuvé a posteriori
    {
        let r = s.roster_mut();
        r.shifts[1].assignees = vec![EmployeeId::new("1")];
        r.leaves.push(
            LeaveInterval::for_days(EmployeeId::new("1"), LeaveKind::Sick, d(22), d(22))
                .unwrap()
                .with_status(LeaveStatus::Approved),
        );
    }
    // jour et soir se suivent sans se chevaucher
    assert!(!s
        .detect_conflicts()
        .iter()
        .any(|c| c.kind == ConflictKind::DoubleBooking));

    let midday = SlotDef {
        name: "midday".into(),
        start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
    };
    let extra = s
        .add_manual_shift(d(22), &midday, vec![EmployeeId::new("1")])
        .unwrap();

    let conflicts = s.detect_conflicts();
    let doubles: Vec<_> = conflicts
        .iter()
        .filter(|c| c.kind == ConflictKind::DoubleBooking)
        .collect();
    assert_eq!(doubles.len(), 1);
    assert!(doubles[0].shift_a == extra || doubles[0].shift_b.as_ref() == Some(&extra));
    assert_eq!(
        conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::LeaveViolation)
            .count(),
        3
    );
}

#[test]
fn leave_workflow_only_from_pending() {
    let mut s = Scheduler::new();
    s.roster_mut().employees = vec![emp("1", "Alice", 5)];
    let leave = LeaveInterval::for_days(EmployeeId::new("1"), LeaveKind::Vacation, d(22), d(23)).unwrap();
    let id = s.add_leave(leave).unwrap();

    s.set_leave_status(&id, LeaveStatus::Approved).unwrap();
    assert!(matches!(
        s.set_leave_status(&id, LeaveStatus::Rejected),
        Err(SchedError::LeaveTransition(_))
    ));

    s.generate(DateRange::new(d(22), d(23)).unwrap(), &one_per_slot(), &CancelToken::new())
        .unwrap();
    assert!(s
        .roster()
        .shifts
        .iter()
        .all(|sh| sh.status == ShiftStatus::Emergency));
}

#[test]
fn leave_for_unknown_employee_is_refused() {
    let mut s = Scheduler::new();
    let leave = LeaveInterval::for_days(EmployeeId::new("7"), LeaveKind::Vacation, d(22), d(23)).unwrap();
    assert!(matches!(s.add_leave(leave), Err(SchedError::UnknownEmployee(_))));
}

#[test]
fn priority_update_changes_ranking() {
    let mut s = Scheduler::new();
    s.roster_mut().employees = vec![
        emp("1", "Alice", 5),
        emp("2", "Bob", 3),
        emp("3", "Old", 9).with_status(EmployeeStatus::Inactive),
    ];
    s.set_priority(&EmployeeId::new("2"), 8).unwrap();
    s.generate(DateRange::new(d(22), d(22)).unwrap(), &one_per_slot(), &CancelToken::new())
        .unwrap();
    assert_eq!(s.roster().shifts[0].assignees, vec![EmployeeId::new("2")]);

    let stats = s.stats(None);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.assigned, 2);
    assert_eq!(stats.emergency, 0);
}
