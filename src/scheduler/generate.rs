use super::{
    candidates, writer, CancelToken, GenerateOptions, GenerationReport, LeaveIndex, ReplacePolicy,
    SchedError, SlotSequence,
};
use crate::model::{
    AssignmentOrigin, DateRange, Employee, EmployeeId, LeaveInterval, ShiftAssignment, ShiftStatus,
};
use chrono::{NaiveDate, NaiveTime};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Entrées de la génération, déjà chargées par l'appelant.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleInput<'a> {
    pub employees: &'a [Employee],
    pub leaves: &'a [LeaveInterval],
    pub existing: &'a [ShiftAssignment],
}

/// Refuse les options inutilisables et les congés approuvés d'employés inconnus.
pub fn validate_input(input: &ScheduleInput<'_>, opts: &GenerateOptions) -> Result<(), SchedError> {
    if opts.slots.is_empty() {
        return Err(SchedError::InvalidConfig("at least one slot is required".into()));
    }
    if opts.headcount == 0 {
        return Err(SchedError::InvalidConfig("headcount must be > 0".into()));
    }
    let known: HashSet<&EmployeeId> = input.employees.iter().map(|e| &e.id).collect();
    if let Some(leave) = input
        .leaves
        .iter()
        .filter(|l| l.is_approved())
        .find(|l| !known.contains(&l.employee))
    {
        return Err(SchedError::UnknownEmployee(leave.employee.as_str().to_string()));
    }
    Ok(())
}

/// Génère les assignations de la période. Fonction pure : rien n'est modifié,
/// le résultat ne contient que les créneaux générés.
pub fn generate_schedule(
    input: &ScheduleInput<'_>,
    range: DateRange,
    opts: &GenerateOptions,
    cancel: &CancelToken,
) -> Result<Vec<ShiftAssignment>, SchedError> {
    if range.end < range.start {
        return Err(SchedError::InvalidDateRange);
    }
    validate_input(input, opts)?;
    let leaves = LeaveIndex::build(input.leaves, Some(range))?;

    // Saisies manuelles conservées : leurs employés comptent comme déjà pris.
    let mut kept_staff: HashMap<NaiveDate, HashSet<EmployeeId>> = HashMap::new();
    let mut kept_slots: HashSet<(NaiveDate, NaiveTime)> = HashSet::new();
    if opts.replace_policy == ReplacePolicy::PreserveManual {
        for shift in input
            .existing
            .iter()
            .filter(|s| s.origin == AssignmentOrigin::Manual && range.contains(s.date))
        {
            kept_slots.insert((shift.date, shift.start_time));
            kept_staff
                .entry(shift.date)
                .or_default()
                .extend(shift.assignees.iter().cloned());
        }
    }

    let slots = SlotSequence::new(range, &opts.slots);
    let mut out = Vec::with_capacity(slots.total());
    let mut current: Option<NaiveDate> = None;
    let mut taken: HashSet<EmployeeId> = HashSet::new();

    for slot in slots {
        if current != Some(slot.date) {
            if cancel.is_cancelled() {
                return Err(SchedError::Cancelled);
            }
            debug!(date = %slot.date, "scheduling day");
            current = Some(slot.date);
            taken = kept_staff.get(&slot.date).cloned().unwrap_or_default();
        }
        if kept_slots.contains(&(slot.date, slot.def.start_time)) {
            continue;
        }

        let eligible = candidates::filter_candidates(input.employees, &leaves, slot.date, &taken);
        let ranked = candidates::rank_candidates(eligible);
        let shift = writer::write_assignment(&slot, &ranked, opts.headcount);
        if shift.status == ShiftStatus::Emergency {
            warn!(date = %shift.date, slot = %shift.name, "no eligible employee");
        }
        taken.extend(shift.assignees.iter().cloned());
        out.push(shift);
    }

    Ok(out)
}

/// Remplace les assignations de la période par `generated`. Hors période rien
/// ne bouge ; avec `PreserveManual` les saisies manuelles de la période restent.
pub fn merge_into(
    shifts: &mut Vec<ShiftAssignment>,
    generated: Vec<ShiftAssignment>,
    range: DateRange,
    policy: ReplacePolicy,
) -> GenerationReport {
    let before = shifts.len();
    let mut preserved = 0usize;
    shifts.retain(|s| {
        if !range.contains(s.date) {
            return true;
        }
        let keep = policy == ReplacePolicy::PreserveManual && s.origin == AssignmentOrigin::Manual;
        if keep {
            preserved += 1;
        }
        keep
    });

    let mut report = summarize(&generated);
    report.preserved_manual = preserved;
    report.replaced = before - shifts.len();

    shifts.extend(generated);
    shifts.sort_by(|a, b| {
        (a.date, a.start_time)
            .cmp(&(b.date, b.start_time))
            .then_with(|| a.id.as_str().cmp(b.id.as_str()))
    });
    report
}

pub(super) fn summarize(generated: &[ShiftAssignment]) -> GenerationReport {
    GenerationReport {
        slots: generated.len(),
        assigned: generated
            .iter()
            .filter(|s| s.status == ShiftStatus::Assigned)
            .count(),
        understaffed: generated.iter().filter(|s| s.is_understaffed()).count(),
        emergency: generated
            .iter()
            .filter(|s| s.status == ShiftStatus::Emergency)
            .count(),
        ..GenerationReport::default()
    }
}
