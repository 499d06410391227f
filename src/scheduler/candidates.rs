use super::LeaveIndex;
use crate::model::{Employee, EmployeeId};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Employés actifs, hors congé ce jour-là et pas encore utilisés ce jour-là.
pub fn filter_candidates<'a>(
    roster: &'a [Employee],
    leaves: &LeaveIndex,
    date: NaiveDate,
    taken: &HashSet<EmployeeId>,
) -> Vec<&'a Employee> {
    roster
        .iter()
        .filter(|e| e.is_active())
        .filter(|e| !leaves.is_blocked(&e.id, date))
        .filter(|e| !taken.contains(&e.id))
        .collect()
}

/// Priorité décroissante, puis identifiant croissant à égalité.
pub fn rank_candidates<'a>(mut candidates: Vec<&'a Employee>) -> Vec<&'a Employee> {
    candidates.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));
    candidates
}
