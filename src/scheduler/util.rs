use crate::model::{ShiftAssignment, ShiftId};
use chrono::{DateTime, Utc};

pub(super) fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Vrai si les deux créneaux se chevauchent dans le temps (bords exclus).
pub(super) fn shifts_overlap(a: &ShiftAssignment, b: &ShiftAssignment) -> bool {
    overlaps(a.start_datetime(), a.end_datetime(), b.start_datetime(), b.end_datetime())
}

pub(super) fn find_shift_index(shifts: &[ShiftAssignment], shift_id: &ShiftId) -> Option<usize> {
    shifts.iter().position(|s| &s.id == shift_id)
}
