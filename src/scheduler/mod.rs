mod candidates;
mod conflicts;
mod emergency;
mod generate;
mod leave_index;
mod mutate;
mod slots;
mod stats;
mod types;
mod util;
mod writer;

pub use candidates::{filter_candidates, rank_candidates};
pub use emergency::reassign_emergency;
pub use generate::{generate_schedule, merge_into, validate_input, ScheduleInput};
pub use leave_index::LeaveIndex;
pub use slots::SlotSequence;
pub use stats::ScheduleStats;
pub use types::{
    default_slots, CancelToken, Conflict, ConflictKind, EmergencyOutcome, GenerateOptions,
    GenerationReport, Reassignment, ReplacePolicy, RunState, SchedError,
};
pub use writer::write_assignment;

use crate::model::{
    DateRange, EmployeeId, LeaveId, LeaveInterval, LeaveKind, LeaveStatus, Roster, ShiftId,
    SlotDef,
};
use crate::storage::Storage;
use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;

/// Scheduler : encapsule le Roster et l'état de la dernière génération.
#[derive(Debug, Default)]
pub struct Scheduler {
    roster: Roster,
    state: RunState,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(roster: Roster) -> Self {
        Self {
            roster,
            state: RunState::Idle,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }
    pub fn into_roster(self) -> Roster {
        self.roster
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Régénère la période. En cas d'erreur le planning n'est pas modifié et
    /// l'état passe à `Failed`.
    pub fn generate(
        &mut self,
        range: DateRange,
        opts: &GenerateOptions,
        cancel: &CancelToken,
    ) -> Result<GenerationReport, SchedError> {
        self.state = RunState::Generating;
        info!(start = %range.start, end = %range.end, "generating schedule");

        let input = ScheduleInput {
            employees: &self.roster.employees,
            leaves: &self.roster.leaves,
            existing: &self.roster.shifts,
        };
        let generated = match generate_schedule(&input, range, opts, cancel) {
            Ok(g) => g,
            Err(err) => {
                self.state = RunState::Failed;
                return Err(err);
            }
        };

        let report = merge_into(&mut self.roster.shifts, generated, range, opts.replace_policy);
        self.state = RunState::Complete;
        info!(
            slots = report.slots,
            emergency = report.emergency,
            understaffed = report.understaffed,
            "schedule generated"
        );
        Ok(report)
    }

    /// Lecture, génération puis écriture atomique. Un échec de lecture laisse
    /// le scheduler intact.
    pub fn generate_with_storage(
        &mut self,
        storage: &dyn Storage,
        range: DateRange,
        opts: &GenerateOptions,
        cancel: &CancelToken,
    ) -> anyhow::Result<GenerationReport> {
        self.state = RunState::Generating;
        let roster = match storage.load() {
            Ok(r) => r,
            Err(err) => {
                self.state = RunState::Failed;
                return Err(err.context("loading roster before generation"));
            }
        };
        self.roster = roster;
        let report = self.generate(range, opts, cancel)?;
        storage
            .save(&self.roster)
            .context("saving generated schedule")?;
        Ok(report)
    }

    /// Absence d'urgence : réaffecte les créneaux du jour et enregistre un
    /// congé `Emergency` approuvé pour que les générations suivantes en tiennent compte.
    pub fn emergency_leave(
        &mut self,
        employee: &EmployeeId,
        date: NaiveDate,
        reason: Option<String>,
    ) -> Result<EmergencyOutcome, SchedError> {
        let (shifts, outcome) = reassign_emergency(
            employee,
            date,
            &self.roster.shifts,
            &self.roster.employees,
            &self.roster.leaves,
        )?;
        let mut leave = LeaveInterval::for_days(employee.clone(), LeaveKind::Emergency, date, date)
            .map_err(|e| SchedError::Other(anyhow::Error::msg(e)))?
            .with_status(LeaveStatus::Approved);
        leave.reason = reason;

        self.roster.shifts = shifts;
        self.roster.leaves.push(leave);
        info!(
            employee = employee.as_str(),
            %date,
            shifts = outcome.reassignments.len(),
            "emergency leave processed"
        );
        Ok(outcome)
    }

    pub fn detect_conflicts(&self) -> Vec<Conflict> {
        conflicts::detect_conflicts(self)
    }

    pub fn stats(&self, range: Option<DateRange>) -> ScheduleStats {
        ScheduleStats::collect(&self.roster.shifts, range)
    }

    pub fn swap(
        &mut self,
        shift_id: &ShiftId,
        from: &EmployeeId,
        to: &EmployeeId,
    ) -> Result<ShiftId, SchedError> {
        mutate::swap(self, shift_id, from, to)
    }

    pub fn add_manual_shift(
        &mut self,
        date: NaiveDate,
        def: &SlotDef,
        assignees: Vec<EmployeeId>,
    ) -> Result<ShiftId, SchedError> {
        mutate::add_manual_shift(self, date, def, assignees)
    }

    pub fn add_leave(&mut self, leave: LeaveInterval) -> Result<LeaveId, SchedError> {
        mutate::add_leave(self, leave)
    }

    pub fn set_leave_status(
        &mut self,
        leave_id: &LeaveId,
        status: LeaveStatus,
    ) -> Result<(), SchedError> {
        mutate::set_leave_status(self, leave_id, status)
    }

    pub fn set_priority(&mut self, employee: &EmployeeId, priority: i32) -> Result<(), SchedError> {
        mutate::set_priority(self, employee, priority)
    }
}
