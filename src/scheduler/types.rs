use crate::model::{EmployeeId, ShiftId, SlotDef};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Que faire des assignations déjà présentes dans la période régénérée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacePolicy {
    /// Tout est remplacé, y compris les saisies manuelles.
    #[default]
    ReplaceAll,
    /// Les assignations `Manual` sont conservées et leur créneau n'est pas régénéré.
    PreserveManual,
}

/// Options de génération
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub slots: Vec<SlotDef>,
    /// Nombre d'employés visé par créneau.
    pub headcount: u32,
    pub replace_policy: ReplacePolicy,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            slots: default_slots(),
            headcount: 2,
            replace_policy: ReplacePolicy::ReplaceAll,
        }
    }
}

/// Jour 08:00–16:00 puis soir 16:00–00:00.
pub fn default_slots() -> Vec<SlotDef> {
    let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN);
    vec![
        SlotDef::new("day", at(8), at(16)),
        SlotDef::new("evening", at(16), at(0)),
    ]
}

/// Idle → Generating → Complete | Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Generating,
    Complete,
    Failed,
}

/// Annulation coopérative, vérifiée une fois par date.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Résumé d'une génération.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub slots: usize,
    pub assigned: usize,
    pub understaffed: usize,
    pub emergency: usize,
    pub preserved_manual: usize,
    pub replaced: usize,
}

/// Résultat de la réaffectation d'un créneau lors d'une absence d'urgence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub shift: ShiftId,
    pub removed: EmployeeId,
    pub replacement: Option<EmployeeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmergencyOutcome {
    pub reassignments: Vec<Reassignment>,
}

impl EmergencyOutcome {
    pub fn is_empty(&self) -> bool {
        self.reassignments.is_empty()
    }

    /// Créneaux restés sans personne.
    pub fn uncovered(&self) -> impl Iterator<Item = &ShiftId> {
        self.reassignments
            .iter()
            .filter(|r| r.replacement.is_none())
            .map(|r| &r.shift)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// Même employé sur deux créneaux le même jour.
    DoubleBooking,
    /// Employé assigné un jour de congé approuvé.
    LeaveViolation,
    InactiveAssignee,
}

#[derive(Debug, Clone)]
pub struct Conflict {
    pub employee: EmployeeId,
    pub date: NaiveDate,
    pub shift_a: ShiftId,
    pub shift_b: Option<ShiftId>,
    pub kind: ConflictKind,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid date range: end must not be before start")]
    InvalidDateRange,
    #[error("invalid leave {0}: end before start")]
    InvalidLeave(String),
    #[error("unknown employee: {0}")]
    UnknownEmployee(String),
    #[error("unknown shift: {0}")]
    UnknownShift(String),
    #[error("unknown leave: {0}")]
    UnknownLeave(String),
    #[error("swap invalid: {0}")]
    SwapInvalid(&'static str),
    #[error("leave transition invalid: {0}")]
    LeaveTransition(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("generation cancelled")]
    Cancelled,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
