#![forbid(unsafe_code)]
//! Equipe — génération de plannings d'équipe à partir d'un effectif, de congés
//! et de priorités.
//!
//! - Créneaux journaliers configurables (par défaut jour 08:00–16:00, soir 16:00–00:00).
//! - Congés approuvés respectés, un seul créneau par employé et par jour.
//! - Classement par priorité décroissante, identifiant croissant à égalité.
//! - Réaffectation en cas d'absence d'urgence.
//! - Le noyau est synchrone et pur ; lecture et écriture (JSON/CSV) sont à part.

pub mod config;
pub mod io;
pub mod model;
pub mod scheduler;
pub mod storage;

pub use config::{export_config_json, load_config_from_file, load_config_or_default, ScheduleConfig};
pub use model::{
    AssignmentOrigin, DateRange, Employee, EmployeeId, EmployeeStatus, LeaveId, LeaveInterval,
    LeaveKind, LeaveStatus, Role, Roster, ShiftAssignment, ShiftId, ShiftSlot, ShiftStatus,
    SlotDef,
};
pub use scheduler::{
    generate_schedule, reassign_emergency, CancelToken, Conflict, ConflictKind, EmergencyOutcome,
    GenerateOptions, GenerationReport, ReplacePolicy, RunState, ScheduleInput, ScheduleStats,
    SchedError, Scheduler,
};
pub use storage::{JsonStorage, Storage};
