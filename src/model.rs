use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Identifiant fort pour Employee.
///
/// L'ordre est déterministe : les identifiants purement numériques passent
/// avant les autres et sont comparés par valeur ("2" < "10"), le reste est
/// comparé lexicalement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn sort_key(&self) -> (bool, usize, &str, &str) {
        let s = self.0.as_str();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let digits = s.trim_start_matches('0');
            (false, digits.len(), digits, s)
        } else {
            (true, 0, "", s)
        }
    }
}

impl Ord for EmployeeId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for EmployeeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    #[default]
    Employee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

/// Membre de l'équipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Plus haut = prioritaire à l'assignation.
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub status: EmployeeStatus,
}

impl Employee {
    pub fn new<N: Into<String>>(id: EmployeeId, name: N, priority: i32) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
            role: Role::Employee,
            priority,
            status: EmployeeStatus::Active,
        }
    }

    pub fn with_status(mut self, status: EmployeeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaveId(String);

impl LeaveId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveKind {
    Vacation,
    Sick,
    Personal,
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Demande de congé (intervalle UTC [start, end]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveInterval {
    pub id: LeaveId,
    pub employee: EmployeeId,
    pub kind: LeaveKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub status: LeaveStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl LeaveInterval {
    /// Crée une demande `Pending` en validant que `end >= start`.
    pub fn new(
        employee: EmployeeId,
        kind: LeaveKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, String> {
        if end < start {
            return Err("leave end must not be before start".to_string());
        }
        Ok(Self {
            id: LeaveId::random(),
            employee,
            kind,
            start,
            end,
            status: LeaveStatus::Pending,
            reason: None,
        })
    }

    /// Congé couvrant des journées entières `[first, last]`.
    pub fn for_days(
        employee: EmployeeId,
        kind: LeaveKind,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Self, String> {
        let start = Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN));
        let end = Utc.from_utc_datetime(&last.and_time(NaiveTime::MIN)) + Duration::days(1);
        Self::new(employee, kind, start, end)
    }

    pub fn with_status(mut self, status: LeaveStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    /// Journées calendaires touchées, bornes incluses. Une fin pile à minuit
    /// un jour ultérieur ne bloque pas ce jour-là. `None` si l'intervalle est inversé.
    pub fn day_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        if self.end < self.start {
            return None;
        }
        let first = self.start.date_naive();
        let mut last = self.end.date_naive();
        if last > first && self.end.time() == NaiveTime::MIN {
            last = last.pred_opt()?;
        }
        Some((first, last))
    }
}

/// Définition d'un créneau journalier. `end_time <= start_time` signifie que
/// le créneau se termine le lendemain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDef {
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl SlotDef {
    pub fn new<N: Into<String>>(name: N, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            name: name.into(),
            start_time,
            end_time,
        }
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end_time <= self.start_time
    }
}

/// Un créneau concret : une date et une définition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftSlot {
    pub date: NaiveDate,
    pub index: usize,
    pub def: SlotDef,
}

impl ShiftSlot {
    /// Identifiant déterministe `AAAAMMJJ-n` (n à partir de 1).
    pub fn shift_id(&self) -> ShiftId {
        let mut buf = itoa::Buffer::new();
        let n = buf.format(self.index + 1);
        ShiftId::new(format!("{}-{}", self.date.format("%Y%m%d"), n))
    }
}

/// Identifiant fort pour ShiftAssignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    Assigned,
    /// Aucun employé disponible.
    #[serde(alias = "unassigned")]
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentOrigin {
    #[default]
    Generated,
    Manual,
}

fn default_headcount() -> u32 {
    1
}

/// Créneau matérialisé avec ses employés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub id: ShiftId,
    pub date: NaiveDate,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub assignees: Vec<EmployeeId>,
    #[serde(default = "default_headcount")]
    pub headcount: u32,
    pub status: ShiftStatus,
    #[serde(default)]
    pub origin: AssignmentOrigin,
}

impl ShiftAssignment {
    /// Assignation saisie à la main par un responsable.
    pub fn manual(date: NaiveDate, def: &SlotDef, assignees: Vec<EmployeeId>) -> Self {
        let headcount = u32::try_from(assignees.len()).unwrap_or(u32::MAX).max(1);
        let mut shift = Self {
            id: ShiftId::random(),
            date,
            name: def.name.clone(),
            start_time: def.start_time,
            end_time: def.end_time,
            assignees,
            headcount,
            status: ShiftStatus::Emergency,
            origin: AssignmentOrigin::Manual,
        };
        shift.refresh_status();
        shift
    }

    pub fn is_held_by(&self, employee: &EmployeeId) -> bool {
        self.assignees.contains(employee)
    }

    pub fn is_understaffed(&self) -> bool {
        !self.assignees.is_empty() && self.assignees.len() < self.headcount as usize
    }

    /// Recalcule le statut à partir des employés présents.
    pub fn refresh_status(&mut self) {
        self.status = if self.assignees.is_empty() {
            ShiftStatus::Emergency
        } else {
            ShiftStatus::Assigned
        };
    }

    pub fn start_datetime(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&NaiveDateTime::new(self.date, self.start_time))
    }

    /// Fin en UTC, le lendemain si le créneau passe minuit.
    pub fn end_datetime(&self) -> DateTime<Utc> {
        let end = Utc.from_utc_datetime(&NaiveDateTime::new(self.date, self.end_time));
        if self.end_time <= self.start_time {
            end + Duration::days(1)
        } else {
            end
        }
    }
}

/// Période de planification, bornes incluses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if end < start {
            return Err("range end must not be before start".to_string());
        }
        Ok(Self { start, end })
    }

    /// `[from, from + days]`
    pub fn horizon(from: NaiveDate, days: u32) -> Self {
        let end = from
            .checked_add_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start: from, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Document complet persisté : équipe, congés, planning.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub leaves: Vec<LeaveInterval>,
    #[serde(default)]
    pub shifts: Vec<ShiftAssignment>,
}

impl Roster {
    pub fn find_employee<'a>(&'a self, id: &EmployeeId) -> Option<&'a Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }
    pub fn find_employee_mut(&mut self, id: &EmployeeId) -> Option<&mut Employee> {
        self.employees.iter_mut().find(|e| &e.id == id)
    }
    pub fn find_employee_by_name<'a>(&'a self, name: &str) -> Option<&'a Employee> {
        self.employees.iter().find(|e| e.name == name)
    }
    pub fn find_leave_mut(&mut self, id: &LeaveId) -> Option<&mut LeaveInterval> {
        self.leaves.iter_mut().find(|l| &l.id == id)
    }
    pub fn find_shift_mut(&mut self, id: &ShiftId) -> Option<&mut ShiftAssignment> {
        self.shifts.iter_mut().find(|s| &s.id == id)
    }

    /// Ajoute ou remplace un employé (même identifiant).
    pub fn upsert_employee(&mut self, employee: Employee) {
        match self.find_employee_mut(&employee.id) {
            Some(existing) => *existing = employee,
            None => self.employees.push(employee),
        }
    }

    pub fn shifts_on(&self, date: NaiveDate) -> impl Iterator<Item = &ShiftAssignment> {
        self.shifts.iter().filter(move |s| s.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn numeric_ids_sort_by_value() {
        let mut ids = vec![
            EmployeeId::new("10"),
            EmployeeId::new("b"),
            EmployeeId::new("2"),
            EmployeeId::new("a"),
        ];
        ids.sort();
        let got: Vec<_> = ids.iter().map(|i| i.as_str()).collect();
        assert_eq!(got, vec!["2", "10", "a", "b"]);
    }

    #[test]
    fn leave_ending_at_midnight_does_not_block_next_day() {
        let leave =
            LeaveInterval::for_days(EmployeeId::new("1"), LeaveKind::Vacation, d(2025, 4, 24), d(2025, 4, 25))
                .unwrap();
        assert_eq!(leave.day_span(), Some((d(2025, 4, 24), d(2025, 4, 25))));
    }

    #[test]
    fn evening_slot_ends_next_day() {
        let def = SlotDef::new(
            "evening",
            NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        );
        let shift = ShiftAssignment::manual(d(2025, 4, 22), &def, vec![EmployeeId::new("1")]);
        assert!(def.crosses_midnight());
        assert_eq!(shift.end_datetime() - shift.start_datetime(), Duration::hours(8));
        assert_eq!(shift.status, ShiftStatus::Assigned);
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(DateRange::new(d(2025, 4, 2), d(2025, 4, 1)).is_err());
        assert_eq!(DateRange::new(d(2025, 4, 1), d(2025, 4, 1)).unwrap().days().count(), 1);
    }

    #[test]
    fn slot_ids_are_stable() {
        let slot = ShiftSlot {
            date: d(2025, 4, 22),
            index: 1,
            def: SlotDef::new(
                "evening",
                NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            ),
        };
        assert_eq!(slot.shift_id().as_str(), "20250422-2");
    }
}
