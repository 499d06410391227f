use crate::model::{
    Employee, EmployeeId, EmployeeStatus, LeaveId, LeaveInterval, LeaveKind, LeaveStatus, Role,
    Roster, ShiftStatus,
};
use anyhow::{bail, Context};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Import d'employés depuis CSV: header `id,name,priority[,status][,role]`
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        if id.is_empty() || name.is_empty() {
            bail!("invalid employee row (empty)");
        }
        let priority = rec.get(2).map(str::trim).filter(|s| !s.is_empty()).unwrap_or("0");
        let priority: i32 = priority
            .parse()
            .with_context(|| format!("invalid priority for employee {id}"))?;
        let mut employee = Employee::new(EmployeeId::new(id), name, priority);
        if let Some(status) = optional_field(&rec, 3) {
            employee.status = parse_status(status)
                .with_context(|| format!("invalid status for employee {id}"))?;
        }
        if let Some(role) = optional_field(&rec, 4) {
            employee.role = parse_role(role)
                .with_context(|| format!("invalid role for employee {id}"))?;
        }
        out.push(employee);
    }
    Ok(out)
}

/// Import de congés: header `id,employee_id,kind,start,end,status[,reason]`.
/// Une date seule en fin d'intervalle couvre la journée entière.
pub fn import_leaves_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<LeaveInterval>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let employee = rec.get(1).context("missing employee_id")?.trim();
        let kind = parse_kind(rec.get(2).context("missing kind")?.trim())?;
        let (start, _) = parse_point(rec.get(3).context("missing start")?.trim())?;
        let (mut end, end_was_date) = parse_point(rec.get(4).context("missing end")?.trim())?;
        if end_was_date {
            end += Duration::days(1);
        }
        let status = parse_leave_status(rec.get(5).context("missing status")?.trim())?;

        let mut leave = LeaveInterval::new(EmployeeId::new(employee), kind, start, end)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("leave {id}"))?
            .with_status(status);
        if !id.is_empty() {
            leave.id = LeaveId::new(id);
        }
        leave.reason = optional_field(&rec, 6).map(str::to_string);
        out.push(leave);
    }
    Ok(out)
}

fn optional_field<'r>(rec: &'r csv::StringRecord, idx: usize) -> Option<&'r str> {
    rec.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_status(s: &str) -> anyhow::Result<EmployeeStatus> {
    match s.to_ascii_lowercase().as_str() {
        "active" | "true" | "1" | "yes" => Ok(EmployeeStatus::Active),
        "inactive" | "false" | "0" | "no" => Ok(EmployeeStatus::Inactive),
        _ => bail!("expected active/inactive"),
    }
}

fn parse_role(s: &str) -> anyhow::Result<Role> {
    match s.to_ascii_lowercase().as_str() {
        "owner" => Ok(Role::Owner),
        "employee" => Ok(Role::Employee),
        _ => bail!("expected owner/employee"),
    }
}

fn parse_kind(s: &str) -> anyhow::Result<LeaveKind> {
    match s.to_ascii_lowercase().as_str() {
        "vacation" => Ok(LeaveKind::Vacation),
        "sick" => Ok(LeaveKind::Sick),
        "personal" => Ok(LeaveKind::Personal),
        "emergency" => Ok(LeaveKind::Emergency),
        other => bail!("unknown leave kind: {other}"),
    }
}

fn parse_leave_status(s: &str) -> anyhow::Result<LeaveStatus> {
    match s.to_ascii_lowercase().as_str() {
        "" | "pending" => Ok(LeaveStatus::Pending),
        "approved" => Ok(LeaveStatus::Approved),
        "rejected" => Ok(LeaveStatus::Rejected),
        other => bail!("unknown leave status: {other}"),
    }
}

/// RFC3339 ou `AAAA-MM-JJ` (minuit UTC). Le booléen indique une date seule.
pub fn parse_point(raw: &str) -> anyhow::Result<(DateTime<Utc>, bool)> {
    if let Ok(dt) = raw.parse::<DateTime<Utc>>() {
        return Ok((dt, false));
    }
    let date = parse_date(raw)?;
    Ok((Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)), true))
}

pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date: {raw}"))
}

/// Export JSON du roster (jolie mise en forme)
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(roster)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des créneaux: header `id,date,name,start,end,status,assignees`
pub fn export_shifts_csv<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let file = fs::File::create(path)?;
    write_shifts_csv(file, roster)
}

pub fn write_shifts_csv<W: Write>(out: W, roster: &Roster) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(out);
    w.write_record(["id", "date", "name", "start", "end", "status", "assignees"])?;
    for s in &roster.shifts {
        let assignees = s
            .assignees
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(";");
        let status = match s.status {
            ShiftStatus::Assigned => "assigned",
            ShiftStatus::Emergency => "emergency",
        };
        let date = s.date.to_string();
        let start = s.start_time.format("%H:%M").to_string();
        let end = s.end_time.format("%H:%M").to_string();
        w.write_record([
            s.id.as_str(),
            date.as_str(),
            s.name.as_str(),
            start.as_str(),
            end.as_str(),
            status,
            assignees.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
