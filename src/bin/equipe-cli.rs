#![forbid(unsafe_code)]
use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use equipe::{
    config::{export_config_json, load_config_or_default, ScheduleConfig},
    io,
    model::{DateRange, EmployeeId, LeaveId, LeaveStatus, ShiftId},
    scheduler::{CancelToken, ConflictKind, ReplacePolicy, Scheduler},
    storage::{JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification d'équipe
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du roster
    #[arg(long, global = true, default_value = "roster.json")]
    roster: String,

    /// Fichier JSON de configuration (créneaux, effectif, horizon)
    #[arg(long, global = true, default_value = "equipe.json")]
    config: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Écrire la configuration par défaut
    InitConfig {
        #[arg(long)]
        out: Option<String>,
    },

    /// Importer des employés depuis un CSV
    ImportEmployees {
        #[arg(long)]
        csv: String,
    },

    /// Importer des congés depuis un CSV
    ImportLeaves {
        #[arg(long)]
        csv: String,
    },

    /// Modifier la priorité d'un employé
    SetPriority {
        #[arg(long)]
        employee: String,
        #[arg(long, allow_hyphen_values = true)]
        priority: i32,
    },

    /// Approuver une demande de congé
    ApproveLeave {
        #[arg(long)]
        leave: String,
    },

    /// Refuser une demande de congé
    RejectLeave {
        #[arg(long)]
        leave: String,
    },

    /// Saisir un créneau à la main
    AssignManual {
        /// AAAA-MM-JJ
        #[arg(long)]
        date: String,
        /// nom du créneau configuré
        #[arg(long)]
        slot: String,
        /// liste "id1,id2,..."
        #[arg(long)]
        employees: String,
    },

    /// Générer le planning sur une période (défaut : aujourd'hui + horizon)
    Generate {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        headcount: Option<u32>,
        /// Conserver les saisies manuelles de la période
        #[arg(long)]
        preserve_manual: bool,
    },

    /// Absence d'urgence : retirer un employé de ses créneaux du jour
    Emergency {
        #[arg(long)]
        employee: String,
        /// AAAA-MM-JJ, aujourd'hui par défaut
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Céder sa place sur un créneau
    Swap {
        #[arg(long)]
        shift_id: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        with: String,
    },

    /// Lister et optionnellement exporter
    List {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier les conflits
    Check {
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Statistiques du planning
    Stats {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let config = load_config_or_default(&cli.config)?;
    let storage = JsonStorage::open(&cli.roster)?;
    let today = Utc::now().date_naive();

    let code = match cli.cmd {
        Commands::InitConfig { out } => {
            let path = out.unwrap_or_else(|| cli.config.clone());
            export_config_json(&path, &ScheduleConfig::default())?;
            println!("Config written to {path}");
            0
        }
        Commands::ImportEmployees { csv } => {
            let mut scheduler = Scheduler::with_roster(storage.load_or_default()?);
            let employees = io::import_employees_csv(csv)?;
            let n = employees.len();
            for e in employees {
                scheduler.roster_mut().upsert_employee(e);
            }
            storage.save(scheduler.roster())?;
            println!("{n} employee(s) imported");
            0
        }
        Commands::ImportLeaves { csv } => {
            let mut scheduler = Scheduler::with_roster(storage.load_or_default()?);
            let leaves = io::import_leaves_csv(csv)?;
            let n = leaves.len();
            for leave in leaves {
                scheduler.add_leave(leave)?;
            }
            storage.save(scheduler.roster())?;
            println!("{n} leave(s) imported");
            0
        }
        Commands::SetPriority { employee, priority } => {
            let mut scheduler = Scheduler::with_roster(storage.load()?);
            scheduler.set_priority(&EmployeeId::new(employee), priority)?;
            storage.save(scheduler.roster())?;
            0
        }
        Commands::ApproveLeave { leave } => {
            let mut scheduler = Scheduler::with_roster(storage.load()?);
            scheduler.set_leave_status(&LeaveId::new(leave), LeaveStatus::Approved)?;
            storage.save(scheduler.roster())?;
            0
        }
        Commands::RejectLeave { leave } => {
            let mut scheduler = Scheduler::with_roster(storage.load()?);
            scheduler.set_leave_status(&LeaveId::new(leave), LeaveStatus::Rejected)?;
            storage.save(scheduler.roster())?;
            0
        }
        Commands::AssignManual {
            date,
            slot,
            employees,
        } => {
            let mut scheduler = Scheduler::with_roster(storage.load()?);
            let date = io::parse_date(&date)?;
            let def = config
                .find_slot(&slot)
                .ok_or_else(|| anyhow!("unknown slot: {slot}"))?;
            let ids = parse_id_list(&employees);
            if ids.is_empty() {
                bail!("no employee given");
            }
            let id = scheduler.add_manual_shift(date, def, ids)?;
            storage.save(scheduler.roster())?;
            println!("{}", id.as_str());
            0
        }
        Commands::Generate {
            start,
            end,
            headcount,
            preserve_manual,
        } => {
            let range = resolve_range(start, end, config.default_range(today))?;
            let mut opts = config.generate_options();
            if let Some(n) = headcount {
                opts.headcount = n;
            }
            if preserve_manual {
                opts.replace_policy = ReplacePolicy::PreserveManual;
            }
            let mut scheduler = Scheduler::new();
            let report =
                scheduler.generate_with_storage(&storage, range, &opts, &CancelToken::new())?;
            println!(
                "{} slot(s) from {} to {}: {} assigned, {} understaffed, {} emergency, {} manual kept",
                report.slots,
                range.start,
                range.end,
                report.assigned,
                report.understaffed,
                report.emergency,
                report.preserved_manual
            );
            // Code 2 = WARNING/INCOMPLETE
            if report.emergency > 0 {
                2
            } else {
                0
            }
        }
        Commands::Emergency {
            employee,
            date,
            reason,
        } => {
            let mut scheduler = Scheduler::with_roster(storage.load()?);
            let date = match date {
                Some(d) => io::parse_date(&d)?,
                None => today,
            };
            let employee = EmployeeId::new(employee);
            let outcome = scheduler.emergency_leave(&employee, date, reason)?;
            storage.save(scheduler.roster())?;
            if outcome.is_empty() {
                println!("No shift held by {} on {date}", employee.as_str());
            }
            for r in &outcome.reassignments {
                match &r.replacement {
                    Some(id) => println!("{} → {}", r.shift.as_str(), id.as_str()),
                    None => println!("{} → no replacement (emergency)", r.shift.as_str()),
                }
            }
            if outcome.uncovered().next().is_some() {
                2
            } else {
                0
            }
        }
        Commands::Swap {
            shift_id,
            from,
            with,
        } => {
            let mut scheduler = Scheduler::with_roster(storage.load()?);
            let id = scheduler.swap(
                &ShiftId::new(shift_id),
                &EmployeeId::new(from),
                &EmployeeId::new(with),
            )?;
            storage.save(scheduler.roster())?;
            println!("{}", id.as_str());
            0
        }
        Commands::List { out_json, out_csv } => {
            let roster = storage.load()?;
            if let Some(path) = out_json {
                io::export_roster_json(path, &roster)?;
            }
            if let Some(path) = out_csv {
                io::export_shifts_csv(path, &roster)?;
            }
            // impression compacte
            for s in &roster.shifts {
                let names: Vec<&str> = s
                    .assignees
                    .iter()
                    .map(|id| roster.find_employee(id).map_or(id.as_str(), |e| e.name.as_str()))
                    .collect();
                let assigned = if names.is_empty() {
                    "-".to_string()
                } else {
                    names.join(", ")
                };
                println!(
                    "{} | {} {} {}–{} | {}",
                    s.id.as_str(),
                    s.date,
                    s.name,
                    s.start_time.format("%H:%M"),
                    s.end_time.format("%H:%M"),
                    assigned
                );
            }
            0
        }
        Commands::Check { report } => {
            let scheduler = Scheduler::with_roster(storage.load()?);
            let conflicts = scheduler.detect_conflicts();
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["employee_id", "date", "shift_a", "shift_b", "kind"])?;
                    for c in &conflicts {
                        let date = c.date.to_string();
                        w.write_record([
                            c.employee.as_str(),
                            date.as_str(),
                            c.shift_a.as_str(),
                            c.shift_b.as_ref().map_or("", |s| s.as_str()),
                            match c.kind {
                                ConflictKind::DoubleBooking => "double",
                                ConflictKind::LeaveViolation => "leave",
                                ConflictKind::InactiveAssignee => "inactive",
                            },
                        ])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Stats { start, end } => {
            let scheduler = Scheduler::with_roster(storage.load()?);
            let range = match (start, end) {
                (None, None) => None,
                (start, end) => Some(resolve_range(start, end, config.default_range(today))?),
            };
            let stats = scheduler.stats(range);
            println!(
                "total={} assigned={} emergency={} understaffed={} manual={}",
                stats.total, stats.assigned, stats.emergency, stats.understaffed, stats.manual
            );
            0
        }
    };

    std::process::exit(code);
}

fn parse_id_list(list: &str) -> Vec<EmployeeId> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(EmployeeId::new)
        .collect()
}

fn resolve_range(
    start: Option<String>,
    end: Option<String>,
    fallback: DateRange,
) -> Result<DateRange> {
    let start: NaiveDate = match start {
        Some(s) => io::parse_date(&s)?,
        None => fallback.start,
    };
    let end: NaiveDate = match end {
        Some(s) => io::parse_date(&s)?,
        None => fallback.end.max(start),
    };
    DateRange::new(start, end)
        .map_err(anyhow::Error::msg)
        .context("invalid --start/--end")
}
