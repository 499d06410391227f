use crate::model::{DateRange, SlotDef};
use crate::scheduler::{default_slots, GenerateOptions, ReplacePolicy};
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

fn default_headcount() -> u32 {
    2
}

fn default_horizon_days() -> u32 {
    14
}

/// Paramètres de génération persistés (JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_slots")]
    pub slots: Vec<SlotDef>,
    #[serde(default = "default_headcount")]
    pub headcount: u32,
    /// Période par défaut : aujourd'hui + `horizon_days` jours.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    #[serde(default)]
    pub replace_policy: ReplacePolicy,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            slots: default_slots(),
            headcount: default_headcount(),
            horizon_days: default_horizon_days(),
            replace_policy: ReplacePolicy::default(),
        }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.slots.is_empty() {
            bail!("config must contain at least one slot");
        }
        if self.headcount == 0 {
            bail!("headcount must be > 0");
        }
        let mut names = HashSet::new();
        for slot in &self.slots {
            if slot.name.trim().is_empty() {
                bail!("slot name cannot be empty");
            }
            if slot.start_time == slot.end_time {
                bail!("slot {} start_time and end_time cannot be equal", slot.name);
            }
            if !names.insert(slot.name.as_str()) {
                bail!("duplicate slot name {}", slot.name);
            }
        }
        validate_slot_overlaps(&self.slots)
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            slots: self.slots.clone(),
            headcount: self.headcount,
            replace_policy: self.replace_policy,
        }
    }

    pub fn default_range(&self, today: NaiveDate) -> DateRange {
        DateRange::horizon(today, self.horizon_days)
    }

    pub fn find_slot(&self, name: &str) -> Option<&SlotDef> {
        self.slots.iter().find(|s| s.name == name)
    }
}

pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<ScheduleConfig> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let config: ScheduleConfig = serde_json::from_slice(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Charge le fichier s'il existe, sinon la configuration par défaut.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<ScheduleConfig> {
    if path.as_ref().exists() {
        load_config_from_file(path)
    } else {
        Ok(ScheduleConfig::default())
    }
}

pub fn export_config_json<P: AsRef<Path>>(path: P, config: &ScheduleConfig) -> Result<()> {
    config.validate()?;
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

const DAY_SECS: i32 = 24 * 60 * 60;

fn validate_slot_overlaps(slots: &[SlotDef]) -> Result<()> {
    for (i, slot_a) in slots.iter().enumerate() {
        for slot_b in slots.iter().skip(i + 1) {
            if slot_overlap(slot_a, slot_b) {
                bail!("config contains overlapping slots {} and {}", slot_a.name, slot_b.name);
            }
        }
    }
    Ok(())
}

// Les créneaux se répètent chaque jour : on compare aussi avec la veille et le lendemain.
fn slot_overlap(a: &SlotDef, b: &SlotDef) -> bool {
    let (a_start, a_end) = slot_bounds_seconds(a.start_time, a.end_time);
    let (b_start, b_end) = slot_bounds_seconds(b.start_time, b.end_time);
    [-DAY_SECS, 0, DAY_SECS]
        .iter()
        .any(|shift| !(a_end <= b_start + shift || b_end + shift <= a_start))
}

fn slot_bounds_seconds(start: NaiveTime, end: NaiveTime) -> (i32, i32) {
    let start_secs = start.num_seconds_from_midnight() as i32;
    let mut end_secs = end.num_seconds_from_midnight() as i32;
    if end <= start {
        end_secs += DAY_SECS;
    }
    (start_secs, end_secs)
}
