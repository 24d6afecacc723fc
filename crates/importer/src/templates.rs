//! Conversion of raw template entries into drives and reactors.
//!
//! Some template fields have drifted between game versions, so the backup power field and the
//! required reactor field are located by inspecting values rather than by name.

use std::collections::{BTreeMap, BTreeSet};

use ppp_propulsion::{ANY_REACTOR, BackupMode, Drive, Reactor, Resource, family_name};
use serde_json::Value;
use tracing::{debug, warn};

use crate::Entry;

/// Required-reactor values that accept any reactor.
const ANY_SENTINELS: [&str; 4] = ["any_general", "any reactor", "any", "any power plant"];
const CLASS_SAMPLE_SIZE: usize = 100;
const MIN_CLASS_MATCHES: usize = 3;
const MIN_CLASS_SCORE: f64 = 0.3;

fn text(entry: &Entry, key: &str) -> String {
    match entry.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Numeric field, zero when missing, unparsable or non-finite.
fn number(entry: &Entry, key: &str) -> f64 {
    let value = match entry.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if value.is_finite() { value } else { 0.0 }
}

fn display_name(entry: &Entry) -> String {
    let friendly = text(entry, "friendlyName");
    if friendly.is_empty() {
        text(entry, "dataName")
    } else {
        friendly
    }
}

fn is_disabled(entry: &Entry) -> bool {
    text(entry, "disable").eq_ignore_ascii_case("true")
}

fn propellant_label(raw: &str) -> String {
    match raw {
        "ReactionProducts" => "Reaction Products".to_string(),
        "NobleGases" => "Noble Gases".to_string(),
        other => other.to_string(),
    }
}

fn propellant_shares(entry: &Entry) -> BTreeMap<Resource, f64> {
    let Some(Value::Object(materials)) = entry.get("perTankPropellantMaterials") else {
        return BTreeMap::new();
    };
    Resource::ALL
        .into_iter()
        .map(|res| (res, number(materials, res.key())))
        .filter(|(_, amount)| *amount != 0.0)
        .collect()
}

/// String values of `key` across all entries, trimmed, empties dropped.
fn string_values<'a>(entries: &'a [Entry], key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    entries.iter().filter_map(move |e| match e.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim()),
        _ => None,
    })
}

/// Fields holding at least one string value, in the order they first appear.
fn string_fields(entries: &[Entry]) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    entries
        .iter()
        .flat_map(|e| e.iter())
        .filter(|(_, v)| v.is_string())
        .map(|(k, _)| k.as_str())
        .filter(|k| seen.insert(*k))
        .collect()
}

/// First string field, in template order, whose values all belong to the backup power vocabulary.
pub fn detect_backup_field(entries: &[Entry]) -> Option<String> {
    string_fields(entries)
        .into_iter()
        .find(|field| {
            let mut values = string_values(entries, field).peekable();
            values.peek().is_some()
                && values.all(|v| BackupMode::TEMPLATE_VALUES.contains(&v))
        })
        .map(str::to_string)
}

/// Field most likely to hold the required reactor class.
///
/// Each string field is scored by the share of its distinct values (first 100) that are either
/// an "any" sentinel or a substring of a known reactor class. A candidate needs at least three
/// matches and a share of 0.3.
pub fn detect_required_class_field(
    entries: &[Entry],
    reactor_classes: &[String],
) -> Option<String> {
    let classes: Vec<String> = reactor_classes.iter().map(|c| c.to_lowercase()).collect();
    if classes.is_empty() {
        return None;
    }

    let mut best: Option<(f64, usize, &str)> = None;
    for field in string_fields(entries) {
        let mut seen = BTreeSet::new();
        let sample: Vec<&str> = string_values(entries, field)
            .filter(|v| seen.insert(*v))
            .take(CLASS_SAMPLE_SIZE)
            .collect();
        if sample.is_empty() {
            continue;
        }
        let matches = sample
            .iter()
            .filter(|v| {
                let lower = v.to_lowercase();
                let spaced = lower.replace('_', " ");
                ANY_SENTINELS.contains(&lower.as_str())
                    || classes
                        .iter()
                        .any(|c| c.contains(&lower) || c.contains(&spaced))
            })
            .count();
        let score = matches as f64 / sample.len() as f64;
        if matches < MIN_CLASS_MATCHES || score < MIN_CLASS_SCORE {
            continue;
        }
        let better = match best {
            None => true,
            Some((s, m, f)) => (score, matches, field) > (s, m, f),
        };
        if better {
            best = Some((score, matches, field));
        }
    }
    best.map(|(_, _, field)| field.to_string())
}

/// Build drives from template entries, skipping disabled ones.
pub fn parse_drives(
    entries: &[Entry],
    reactor_classes: &[String],
    unlock_costs: &BTreeMap<String, f64>,
) -> Vec<Drive> {
    let enabled: Vec<Entry> = entries.iter().filter(|e| !is_disabled(e)).cloned().collect();
    if enabled.len() != entries.len() {
        debug!(
            target: "ppp.importer",
            disabled = entries.len() - enabled.len(),
            "disabled drives skipped"
        );
    }

    let backup_field = detect_backup_field(&enabled);
    if backup_field.is_none() {
        warn!(target: "ppp.importer", "no backup power field found; every drive treated as Never");
    }
    let class_field = detect_required_class_field(&enabled, reactor_classes);
    if class_field.is_none() {
        warn!(
            target: "ppp.importer",
            "no required reactor field found; every drive accepts any reactor"
        );
    }

    enabled
        .iter()
        .map(|entry| {
            let name = display_name(entry);
            let required = class_field
                .as_deref()
                .map(|f| text(entry, f))
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| ANY_REACTOR.to_string());
            let unlock_project = text(entry, "requiredProjectName");
            let unlock_cost = unlock_costs.get(&unlock_project).copied().unwrap_or(0.0);
            Drive {
                family: family_name(&name),
                thrust_n: number(entry, "thrust_N"),
                exhaust_velocity_km_s: number(entry, "EV_kps"),
                efficiency: number(entry, "efficiency"),
                mass_tons: number(entry, "flatMass_tons"),
                combat_thrust_multiplier: number(entry, "thrustCap"),
                propellant_type: propellant_label(&text(entry, "propellant")),
                propellant: propellant_shares(entry),
                backup: backup_field
                    .as_deref()
                    .map(|f| BackupMode::from_template(&text(entry, f)))
                    .unwrap_or_default(),
                required_reactor_class: required,
                unlock_project,
                unlock_cost,
                name,
            }
        })
        .collect()
}

fn general_use(entry: &Entry) -> bool {
    match entry.get("generalUse") {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => *b,
        Some(_) => matches!(
            text(entry, "generalUse").to_lowercase().as_str(),
            "true" | "1" | "yes"
        ),
    }
}

/// Build reactors from template entries.
pub fn parse_reactors(entries: &[Entry], unlock_costs: &BTreeMap<String, f64>) -> Vec<Reactor> {
    entries
        .iter()
        .map(|entry| {
            let unlock_project = text(entry, "requiredProjectName");
            let unlock_cost = unlock_costs.get(&unlock_project).copied().unwrap_or(0.0);
            Reactor {
                name: display_name(entry),
                class: text(entry, "powerPlantClass"),
                max_output_gw: number(entry, "maxOutput_GW"),
                specific_power_t_gw: number(entry, "specificPower_tGW"),
                efficiency: number(entry, "efficiency"),
                crew: number(entry, "crew"),
                general_use: general_use(entry),
                unlock_project,
                unlock_cost,
            }
        })
        .collect()
}
