//! Drive records and their derived metrics.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use ppp_core::constants::{DRIVE_POWER_DIVISOR, PROPELLANT_DISPLAY_SCALE};
use ppp_dominance::Record;
use serde::{Deserialize, Serialize};

use crate::resources::{FuelWeights, Resource, ResourceAbundance};

/// Required-reactor tag meaning "any reactor will do".
pub const ANY_REACTOR: &str = "Any Reactor";

/// When a drive supplies backup power to the ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackupMode {
    Always,
    WhenIdle,
    WhenActive,
    #[default]
    Never,
}

impl BackupMode {
    /// Map the game's raw value (`Always`, `DriveIdle`, `DriveActive`, `Never`).
    /// Anything unrecognised means no backup.
    pub fn from_template(raw: &str) -> Self {
        match raw.trim() {
            "Always" => BackupMode::Always,
            "DriveIdle" => BackupMode::WhenIdle,
            "DriveActive" => BackupMode::WhenActive,
            _ => BackupMode::Never,
        }
    }

    /// Raw values the game templates use for this field.
    pub const TEMPLATE_VALUES: [&'static str; 4] = ["Always", "DriveIdle", "DriveActive", "Never"];

    pub fn has_idle_backup(self) -> bool {
        matches!(self, BackupMode::Always | BackupMode::WhenIdle)
    }
}

impl fmt::Display for BackupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackupMode::Always => "Always",
            BackupMode::WhenIdle => "When Not Thrusting",
            BackupMode::WhenActive => "When Thrusting",
            BackupMode::Never => "Never",
        })
    }
}

/// Thrust setting used when judging acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThrustRegime {
    /// Thrust × combat thrust multiplier.
    #[default]
    Combat,
    Cruise,
}

impl fmt::Display for ThrustRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThrustRegime::Combat => "combat",
            ThrustRegime::Cruise => "cruise",
        })
    }
}

/// Propulsion drive as supplied by the catalog loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drive {
    pub name: String,
    /// Family name shared by every size variant (`... x1` to `... x6`).
    pub family: String,
    pub thrust_n: f64,
    pub exhaust_velocity_km_s: f64,
    pub efficiency: f64,
    pub mass_tons: f64,
    pub combat_thrust_multiplier: f64,
    #[serde(default)]
    pub propellant_type: String,
    /// Per-tank propellant mass fractions as stored by the catalog.
    #[serde(default)]
    pub propellant: BTreeMap<Resource, f64>,
    #[serde(default)]
    pub backup: BackupMode,
    #[serde(default = "any_reactor")]
    pub required_reactor_class: String,
    #[serde(default)]
    pub unlock_project: String,
    #[serde(default)]
    pub unlock_cost: f64,
}

fn any_reactor() -> String {
    ANY_REACTOR.to_string()
}

impl Drive {
    /// Approximate jet power in GW.
    pub fn power_gw(&self) -> f64 {
        self.thrust_n * self.exhaust_velocity_km_s / DRIVE_POWER_DIVISOR
    }

    pub fn has_idle_backup(&self) -> bool {
        self.backup.has_idle_backup()
    }

    /// True when any propellant with a positive share is not abundant.
    pub fn uses_scarce_propellant(&self, abundance: &ResourceAbundance) -> bool {
        self.propellant
            .iter()
            .any(|(res, amount)| *amount > 0.0 && !abundance.is_abundant(*res))
    }

    /// Weighted sum of per-tank propellant display masses. Resources without a weight are skipped.
    pub fn expensive_fuel_score(&self, weights: &FuelWeights) -> f64 {
        self.propellant
            .iter()
            .filter(|(_, amount)| **amount > 0.0)
            .filter_map(|(res, amount)| {
                weights
                    .weight(*res)
                    .map(|w| w * amount * PROPELLANT_DISPLAY_SCALE)
            })
            .sum()
    }

    /// Human-readable propellant mix, e.g. `20 water, 5 fissiles`.
    pub fn propellant_mix(&self) -> String {
        let parts: Vec<String> = self
            .propellant
            .iter()
            .filter(|(_, amount)| **amount > 0.0)
            .map(|(res, amount)| format!("{} {}", amount * PROPELLANT_DISPLAY_SCALE, res))
            .collect();
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Strip the trailing size suffix (` x3`) from a drive display name.
pub fn family_name(display_name: &str) -> String {
    let trimmed = display_name.trim_end();
    if let Some(idx) = trimmed.rfind(|c: char| c.is_whitespace()) {
        let suffix = &trimmed[idx + 1..];
        let mut chars = suffix.chars();
        let is_size = matches!(chars.next(), Some('x' | 'X'))
            && suffix.len() > 1
            && chars.all(|c| c.is_ascii_digit());
        if is_size {
            return trimmed[..idx].trim().to_string();
        }
    }
    trimmed.trim().to_string()
}

/// Drive plus the metrics that depend on campaign settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveFeatures {
    pub drive: Drive,
    pub power_gw: f64,
    pub idle_backup: bool,
    pub scarce_propellant: bool,
    pub fuel_score: f64,
}

impl DriveFeatures {
    pub fn new(drive: Drive, abundance: &ResourceAbundance, weights: &FuelWeights) -> Self {
        Self {
            power_gw: drive.power_gw(),
            idle_backup: drive.has_idle_backup(),
            scarce_propellant: drive.uses_scarce_propellant(abundance),
            fuel_score: drive.expensive_fuel_score(weights),
            drive,
        }
    }
}

/// Compute features for a set of drives.
pub fn build_drive_features<'a, I>(
    drives: I,
    abundance: &ResourceAbundance,
    weights: &FuelWeights,
) -> Vec<DriveFeatures>
where
    I: IntoIterator<Item = &'a Drive>,
{
    drives
        .into_iter()
        .map(|d| DriveFeatures::new(d.clone(), abundance, weights))
        .collect()
}

impl Record for DriveFeatures {
    fn label(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.drive.name)
    }

    fn class_key(&self) -> Option<&str> {
        Some(&self.drive.family)
    }

    fn unlock_cost(&self) -> f64 {
        self.drive.unlock_cost
    }
}
