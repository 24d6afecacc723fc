//! Planner profile models and loaders.
//!
//! A profile carries everything the analysis needs besides the catalog itself: which drive
//! families and reactors are unlocked, campaign resource abundance, obsolescence
//! preferences, reference ship masses, fuel weights and the default mission target.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use ppp_propulsion::{FuelWeights, Resource, ResourceAbundance, ThrustRegime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_REF_PAYLOAD_TONS: f64 = 1_000.0;
pub const DEFAULT_REF_PROPELLANT_TONS: f64 = 1_000.0;
pub const REF_PAYLOAD_RANGE_TONS: (f64, f64) = (100.0, 300_000.0);
pub const REF_PROPELLANT_RANGE_TONS: (f64, f64) = (0.0, 300_000.0);
pub const MAX_MISSION_PAYLOAD_TONS: f64 = 300_000.0;

/// Saved planner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerProfile {
    pub unlocked_drive_families: Vec<String>,
    #[serde(alias = "unlocked_pp")]
    pub unlocked_reactors: Vec<String>,
    /// Resource key -> abundant. Missing resources are abundant.
    pub resource_abundance: BTreeMap<String, bool>,
    /// Treat idle backup power as a property a dominating drive must keep.
    pub care_backup: bool,
    /// Compare reactors on crew size.
    pub care_crew: bool,
    /// Never mark a drive obsolete because of another drive of its own family.
    pub ignore_intraclass: bool,
    /// Report accelerations in milli-g instead of g.
    pub accel_in_milligees: bool,
    pub ref_payload_tons: f64,
    pub ref_propellant_tons: f64,
    /// Resource key -> weight in the expensive fuel score.
    pub fuel_weights: BTreeMap<String, f64>,
    pub mission: MissionProfile,
}

impl Default for PlannerProfile {
    fn default() -> Self {
        Self {
            unlocked_drive_families: Vec::new(),
            unlocked_reactors: Vec::new(),
            resource_abundance: Resource::ALL
                .into_iter()
                .map(|r| (r.key().to_string(), true))
                .collect(),
            care_backup: true,
            care_crew: false,
            ignore_intraclass: false,
            accel_in_milligees: false,
            ref_payload_tons: DEFAULT_REF_PAYLOAD_TONS,
            ref_propellant_tons: DEFAULT_REF_PROPELLANT_TONS,
            fuel_weights: Resource::ALL
                .into_iter()
                .map(|r| (r.key().to_string(), r.default_fuel_weight()))
                .collect(),
            mission: MissionProfile::default(),
        }
    }
}

/// Default mission target used by the feasibility search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionProfile {
    pub delta_v_km_s: f64,
    pub accel_g: f64,
    pub regime: ThrustRegime,
    pub min_payload_tons: f64,
    pub propellant_min_tons: f64,
    pub propellant_max_tons: f64,
}

impl Default for MissionProfile {
    fn default() -> Self {
        Self {
            delta_v_km_s: 30.0,
            accel_g: 0.05,
            regime: ThrustRegime::Combat,
            min_payload_tons: 100.0,
            propellant_min_tons: 0.0,
            propellant_max_tons: 20_000.0,
        }
    }
}

/// Errors that can occur while loading or saving profiles.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access profile: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlannerProfile {
    /// Campaign abundance. Unknown resource keys are ignored.
    pub fn abundance(&self) -> ResourceAbundance {
        let mut abundance = ResourceAbundance::default();
        for (key, abundant) in &self.resource_abundance {
            if let Ok(resource) = key.parse::<Resource>() {
                abundance.set(resource, *abundant);
            }
        }
        abundance
    }

    /// Fuel weights, falling back to the default weight for resources the profile omits.
    pub fn fuel_weights(&self) -> FuelWeights {
        let mut weights = FuelWeights::default();
        for (key, weight) in &self.fuel_weights {
            if let Ok(resource) = key.parse::<Resource>() {
                weights.set(resource, *weight);
            }
        }
        weights
    }

    /// Replace non-finite numbers with defaults, clamp every value into its allowed range and
    /// rewrite resource maps with canonical keys.
    pub fn sanitized(mut self) -> Self {
        let defaults = PlannerProfile::default();

        self.ref_payload_tons = clamp_or(
            self.ref_payload_tons,
            defaults.ref_payload_tons,
            REF_PAYLOAD_RANGE_TONS,
        );
        self.ref_propellant_tons = clamp_or(
            self.ref_propellant_tons,
            defaults.ref_propellant_tons,
            REF_PROPELLANT_RANGE_TONS,
        );

        let mut abundance = BTreeMap::new();
        for (key, abundant) in &self.resource_abundance {
            match key.parse::<Resource>() {
                Ok(resource) => {
                    abundance.insert(resource.key().to_string(), *abundant);
                }
                Err(err) => warn!(target: "ppp.config", %err, "dropping abundance entry"),
            }
        }
        self.resource_abundance = abundance;

        let mut weights = BTreeMap::new();
        for (key, weight) in &self.fuel_weights {
            match key.parse::<Resource>() {
                Ok(resource) => {
                    let value = clamp_or(
                        *weight,
                        resource.default_fuel_weight(),
                        (0.0, resource.max_fuel_weight()),
                    );
                    weights.insert(resource.key().to_string(), value);
                }
                Err(err) => warn!(target: "ppp.config", %err, "dropping fuel weight"),
            }
        }
        for resource in Resource::ALL {
            weights
                .entry(resource.key().to_string())
                .or_insert(resource.default_fuel_weight());
        }
        self.fuel_weights = weights;

        let mission_defaults = MissionProfile::default();
        let m = &mut self.mission;
        m.delta_v_km_s = non_negative_or(m.delta_v_km_s, mission_defaults.delta_v_km_s);
        m.accel_g = non_negative_or(m.accel_g, mission_defaults.accel_g);
        m.min_payload_tons = clamp_or(
            m.min_payload_tons,
            mission_defaults.min_payload_tons,
            (0.0, MAX_MISSION_PAYLOAD_TONS),
        );
        m.propellant_min_tons =
            non_negative_or(m.propellant_min_tons, mission_defaults.propellant_min_tons);
        m.propellant_max_tons =
            non_negative_or(m.propellant_max_tons, mission_defaults.propellant_max_tons);

        self
    }

    /// Drop unlocked names the catalog does not know, and duplicates, keeping first-seen order.
    pub fn retain_known(&mut self, drive_families: &[String], reactor_names: &[String]) {
        self.unlocked_drive_families =
            retain_listed(&self.unlocked_drive_families, drive_families, "drive family");
        self.unlocked_reactors = retain_listed(&self.unlocked_reactors, reactor_names, "reactor");
    }
}

fn retain_listed(requested: &[String], known: &[String], kind: &str) -> Vec<String> {
    let known: BTreeSet<&str> = known.iter().map(String::as_str).collect();
    let mut seen = BTreeSet::new();
    let mut kept = Vec::new();
    for name in requested {
        if !known.contains(name.as_str()) {
            warn!(target: "ppp.config", kind, name = %name, "unknown unlocked entry dropped");
            continue;
        }
        if seen.insert(name.as_str()) {
            kept.push(name.clone());
        }
    }
    kept
}

fn clamp_or(value: f64, default: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        default
    }
}

fn non_negative_or(value: f64, default: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { default }
}

/// Load a profile from YAML, TOML (`.toml`) or JSON (`.json`) and sanitize its numbers.
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<PlannerProfile, ConfigError> {
    let path = path.as_ref();
    let profile: PlannerProfile = match extension(path).as_deref() {
        Some("toml") => toml::from_str(&fs::read_to_string(path)?)?,
        Some("json") => serde_json::from_reader(File::open(path)?)?,
        _ => serde_yaml::from_reader(File::open(path)?)?,
    };
    Ok(profile.sanitized())
}

/// Write a profile as pretty JSON, creating parent directories as needed.
pub fn save_profile<P: AsRef<Path>>(path: P, profile: &PlannerProfile) -> Result<(), ConfigError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, profile)?;
    Ok(())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
