//! Propellant resources, campaign abundance and fuel cost weights.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Resource a drive may burn as propellant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Water,
    Volatiles,
    Metals,
    NobleMetals,
    Fissiles,
    Antimatter,
    Exotics,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Water,
        Resource::Volatiles,
        Resource::Metals,
        Resource::NobleMetals,
        Resource::Fissiles,
        Resource::Antimatter,
        Resource::Exotics,
    ];

    /// Key used by the game templates and by planner profiles.
    pub fn key(self) -> &'static str {
        match self {
            Resource::Water => "water",
            Resource::Volatiles => "volatiles",
            Resource::Metals => "metals",
            Resource::NobleMetals => "nobleMetals",
            Resource::Fissiles => "fissiles",
            Resource::Antimatter => "antimatter",
            Resource::Exotics => "exotics",
        }
    }

    /// Default weight in the expensive fuel score.
    pub fn default_fuel_weight(self) -> f64 {
        match self {
            Resource::Fissiles => 5.0,
            Resource::Antimatter | Resource::Exotics => 20.0,
            _ => 1.0,
        }
    }

    /// Largest weight a profile may assign.
    pub fn max_fuel_weight(self) -> f64 {
        match self {
            Resource::Fissiles => 20.0,
            Resource::Antimatter | Resource::Exotics => 50.0,
            _ => 10.0,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownResource(pub String);

impl fmt::Display for UnknownResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown resource '{}'", self.0)
    }
}

impl std::error::Error for UnknownResource {}

impl FromStr for Resource {
    type Err = UnknownResource;

    /// Accepts template keys (`nobleMetals`) as well as snake or spaced spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | ' ' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        Resource::ALL
            .into_iter()
            .find(|r| r.key().to_lowercase() == folded)
            .ok_or_else(|| UnknownResource(s.to_string()))
    }
}

/// Which resources are plentiful in the current campaign. Missing entries count as abundant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceAbundance(BTreeMap<Resource, bool>);

impl ResourceAbundance {
    pub fn is_abundant(&self, resource: Resource) -> bool {
        self.0.get(&resource).copied().unwrap_or(true)
    }

    pub fn set(&mut self, resource: Resource, abundant: bool) {
        self.0.insert(resource, abundant);
    }

    /// Builder form of [`ResourceAbundance::set`].
    pub fn with(mut self, resource: Resource, abundant: bool) -> Self {
        self.set(resource, abundant);
        self
    }

    /// Every resource with its effective abundance.
    pub fn entries(&self) -> impl Iterator<Item = (Resource, bool)> + '_ {
        Resource::ALL.into_iter().map(|r| (r, self.is_abundant(r)))
    }
}

/// Per-resource weights feeding the expensive fuel score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuelWeights(BTreeMap<Resource, f64>);

impl Default for FuelWeights {
    fn default() -> Self {
        Self(
            Resource::ALL
                .into_iter()
                .map(|r| (r, r.default_fuel_weight()))
                .collect(),
        )
    }
}

impl FuelWeights {
    /// Weights with no entries; every resource then scores zero.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn weight(&self, resource: Resource) -> Option<f64> {
        self.0.get(&resource).copied()
    }

    pub fn set(&mut self, resource: Resource, weight: f64) {
        self.0.insert(resource, weight);
    }

    pub fn with(mut self, resource: Resource, weight: f64) -> Self {
        self.set(resource, weight);
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (Resource, f64)> + '_ {
        self.0.iter().map(|(r, w)| (*r, *w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_template_and_profile_spellings() {
        assert_eq!("nobleMetals".parse::<Resource>(), Ok(Resource::NobleMetals));
        assert_eq!("noble_metals".parse::<Resource>(), Ok(Resource::NobleMetals));
        assert_eq!("Antimatter".parse::<Resource>(), Ok(Resource::Antimatter));
        assert!("helium".parse::<Resource>().is_err());
    }

    #[test]
    fn missing_abundance_defaults_to_abundant() {
        let abundance = ResourceAbundance::default().with(Resource::Fissiles, false);
        assert!(abundance.is_abundant(Resource::Water));
        assert!(!abundance.is_abundant(Resource::Fissiles));
    }

    #[test]
    fn default_weights_cover_every_resource() {
        let weights = FuelWeights::default();
        assert_eq!(weights.weight(Resource::Fissiles), Some(5.0));
        assert_eq!(weights.weight(Resource::Exotics), Some(20.0));
        assert_eq!(weights.entries().count(), Resource::ALL.len());
    }

    #[test]
    fn serializes_with_template_keys() {
        let abundance = ResourceAbundance::default().with(Resource::NobleMetals, false);
        let json = serde_json::to_string(&abundance).unwrap();
        assert_eq!(json, r#"{"nobleMetals":false}"#);
    }
}
