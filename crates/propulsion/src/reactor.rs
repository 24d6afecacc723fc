//! Power plant records.

use std::borrow::Cow;

use ppp_dominance::Record;
use serde::{Deserialize, Serialize};

/// Reactor as supplied by the catalog loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reactor {
    pub name: String,
    /// Class tag matched against a drive's required reactor class.
    pub class: String,
    pub max_output_gw: f64,
    /// Reactor mass per GW of output (tons/GW).
    pub specific_power_t_gw: f64,
    pub efficiency: f64,
    pub crew: f64,
    #[serde(default = "general_use_default")]
    pub general_use: bool,
    #[serde(default)]
    pub unlock_project: String,
    #[serde(default)]
    pub unlock_cost: f64,
}

fn general_use_default() -> bool {
    true
}

impl Reactor {
    /// Mass of the reactor when run at `output_gw`, never above its own maximum output.
    pub fn mass_at_output(&self, output_gw: f64) -> f64 {
        self.specific_power_t_gw * output_gw.clamp(0.0, self.max_output_gw.max(0.0))
    }
}

impl Record for Reactor {
    fn label(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn class_key(&self) -> Option<&str> {
        Some(&self.class)
    }

    fn unlock_cost(&self) -> f64 {
        self.unlock_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_scales_to_drawn_output() {
        let reactor = Reactor {
            name: "Fission Pile".to_string(),
            class: "Fission".to_string(),
            max_output_gw: 1.0,
            specific_power_t_gw: 2.0,
            efficiency: 0.5,
            crew: 10.0,
            general_use: true,
            unlock_project: String::new(),
            unlock_cost: 0.0,
        };
        assert!((reactor.mass_at_output(0.025) - 0.05).abs() < 1e-12);
        assert!((reactor.mass_at_output(4.0) - 2.0).abs() < 1e-12);
        assert_eq!(reactor.mass_at_output(-1.0), 0.0);
    }

    #[test]
    fn general_use_defaults_to_true() {
        let json = r#"{"name":"R","class":"Fusion","max_output_gw":2.0,
            "specific_power_t_gw":1.0,"efficiency":0.9,"crew":5.0}"#;
        let reactor: Reactor = serde_json::from_str(json).unwrap();
        assert!(reactor.general_use);
        assert_eq!(reactor.unlock_cost, 0.0);
    }
}
