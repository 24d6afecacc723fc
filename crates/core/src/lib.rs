//! Core units, constants, and shared primitives for the propulsion and power planner workspace.
//!
//! Catalog conventions: thrust in newtons, exhaust velocity in km/s, mass in metric tons,
//! power in gigawatts, acceleration in Earth-g.

/// Physical and catalog constants.
pub mod constants {
    /// Standard gravity used for every acceleration figure (m/s²).
    pub const G0: f64 = 9.81;
    /// Kilograms per metric ton.
    pub const KG_PER_TON: f64 = 1_000.0;
    /// Thrust (N) × exhaust velocity (km/s) divided by this gives jet power in GW.
    pub const DRIVE_POWER_DIVISOR: f64 = 2_000_000.0;
    /// Per-tank propellant amounts in templates are stored at a tenth of their display mass.
    pub const PROPELLANT_DISPLAY_SCALE: f64 = 10.0;
    /// Milli-g per g.
    pub const MILLIGEES_PER_G: f64 = 1_000.0;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{G0, KG_PER_TON, MILLIGEES_PER_G};

    /// Convert metric tons to kilograms.
    #[inline]
    pub fn tons_to_kg(v: f64) -> f64 {
        v * KG_PER_TON
    }

    /// Convert kilograms to metric tons.
    #[inline]
    pub fn kg_to_tons(v: f64) -> f64 {
        v / KG_PER_TON
    }

    /// Convert g to milli-g.
    #[inline]
    pub fn g_to_milligees(v: f64) -> f64 {
        v * MILLIGEES_PER_G
    }

    /// Convert milli-g to g.
    #[inline]
    pub fn milligees_to_g(v: f64) -> f64 {
        v / MILLIGEES_PER_G
    }

    /// Acceleration (g) from `thrust_n` on a ship of `mass_tons`; zero for non-positive mass.
    #[inline]
    pub fn acceleration_g(thrust_n: f64, mass_tons: f64) -> f64 {
        if mass_tons > 0.0 {
            thrust_n / (tons_to_kg(mass_tons) * G0)
        } else {
            0.0
        }
    }

    /// Largest ship mass (tons) that `thrust_n` can push at `accel_g`.
    #[inline]
    pub fn max_mass_for_acceleration(thrust_n: f64, accel_g: f64) -> f64 {
        thrust_n / (accel_g * KG_PER_TON * G0)
    }
}

/// Rocket-equation helpers.
pub mod rocket {
    /// Tsiolkovsky delta-v in the units of `exhaust_velocity`.
    ///
    /// Returns zero when the exhaust velocity is non-positive or the masses do not
    /// describe a burn (`wet > dry > 0`).
    #[inline]
    pub fn delta_v(exhaust_velocity: f64, wet_mass: f64, dry_mass: f64) -> f64 {
        if exhaust_velocity > 0.0 && dry_mass > 0.0 && wet_mass > dry_mass {
            exhaust_velocity * (wet_mass / dry_mass).ln()
        } else {
            0.0
        }
    }

    /// Wet/dry mass ratio required for `delta_v`; may be infinite for extreme targets.
    #[inline]
    pub fn mass_ratio(delta_v: f64, exhaust_velocity: f64) -> f64 {
        (delta_v / exhaust_velocity).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::rocket::{delta_v, mass_ratio};
    use super::units::{acceleration_g, max_mass_for_acceleration};

    #[test]
    fn mass_ratio_inverts_delta_v() {
        let r = mass_ratio(30.0, 50.0);
        let dv = delta_v(50.0, r * 100.0, 100.0);
        assert!((dv - 30.0).abs() < 1e-9);
    }

    #[test]
    fn delta_v_zero_without_burn() {
        assert_eq!(delta_v(50.0, 100.0, 100.0), 0.0);
        assert_eq!(delta_v(0.0, 200.0, 100.0), 0.0);
        assert_eq!(delta_v(50.0, 200.0, 0.0), 0.0);
    }

    #[test]
    fn acceleration_and_mass_ceiling_agree() {
        let m = max_mass_for_acceleration(1.0e6, 0.05);
        assert!((acceleration_g(1.0e6, m) - 0.05).abs() < 1e-12);
        assert_eq!(acceleration_g(1.0e6, 0.0), 0.0);
    }
}
