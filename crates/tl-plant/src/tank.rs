//! Lumped tank model: liquid inventory, inlet mixing, ambient heat loss.

use serde::{Deserialize, Serialize};

use crate::common::{EPSILON_POWER_KW, EPSILON_TEMP_K, EPSILON_VOLUME_L};
use crate::error::{PlantError, PlantResult};
use tl_core::units::convert;
use tl_fluids::LiquidModel;

/// Hard safety clamp on tank temperature [°C]. Prevents runaway from
/// degenerate inputs; normal operation never reaches these bounds.
pub const T_SAFETY_MIN_C: f64 = -50.0;
pub const T_SAFETY_MAX_C: f64 = 200.0;

/// Static tank parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankConfig {
    /// Capacity [L], must be positive
    pub capacity_l: f64,
    /// Ambient heat-loss coefficient UA [kW/K]; values <= 0 disable losses
    pub ua_kw_per_k: f64,
    /// Ambient temperature [°C]
    pub ambient_c: f64,
    /// Low-level alarm threshold [% of capacity]
    pub ll_pct: f64,
    /// High-level alarm threshold [% of capacity]
    pub hh_pct: f64,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            capacity_l: 1000.0,
            ua_kw_per_k: 0.005,
            ambient_c: 20.0,
            ll_pct: 20.0,
            hh_pct: 80.0,
        }
    }
}

/// A well-mixed liquid tank.
///
/// Invariants enforced on every mutation:
/// - 0 <= level <= capacity
/// - temperature within the [-50, 200] °C safety clamp
#[derive(Clone, Debug)]
pub struct Tank {
    config: TankConfig,
    level_l: f64,
    temperature_c: f64,
}

impl Tank {
    /// Create a tank with an initial inventory.
    ///
    /// The initial level is clamped into [0, capacity] and the initial
    /// temperature into the safety range.
    ///
    /// # Errors
    /// Returns an error if the configured capacity is not positive.
    pub fn new(config: TankConfig, level_l: f64, temperature_c: f64) -> PlantResult<Self> {
        if config.capacity_l <= 0.0 {
            return Err(PlantError::InvalidArg {
                what: "tank capacity must be positive",
            });
        }
        Ok(Self {
            config,
            level_l: level_l.clamp(0.0, config.capacity_l),
            temperature_c: temperature_c.clamp(T_SAFETY_MIN_C, T_SAFETY_MAX_C),
        })
    }

    /// Add liquid, bounded by the remaining headroom.
    ///
    /// When an inlet temperature is given and the tank is non-empty, the new
    /// temperature is the volume-weighted average of the existing inventory
    /// and the accepted inflow (within-tank density variation is ignored for
    /// mixing). An empty tank adopts the inlet temperature exactly. Requests
    /// at or below epsilon are ignored.
    pub fn add(&mut self, volume_l: f64, inlet_temperature_c: Option<f64>) {
        let q = volume_l.max(0.0);
        if q <= 0.0 {
            return;
        }

        let v_old = self.level_l;
        let v_new = (v_old + q).min(self.config.capacity_l);
        let dv = (v_new - v_old).max(0.0);
        if dv <= EPSILON_VOLUME_L {
            return;
        }

        let Some(t_in) = inlet_temperature_c else {
            self.level_l = v_new;
            return;
        };

        if v_old <= EPSILON_VOLUME_L {
            self.temperature_c = t_in;
        } else {
            self.temperature_c = (v_old * self.temperature_c + dv * t_in) / (v_old + dv);
        }
        self.level_l = v_new;
        self.clamp_temperature();
    }

    /// Blend an already-added inflow into the tank temperature.
    ///
    /// Exponential blend against the current (post-inflow) level:
    /// a = V_in / (level + V_in), T <- (1-a)·T + a·T_in. A near-empty tank
    /// adopts the inflow temperature. This weights the inflow lower than
    /// inlet mixing via [`Tank::add`] and is the trainer mixing model.
    pub fn blend_inflow(&mut self, volume_l: f64, t_in_c: f64) {
        if volume_l <= EPSILON_VOLUME_L {
            return;
        }
        if self.level_l <= EPSILON_VOLUME_L {
            self.temperature_c = t_in_c;
        } else {
            let a = (volume_l / (self.level_l + volume_l)).clamp(0.0, 1.0);
            self.temperature_c = (1.0 - a) * self.temperature_c + a * t_in_c;
        }
        self.clamp_temperature();
    }

    /// Remove liquid, bounded by the current level. Returns the volume
    /// actually removed so callers can do conservation bookkeeping.
    pub fn remove(&mut self, volume_l: f64) -> f64 {
        let take = volume_l.max(0.0).min(self.level_l);
        self.level_l -= take;
        take
    }

    /// Newtonian cooling toward ambient over `dt_s`.
    ///
    /// dQ = UA·(T − ambient)·dt [kJ]; dT = −dQ / (m·cp). No-op when the tank
    /// is empty, losses are disabled, or the tank already sits at ambient.
    ///
    /// # Errors
    /// Returns an error (with no state change) if `dt_s` is not positive.
    pub fn thermal_loss(&mut self, fluid: &dyn LiquidModel, dt_s: f64) -> PlantResult<()> {
        if dt_s <= 0.0 {
            return Err(PlantError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if self.level_l <= EPSILON_VOLUME_L {
            return Ok(());
        }
        let t = self.temperature_c;
        if self.config.ua_kw_per_k <= 0.0 || (t - self.config.ambient_c).abs() <= EPSILON_TEMP_K {
            return Ok(());
        }

        // kW/K == kJ/(s·K), so dQ comes out in kJ
        let dq_kj = self.config.ua_kw_per_k * (t - self.config.ambient_c) * dt_s;
        let denom = self.thermal_mass_kj_per_k(fluid);
        if denom > EPSILON_VOLUME_L {
            self.temperature_c += -dq_kj / denom;
            self.clamp_temperature();
        }
        Ok(())
    }

    /// Apply external heating (positive) or cooling (negative) power over
    /// `dt_s`. No-op when the tank is empty or the power is negligible.
    ///
    /// # Errors
    /// Returns an error (with no state change) if `dt_s` is not positive.
    pub fn add_heat(&mut self, fluid: &dyn LiquidModel, power_kw: f64, dt_s: f64) -> PlantResult<()> {
        if dt_s <= 0.0 {
            return Err(PlantError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if self.level_l <= EPSILON_VOLUME_L || power_kw.abs() <= EPSILON_POWER_KW {
            return Ok(());
        }

        let denom = self.thermal_mass_kj_per_k(fluid);
        if denom > EPSILON_VOLUME_L {
            let dq_kj = power_kw * dt_s;
            self.temperature_c += dq_kj / denom;
            self.clamp_temperature();
        }
        Ok(())
    }

    /// Update the alarm thresholds (percent of capacity).
    pub fn set_alarm_thresholds(&mut self, ll_pct: f64, hh_pct: f64) {
        self.config.ll_pct = ll_pct;
        self.config.hh_pct = hh_pct;
    }

    pub fn config(&self) -> &TankConfig {
        &self.config
    }

    pub fn capacity_l(&self) -> f64 {
        self.config.capacity_l
    }

    pub fn level_l(&self) -> f64 {
        self.level_l
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn level_pct(&self) -> f64 {
        100.0 * self.level_l / self.config.capacity_l
    }

    pub fn low_alarm(&self) -> bool {
        self.level_pct() <= self.config.ll_pct
    }

    pub fn high_alarm(&self) -> bool {
        self.level_pct() >= self.config.hh_pct
    }

    /// Bulk density of the inventory [kg/m³].
    pub fn density_kg_m3(&self, fluid: &dyn LiquidModel) -> f64 {
        fluid.rho(self.temperature_c)
    }

    /// Mass of the inventory [kg].
    pub fn mass_kg(&self, fluid: &dyn LiquidModel) -> f64 {
        self.density_kg_m3(fluid) * convert::liters_to_m3(self.level_l)
    }

    /// m·cp [kJ/K] of the current inventory.
    fn thermal_mass_kj_per_k(&self, fluid: &dyn LiquidModel) -> f64 {
        self.mass_kg(fluid) * fluid.cp(self.temperature_c)
    }

    fn clamp_temperature(&mut self) {
        self.temperature_c = self.temperature_c.clamp(T_SAFETY_MIN_C, T_SAFETY_MAX_C);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_fluids::SimpleWater;

    fn tank(level_l: f64, temperature_c: f64) -> Tank {
        Tank::new(TankConfig::default(), level_l, temperature_c).unwrap()
    }

    #[test]
    fn rejects_non_positive_capacity() {
        let config = TankConfig {
            capacity_l: 0.0,
            ..TankConfig::default()
        };
        assert!(Tank::new(config, 0.0, 20.0).is_err());
    }

    #[test]
    fn add_respects_headroom() {
        let mut t = tank(900.0, 25.0);
        t.add(200.0, None);
        assert_eq!(t.level_l(), 1000.0);
    }

    #[test]
    fn add_mixes_volume_weighted() {
        let mut t = tank(250.0, 35.0);
        t.add(35.0, Some(60.0));
        let expected = (250.0 * 35.0 + 35.0 * 60.0) / 285.0;
        assert!((t.temperature_c() - expected).abs() < 1e-9);
        assert!((t.level_l() - 285.0).abs() < 1e-9);
    }

    #[test]
    fn empty_tank_adopts_inlet_temperature() {
        let mut t = tank(0.0, 20.0);
        t.add(50.0, Some(80.0));
        assert_eq!(t.temperature_c(), 80.0);
    }

    #[test]
    fn add_ignores_negative_and_epsilon_volumes() {
        let mut t = tank(100.0, 30.0);
        t.add(-5.0, Some(90.0));
        t.add(1e-12, Some(90.0));
        assert_eq!(t.level_l(), 100.0);
        assert_eq!(t.temperature_c(), 30.0);
    }

    #[test]
    fn remove_clamps_and_reports_actual() {
        let mut t = tank(30.0, 25.0);
        assert_eq!(t.remove(50.0), 30.0);
        assert_eq!(t.level_l(), 0.0);
        assert_eq!(t.remove(10.0), 0.0);
    }

    #[test]
    fn blend_inflow_weights_against_post_inflow_level() {
        let mut t = tank(100.0, 20.0);
        t.blend_inflow(25.0, 60.0);
        // a = 25 / (100 + 25) = 0.2
        let expected = 0.8 * 20.0 + 0.2 * 60.0;
        assert!((t.temperature_c() - expected).abs() < 1e-9);
    }

    #[test]
    fn blend_inflow_adopts_temperature_when_empty() {
        let mut t = tank(0.0, 20.0);
        t.blend_inflow(10.0, 75.0);
        assert_eq!(t.temperature_c(), 75.0);
    }

    #[test]
    fn thermal_loss_cools_toward_ambient() {
        let fluid = SimpleWater;
        let mut t = tank(500.0, 60.0);
        t.thermal_loss(&fluid, 60.0).unwrap();
        assert!(t.temperature_c() < 60.0);
        assert!(t.temperature_c() > t.config().ambient_c);
    }

    #[test]
    fn thermal_loss_noop_when_empty_or_at_ambient() {
        let fluid = SimpleWater;
        let mut empty = tank(0.0, 60.0);
        empty.thermal_loss(&fluid, 1.0).unwrap();
        assert_eq!(empty.temperature_c(), 60.0);

        let mut settled = tank(500.0, 20.0);
        settled.thermal_loss(&fluid, 1.0).unwrap();
        assert_eq!(settled.temperature_c(), 20.0);
    }

    #[test]
    fn thermal_ops_error_on_non_positive_dt_without_state_change() {
        let fluid = SimpleWater;
        let mut t = tank(500.0, 60.0);
        assert!(t.thermal_loss(&fluid, 0.0).is_err());
        assert!(t.add_heat(&fluid, 5.0, -1.0).is_err());
        assert_eq!(t.level_l(), 500.0);
        assert_eq!(t.temperature_c(), 60.0);
    }

    #[test]
    fn add_heat_raises_temperature() {
        let fluid = SimpleWater;
        let mut t = tank(100.0, 20.0);
        // 100 L ~ 99.9 kg; 418 kJ raises ~1 K
        t.add_heat(&fluid, 418.0, 1.0).unwrap();
        assert!((t.temperature_c() - 21.0).abs() < 0.05);
    }

    #[test]
    fn temperature_hard_clamped_under_runaway_heating() {
        let fluid = SimpleWater;
        let mut t = tank(1.0, 20.0);
        t.add_heat(&fluid, 1e9, 3600.0).unwrap();
        assert_eq!(t.temperature_c(), T_SAFETY_MAX_C);
        t.add_heat(&fluid, -1e9, 3600.0).unwrap();
        assert_eq!(t.temperature_c(), T_SAFETY_MIN_C);
    }

    #[test]
    fn alarms_track_thresholds() {
        let mut t = tank(200.0, 25.0);
        assert!(t.low_alarm());
        assert!(!t.high_alarm());

        t.add(650.0, None);
        assert!(!t.low_alarm());
        assert!(t.high_alarm());

        t.set_alarm_thresholds(5.0, 95.0);
        assert!(!t.high_alarm());
    }
}
