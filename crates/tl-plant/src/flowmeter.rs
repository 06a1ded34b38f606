//! Flow meter: single-pole low-pass filter plus volume/mass totalizers.

use crate::error::{PlantError, PlantResult};
use tl_core::numeric::Extremum;
use tl_core::units::convert;

/// Stateful flow meter fed once per tick with a raw flow and the upstream
/// density.
///
/// The filter is a classic single-pole IIR, alpha = dt / (tau + dt):
/// it suppresses spikes from abrupt command changes while remaining exactly
/// accurate at steady state. tau = 0 disables filtering (the filter state is
/// still tracked so a later tau increase continues from the last reading).
#[derive(Clone, Debug)]
pub struct FlowMeter {
    name: String,
    tau_s: f64,
    filtered_lps: f64,
    last_lps: f64,
    last_kgps: f64,
    total_l: f64,
    total_kg: f64,
    min_lps: Extremum,
    max_lps: Extremum,
}

impl FlowMeter {
    /// Create a meter with a low-pass time constant.
    ///
    /// # Errors
    /// Returns an error if `tau_s` is negative.
    pub fn new(name: impl Into<String>, tau_s: f64) -> PlantResult<Self> {
        if tau_s < 0.0 {
            return Err(PlantError::InvalidArg {
                what: "time constant must be non-negative",
            });
        }
        Ok(Self {
            name: name.into(),
            tau_s,
            filtered_lps: 0.0,
            last_lps: 0.0,
            last_kgps: 0.0,
            total_l: 0.0,
            total_kg: 0.0,
            min_lps: Extremum::Unset,
            max_lps: Extremum::Unset,
        })
    }

    /// Ingest one measurement interval.
    ///
    /// Negative raw flow and density are clamped to zero. Totals accumulate
    /// the filtered flow over `dt_s`; min/max track the filtered value.
    ///
    /// # Errors
    /// Returns an error (with no state change) if `dt_s` is not positive.
    pub fn measure(&mut self, raw_lps: f64, rho_kg_m3: f64, dt_s: f64) -> PlantResult<()> {
        if dt_s <= 0.0 {
            return Err(PlantError::InvalidArg {
                what: "dt must be positive",
            });
        }

        let q = raw_lps.max(0.0);
        let rho = rho_kg_m3.max(0.0);

        if self.tau_s > 0.0 {
            let alpha = dt_s / (self.tau_s + dt_s);
            self.filtered_lps += alpha * (q - self.filtered_lps);
        } else {
            self.filtered_lps = q;
        }

        self.last_lps = self.filtered_lps;
        self.last_kgps = rho * convert::lps_to_m3s(self.filtered_lps);

        self.total_l += self.last_lps * dt_s;
        self.total_kg += self.last_kgps * dt_s;

        self.min_lps.observe_min(self.filtered_lps);
        self.max_lps.observe_max(self.filtered_lps);
        Ok(())
    }

    /// Zero the volume and mass totalizers.
    pub fn reset_totals(&mut self) {
        self.total_l = 0.0;
        self.total_kg = 0.0;
    }

    /// Forget the running min/max.
    pub fn reset_peaks(&mut self) {
        self.min_lps.reset();
        self.max_lps.reset();
    }

    /// Change the filter time constant; negative values are clamped to zero.
    pub fn set_time_constant(&mut self, tau_s: f64) {
        self.tau_s = tau_s.max(0.0);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time_constant_s(&self) -> f64 {
        self.tau_s
    }

    /// Last filtered volumetric flow [L/s].
    pub fn volumetric_flow_lps(&self) -> f64 {
        self.last_lps
    }

    /// Last mass flow [kg/s].
    pub fn mass_flow_kgps(&self) -> f64 {
        self.last_kgps
    }

    /// Totalized volume [L].
    pub fn total_volume_l(&self) -> f64 {
        self.total_l
    }

    /// Totalized mass [kg].
    pub fn total_mass_kg(&self) -> f64 {
        self.total_kg
    }

    /// Running minimum of the filtered flow; None until the first sample.
    pub fn min_flow_lps(&self) -> Option<f64> {
        self.min_lps.value()
    }

    /// Running maximum of the filtered flow; None until the first sample.
    pub fn max_flow_lps(&self) -> Option<f64> {
        self.max_lps.value()
    }
}
