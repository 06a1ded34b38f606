//! Engine configuration: tank setups, pump ratings, policies, named presets.

use serde::{Deserialize, Serialize};
use tl_plant::TankConfig;

/// Hysteresis margin above the low limit before a blocked path re-arms [L].
pub const DEFAULT_HYSTERESIS_BAND_L: f64 = 5.0;

/// Interlock strictness for a transfer path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InterlockPolicy {
    /// Latch the pump command to zero when the commanded direction would pull
    /// from an empty tank or push into a full one. The operator must re-issue
    /// the command; this is a trip, not a transient clamp.
    TripAndHold,
    /// Block flow while the destination sits at its high limit or the source
    /// is within `band_l` of the low limit. The stored command stays armed
    /// and flow resumes once the band clears; the margin prevents chattering
    /// right at the limit.
    Hysteresis { band_l: f64 },
}

/// Temperature mixing model applied to transferred volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MixingPolicy {
    /// Volume-weighted average at entry, destination level sampled before
    /// the inflow is added.
    MassWeighted,
    /// Exponential blend against the post-inflow destination level, which
    /// weights the incoming volume lower.
    Blend,
}

/// History retention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HistoryCapacity {
    /// Append without limit.
    Unbounded,
    /// Ring buffer keeping the most recent N samples.
    Bounded(usize),
}

/// Initial inventory for one tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankSetup {
    pub config: TankConfig,
    pub initial_level_l: f64,
    pub initial_temperature_c: f64,
}

/// Full engine configuration.
///
/// Quantities that tend to live as embedded constants (capacities, pump
/// ratings, alarm setpoints) are explicit fields here. There is no default
/// pump rating: the metered and trainer configurations are rated differently
/// (35 vs 20 L/s), so every configuration states its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub tanks: [TankSetup; 3],
    /// Rated maximum flow per pump path [L/s]
    pub pump_max_flow_lps: [f64; 2],
    /// Flow meter low-pass time constant [s]; 0 disables filtering
    pub meter_tau_s: f64,
    pub interlock: InterlockPolicy,
    pub mixing: MixingPolicy,
    pub history: HistoryCapacity,
}

impl EngineConfig {
    /// Metered process configuration: 35 L/s pumps, trip-and-hold
    /// interlocks, inlet mixing, unbounded history. Pairs with
    /// `tl_fluids::SimpleWater`.
    pub fn metered() -> Self {
        let tank = |level_l: f64, temperature_c: f64| TankSetup {
            config: TankConfig::default(),
            initial_level_l: level_l,
            initial_temperature_c: temperature_c,
        };
        Self {
            tanks: [tank(700.0, 60.0), tank(250.0, 35.0), tank(100.0, 25.0)],
            pump_max_flow_lps: [35.0, 35.0],
            meter_tau_s: 0.0,
            interlock: InterlockPolicy::TripAndHold,
            mixing: MixingPolicy::MassWeighted,
            history: HistoryCapacity::Unbounded,
        }
    }

    /// Operator-trainer configuration: 20 L/s pumps, hysteresis-band
    /// interlocks, post-transfer blend mixing, 200-sample history ring,
    /// ambient losses disabled, alarms at the hard limits. Pairs with
    /// `tl_fluids::LinearWater`.
    pub fn trainer() -> Self {
        let tank = |level_l: f64, temperature_c: f64| TankSetup {
            config: TankConfig {
                ua_kw_per_k: 0.0,
                ll_pct: 0.0,
                hh_pct: 100.0,
                ..TankConfig::default()
            },
            initial_level_l: level_l,
            initial_temperature_c: temperature_c,
        };
        Self {
            tanks: [tank(1000.0, 51.0), tank(0.0, 20.0), tank(0.0, 20.0)],
            pump_max_flow_lps: [20.0, 20.0],
            meter_tau_s: 0.0,
            interlock: InterlockPolicy::Hysteresis {
                band_l: DEFAULT_HYSTERESIS_BAND_L,
            },
            mixing: MixingPolicy::Blend,
            history: HistoryCapacity::Bounded(200),
        }
    }
}
