//! Common constants for component calculations.

/// Small epsilon for liquid volumes (L)
pub const EPSILON_VOLUME_L: f64 = 1e-9;

/// Small epsilon for volumetric flow (L/s); below this a pump counts as stopped
pub const EPSILON_FLOW_LPS: f64 = 1e-6;

/// Small epsilon for temperature differences (K)
pub const EPSILON_TEMP_K: f64 = 1e-9;

/// Small epsilon for heater power (kW)
pub const EPSILON_POWER_KW: f64 = 1e-12;
