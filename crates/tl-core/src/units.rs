// tl-core/src/units.rs

use uom::si::f64::{
    MassDensity as UomMassDensity, MassRate as UomMassRate, Power as UomPower,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
    Volume as UomVolume, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Volume = UomVolume;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn liters(v: f64) -> Volume {
    use uom::si::volume::liter;
    Volume::new::<liter>(v)
}

#[inline]
pub fn lps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::liter_per_second;
    VolumeRate::new::<liter_per_second>(v)
}

#[inline]
pub fn celsius(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn kilowatts(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

#[inline]
pub fn seconds(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// Scalar conversions between operator units (L, L/s) and SI, with uom as the
/// conversion authority rather than hand-written factors.
pub mod convert {
    use super::*;

    /// Liters to cubic meters.
    #[inline]
    pub fn liters_to_m3(v: f64) -> f64 {
        use uom::si::volume::cubic_meter;
        liters(v).get::<cubic_meter>()
    }

    /// Liters/second to cubic meters/second.
    #[inline]
    pub fn lps_to_m3s(v: f64) -> f64 {
        use uom::si::volume_rate::cubic_meter_per_second;
        lps(v).get::<cubic_meter_per_second>()
    }

    /// Liters/second to cubic meters/hour (display helper).
    #[inline]
    pub fn lps_to_m3h(v: f64) -> f64 {
        use uom::si::volume_rate::cubic_meter_per_hour;
        lps(v).get::<cubic_meter_per_hour>()
    }

    /// Cubic meters/hour to liters/second.
    #[inline]
    pub fn m3h_to_lps(v: f64) -> f64 {
        use uom::si::volume_rate::{cubic_meter_per_hour, liter_per_second};
        VolumeRate::new::<cubic_meter_per_hour>(v).get::<liter_per_second>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _v = liters(1000.0);
        let _q = lps(35.0);
        let _t = celsius(60.0);
        let _p = kilowatts(0.005);
        let _dt = seconds(1.0);
    }

    #[test]
    fn conversions_round_trip() {
        assert!((convert::liters_to_m3(1000.0) - 1.0).abs() < 1e-12);
        assert!((convert::lps_to_m3s(1.0) - 1e-3).abs() < 1e-15);
        assert!((convert::lps_to_m3h(1.0) - 3.6).abs() < 1e-9);
        assert!((convert::m3h_to_lps(3.6) - 1.0).abs() < 1e-9);
    }
}
