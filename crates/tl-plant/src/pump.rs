//! Commanded transfer pump with run-hour accounting.

use crate::common::EPSILON_FLOW_LPS;
use crate::error::{PlantError, PlantResult};

/// Bidirectional pump driven by a normalized command in [-1, 1].
///
/// Negative commands reverse the transfer direction. There are no failure
/// modes: commands are silently clamped.
#[derive(Clone, Debug)]
pub struct Pump {
    name: String,
    max_flow_lps: f64,
    command: f64,
    run_hours: f64,
}

impl Pump {
    /// Create a pump with a rated maximum flow.
    ///
    /// # Errors
    /// Returns an error if `max_flow_lps` is not positive.
    pub fn new(name: impl Into<String>, max_flow_lps: f64) -> PlantResult<Self> {
        if max_flow_lps <= 0.0 {
            return Err(PlantError::InvalidArg {
                what: "pump max flow must be positive",
            });
        }
        Ok(Self {
            name: name.into(),
            max_flow_lps,
            command: 0.0,
            run_hours: 0.0,
        })
    }

    /// Set the throttle command, clamped to [-1, 1].
    pub fn set_command(&mut self, command: f64) {
        self.command = command.clamp(-1.0, 1.0);
    }

    /// Latch the command to zero (interlock trip). The operator must re-issue
    /// a command before the pump moves fluid again.
    pub fn trip(&mut self) {
        self.command = 0.0;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> f64 {
        self.command
    }

    pub fn max_flow_lps(&self) -> f64 {
        self.max_flow_lps
    }

    /// Flow magnitude [L/s].
    pub fn unsigned_flow_lps(&self) -> f64 {
        self.command.abs() * self.max_flow_lps
    }

    /// Signed flow [L/s]; the sign encodes direction.
    pub fn signed_flow_lps(&self) -> f64 {
        self.command * self.max_flow_lps
    }

    /// +1 for forward (command >= 0), -1 for reverse.
    pub fn direction(&self) -> i8 {
        if self.command >= 0.0 { 1 } else { -1 }
    }

    /// Whether the pump currently moves fluid.
    pub fn is_running(&self) -> bool {
        self.unsigned_flow_lps() > EPSILON_FLOW_LPS
    }

    /// Cumulative run time [h], accumulated while flowing.
    pub fn run_hours(&self) -> f64 {
        self.run_hours
    }

    /// Accumulate run-hours over a tick. Non-positive `dt` is skipped.
    pub fn advance_hours(&mut self, dt_s: f64) {
        if dt_s <= 0.0 {
            return;
        }
        if self.is_running() {
            self.run_hours += dt_s / 3600.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_max_flow() {
        assert!(Pump::new("P1", 0.0).is_err());
        assert!(Pump::new("P1", -5.0).is_err());
    }

    #[test]
    fn command_clamped_to_unit_range() {
        let mut p = Pump::new("P1", 35.0).unwrap();
        p.set_command(2.5);
        assert_eq!(p.command(), 1.0);
        assert_eq!(p.signed_flow_lps(), 35.0);

        p.set_command(-7.0);
        assert_eq!(p.command(), -1.0);
        assert_eq!(p.signed_flow_lps(), -35.0);
        assert_eq!(p.unsigned_flow_lps(), 35.0);
    }

    #[test]
    fn direction_follows_command_sign() {
        let mut p = Pump::new("P1", 20.0).unwrap();
        assert_eq!(p.direction(), 1);
        p.set_command(-0.1);
        assert_eq!(p.direction(), -1);
    }

    #[test]
    fn run_hours_accumulate_only_while_flowing() {
        let mut p = Pump::new("P1", 20.0).unwrap();
        p.advance_hours(3600.0);
        assert_eq!(p.run_hours(), 0.0);

        p.set_command(0.5);
        p.advance_hours(3600.0);
        assert!((p.run_hours() - 1.0).abs() < 1e-12);

        // non-positive dt skipped
        p.advance_hours(-10.0);
        assert!((p.run_hours() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn trip_latches_command_to_zero() {
        let mut p = Pump::new("P1", 20.0).unwrap();
        p.set_command(1.0);
        p.trip();
        assert_eq!(p.command(), 0.0);
        assert!(!p.is_running());
    }
}
