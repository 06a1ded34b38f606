//! Water property models.
//!
//! `SimpleWater` is the primary correlation set: stable closed-form fits over
//! the liquid range 0–100 °C, accurate enough for lumped tank simulation.
//! `LinearWater` is the coarser fit carried by the operator-trainer
//! configuration; only its density differs.

use crate::model::LiquidModel;
use tl_core::numeric::Real;

/// Liquid range lower bound for correlation evaluation [°C].
const T_MIN_C: Real = 0.0;
/// Liquid range upper bound for correlation evaluation [°C].
const T_MAX_C: Real = 100.0;

#[inline]
fn clamp_t(t_c: Real) -> Real {
    t_c.clamp(T_MIN_C, T_MAX_C)
}

/// Correlation-based water model.
///
/// Density: ρ(T) = 998.2·(1 − 0.0003·(T−20)), floored at 950 kg/m³.
/// Viscosity: μ(T) = 1.002e-3·exp(−0.017·(T−20)), ~1.0e-3 Pa·s at 20 °C,
/// ~0.5e-3 Pa·s at 60 °C.
/// Conductivity: k(T) = 0.561 + 0.00116·T (~0.561 → 0.677 over 0–100 °C).
/// Expansion: β(T) = 1.8e-4 + 3.0e-6·(T−20).
/// Specific heat held constant at 4.18 kJ/(kg·K).
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleWater;

impl LiquidModel for SimpleWater {
    fn name(&self) -> &str {
        "simple-water"
    }

    fn rho(&self, t_c: Real) -> Real {
        let t = clamp_t(t_c);
        (998.2 * (1.0 - 0.0003 * (t - 20.0))).max(950.0)
    }

    fn cp(&self, _t_c: Real) -> Real {
        4.18
    }

    fn mu(&self, t_c: Real) -> Real {
        let t = clamp_t(t_c);
        1.002e-3 * (-0.017 * (t - 20.0)).exp()
    }

    fn k_thermal(&self, t_c: Real) -> Real {
        let t = clamp_t(t_c);
        0.561 + 0.00116 * t
    }

    fn beta(&self, t_c: Real) -> Real {
        let t = clamp_t(t_c);
        1.8e-4 + 3.0e-6 * (t - 20.0)
    }
}

/// Linear water density fit: ρ(T) = 1000 − 0.3·(T−4), clamped to [950, 1000].
///
/// The coarser fit used by the operator-trainer configuration. The remaining
/// properties share `SimpleWater`'s correlations.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearWater;

impl LiquidModel for LinearWater {
    fn name(&self) -> &str {
        "linear-water"
    }

    fn rho(&self, t_c: Real) -> Real {
        (1000.0 - 0.3 * (t_c - 4.0)).clamp(950.0, 1000.0)
    }

    fn cp(&self, t_c: Real) -> Real {
        SimpleWater.cp(t_c)
    }

    fn mu(&self, t_c: Real) -> Real {
        SimpleWater.mu(t_c)
    }

    fn k_thermal(&self, t_c: Real) -> Real {
        SimpleWater.k_thermal(t_c)
    }

    fn beta(&self, t_c: Real) -> Real {
        SimpleWater.beta(t_c)
    }
}
