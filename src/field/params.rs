use std::fmt;

use serde::{Deserialize, Serialize};

/// Global field parameters, freely mutable between evaluation passes.
///
/// No invariants are enforced here; out-of-range results are clamped by the
/// density evaluation, not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldParams {
    /// Power-law index p of the kernel falloff.
    #[serde(alias = "p")]
    pub power_index: f64,
    #[serde(alias = "nBg")]
    pub background_density: f64,
    /// Upper clamp for the segment density.
    #[serde(alias = "nMax")]
    pub max_density: f64,
    /// Time dilation coupling α.
    pub alpha: f64,
    /// Refractive index coupling κ.
    pub kappa: f64,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            power_index: 2.0,
            background_density: 0.0,
            max_density: 5.0,
            alpha: 1.0,
            kappa: 0.015,
        }
    }
}

impl fmt::Display for FieldParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Params(p={:.1}, N_bg={:.3}, N_max={:.1}, α={:.2}, κ={:.3})",
            self.power_index, self.background_density, self.max_density, self.alpha, self.kappa
        )
    }
}

/// Partial parameter update; absent keys keep the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldParamsPatch {
    #[serde(alias = "p")]
    pub power_index: Option<f64>,
    #[serde(alias = "nBg")]
    pub background_density: Option<f64>,
    #[serde(alias = "nMax")]
    pub max_density: Option<f64>,
    pub alpha: Option<f64>,
    pub kappa: Option<f64>,
}

impl FieldParamsPatch {
    #[must_use]
    pub fn apply(self, base: FieldParams) -> FieldParams {
        FieldParams {
            power_index: self.power_index.unwrap_or(base.power_index),
            background_density: self.background_density.unwrap_or(base.background_density),
            max_density: self.max_density.unwrap_or(base.max_density),
            alpha: self.alpha.unwrap_or(base.alpha),
            kappa: self.kappa.unwrap_or(base.kappa),
        }
    }
}
