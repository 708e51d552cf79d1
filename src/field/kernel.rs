//! Closed-form field model: softened power-law kernels with logistic
//! natural-boundary saturation, and the two fields derived from density.
//!
//! Preconditions are the caller's job. A zero `boundary_width` or a zero
//! `r + softening_radius` yields NaN or infinity, which is passed through
//! unchanged rather than repaired.

use crate::geom::Vec3;

use super::body::Body;
use super::params::FieldParams;

/// Golden ratio φ = (1 + √5) / 2.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Logistic saturation `1 / (1 + e^-x)`.
#[inline]
#[must_use]
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Softened power-law kernel with natural boundary saturation:
/// `mass_scale / (r + softening_radius)^power_index · σ((natural_boundary − r) / boundary_width)`.
#[inline]
#[must_use]
pub fn kernel(
    r: f64,
    mass_scale: f64,
    softening_radius: f64,
    power_index: f64,
    natural_boundary: f64,
    boundary_width: f64,
) -> f64 {
    let power_term = mass_scale / (r + softening_radius).powf(power_index);
    let saturation = logistic((natural_boundary - r) / boundary_width);
    power_term * saturation
}

/// Segment density at `point`: background plus every body's weighted kernel,
/// clamped to `[0, params.max_density]`. NaN is not clamped.
#[must_use]
pub fn segment_density(point: Vec3, bodies: &[Body], params: &FieldParams) -> f64 {
    let density = bodies.iter().fold(params.background_density, |acc, body| {
        let r = point.distance_to(body.position);
        acc + body.coupling_strength
            * kernel(
                r,
                body.mass_scale,
                body.softening_radius,
                params.power_index,
                body.natural_boundary,
                body.boundary_width,
            )
    });
    clamp_density(density, params.max_density)
}

/// `max(0, min(max_density, density))`, letting NaN through.
#[inline]
fn clamp_density(density: f64, max_density: f64) -> f64 {
    if density.is_nan() {
        return density;
    }
    density.min(max_density).max(0.0)
}

/// Time dilation `φ^(−α·N)`; 1 at zero density, non-increasing for α ≥ 0.
#[inline]
#[must_use]
pub fn time_dilation(density: f64, alpha: f64) -> f64 {
    PHI.powf(-alpha * density)
}

/// Refractive index `1 + κ·N`; 1 at zero density, non-decreasing for κ ≥ 0.
#[inline]
#[must_use]
pub fn refractive_index(density: f64, kappa: f64) -> f64 {
    1.0 + kappa * density
}

/// Clock spiral frequency `φ / τ`; faster where time runs slower.
#[inline]
#[must_use]
pub fn phi_spiral_frequency(time_dilation: f64) -> f64 {
    PHI / time_dilation
}
