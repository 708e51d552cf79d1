use std::fmt;

use serde::Serialize;

use crate::geom::Vec3;

/// Coupling strength γ used when a record does not specify one.
pub const DEFAULT_COUPLING_STRENGTH: f64 = 1.0;
/// Softening radius r0 (AU) used when a record does not specify one.
pub const DEFAULT_SOFTENING_RADIUS: f64 = 0.001;
/// Natural boundary radius (AU) used when a record does not specify one.
pub const DEFAULT_NATURAL_BOUNDARY: f64 = 0.01;
/// Boundary transition width δ (AU) used when a record does not specify one.
pub const DEFAULT_BOUNDARY_WIDTH: f64 = 0.002;

/// A gravitating body contributing one kernel to the segment density.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    pub name: String,
    pub position: Vec3,
    /// Mass relative to the Sun.
    pub mass_scale: f64,
    pub coupling_strength: f64,
    pub softening_radius: f64,
    pub natural_boundary: f64,
    /// Must be non-zero; a zero width turns the kernel into NaN or infinity.
    pub boundary_width: f64,
}

impl Body {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        position: Vec3,
        mass_scale: f64,
        coupling_strength: f64,
        softening_radius: f64,
        natural_boundary: f64,
        boundary_width: f64,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            mass_scale,
            coupling_strength,
            softening_radius,
            natural_boundary,
            boundary_width,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ ({:.3}, {:.3}, {:.3}) (M={:.6}, γ={:.3})",
            self.name,
            self.position.x,
            self.position.y,
            self.position.z,
            self.mass_scale,
            self.coupling_strength
        )
    }
}

/// Sun and the six inner-to-Saturn planets on the +X axis at rough AU distances.
#[must_use]
pub fn solar_system_bodies() -> Vec<Body> {
    vec![
        Body::new("Sun", Vec3::ZERO, 1.0, 1.0, 0.005, 0.025, 0.005),
        Body::new("Mercury", Vec3::new(0.39, 0.0, 0.0), 1.65e-7, 1.0, 0.0002, 0.001, 0.0002),
        Body::new("Venus", Vec3::new(0.72, 0.0, 0.0), 2.45e-6, 1.0, 0.0006, 0.002, 0.0004),
        Body::new("Earth", Vec3::new(1.00, 0.0, 0.0), 3.00e-6, 1.0, 0.0006, 0.002, 0.0004),
        Body::new("Mars", Vec3::new(1.52, 0.0, 0.0), 3.23e-7, 1.0, 0.0004, 0.0015, 0.0003),
        Body::new("Jupiter", Vec3::new(5.20, 0.0, 0.0), 9.54e-4, 1.0, 0.0005, 0.003, 0.0006),
        Body::new("Saturn", Vec3::new(9.58, 0.0, 0.0), 2.86e-4, 1.0, 0.0005, 0.003, 0.0006),
    ]
}

/// Bodies accepted by `is_enabled`, in their original order.
#[must_use]
pub fn filter_bodies(bodies: &[Body], mut is_enabled: impl FnMut(&Body) -> bool) -> Vec<Body> {
    bodies.iter().filter(|body| is_enabled(body)).cloned().collect()
}
