use crate::geom::Vec3;

use super::body::Body;
use super::evaluate::{FieldKind, FieldSample};
use super::params::FieldParams;

/// Default finite-difference step in AU.
pub const DEFAULT_GRADIENT_STEP: f64 = 0.01;

/// Central-difference gradient of `kind` at `point` with step `h` per axis.
///
/// Where the density is clamped the gradient is zero along that axis.
#[must_use]
pub fn field_gradient(
    point: Vec3,
    bodies: &[Body],
    params: &FieldParams,
    kind: FieldKind,
    h: f64,
) -> Vec3 {
    let sample = |p: Vec3| FieldSample::at(p, bodies, params).get(kind);
    let axis = |dir: Vec3| (sample(point + dir * h) - sample(point - dir * h)) / (2.0 * h);
    Vec3::new(axis(Vec3::X), axis(Vec3::Y), axis(Vec3::Z))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide_body() -> Body {
        // large boundary so the kernel is a plain power law around r = 1
        Body::new("Wide", Vec3::ZERO, 1.0, 1.0, 0.0, 1.0e6, 1.0)
    }

    fn unclamped() -> FieldParams {
        FieldParams {
            max_density: 1.0e9,
            ..FieldParams::default()
        }
    }

    #[test]
    fn test_density_gradient_points_toward_body() {
        let grad = field_gradient(
            Vec3::new(1.0, 0.0, 0.0),
            &[wide_body()],
            &unclamped(),
            FieldKind::Density,
            DEFAULT_GRADIENT_STEP,
        );
        // d/dr r^-2 = -2 at r = 1
        assert!((grad.x + 2.0).abs() < 1e-3, "{grad:?}");
        assert!(grad.y.abs() < 1e-9);
        assert!(grad.z.abs() < 1e-9);
    }

    #[test]
    fn test_time_dilation_gradient_opposes_density() {
        let point = Vec3::new(0.0, 2.0, 0.0);
        let bodies = [wide_body()];
        let params = unclamped();
        let dn = field_gradient(point, &bodies, &params, FieldKind::Density, 0.01);
        let dtau = field_gradient(point, &bodies, &params, FieldKind::TimeDilation, 0.01);
        assert!(dn.y < 0.0);
        assert!(dtau.y > 0.0);
    }

    #[test]
    fn test_gradient_of_background_is_zero() {
        let params = FieldParams {
            background_density: 1.5,
            ..FieldParams::default()
        };
        let point = Vec3::new(0.3, -0.2, 0.1);
        let grad = field_gradient(point, &[], &params, FieldKind::RefractiveIndex, 0.01);
        assert_eq!(grad, Vec3::ZERO);
    }
}
