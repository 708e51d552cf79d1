//! Tests for the orbit and spiral samplers.

use std::f64::consts::PI;

use crate::field::PHI;
use crate::geom::{Tolerance, Vec3, circle, ellipse, phi_spiral};

#[test]
fn circle_is_closed_and_planar() {
    let points = circle(1.5, 64);
    let tol = Tolerance::DEFAULT;

    assert_eq!(points.len(), 64);
    assert!(tol.approx_eq_vec3(points[0], Vec3::new(1.5, 0.0, 0.0)));
    assert!(tol.approx_eq_vec3(points[63], points[0]));
    for p in &points {
        assert_eq!(p.z, 0.0);
        assert!(tol.approx_eq_f64(p.length(), 1.5));
    }
}

#[test]
fn zero_eccentricity_ellipse_matches_circle() {
    let ring = circle(1.0, 100);
    let orbit = ellipse(1.0, 0.0, 0.0, 100);
    let tol = Tolerance::DEFAULT;

    assert_eq!(ring.len(), orbit.len());
    for (i, (a, b)) in ring.iter().zip(&orbit).enumerate() {
        assert!(tol.approx_eq_vec3(*a, *b), "point {i}: {a:?} vs {b:?}");
    }
}

#[test]
fn ellipse_has_perihelion_and_aphelion_on_x_axis() {
    let a = 2.0;
    let e = 0.5;
    let points = ellipse(a, e, 0.0, 101);
    let tol = Tolerance::new(1e-9);

    // E = 0 -> perihelion at a(1 - e); E = π (sample 50) -> aphelion at a(1 + e).
    assert!(tol.approx_eq_vec3(points[0], Vec3::new(a * (1.0 - e), 0.0, 0.0)));
    assert!(tol.approx_eq_vec3(points[50], Vec3::new(-a * (1.0 + e), 0.0, 0.0)));
    assert!(tol.approx_eq_vec3(points[100], points[0]));
}

#[test]
fn ellipse_inclination_tilts_about_x_axis() {
    let flat = ellipse(1.0, 0.2, 0.0, 40);
    let tilted = ellipse(1.0, 0.2, 90.0, 40);
    let tol = Tolerance::DEFAULT;

    for (f, t) in flat.iter().zip(&tilted) {
        assert!(tol.approx_eq_f64(f.x, t.x));
        assert!(tol.approx_eq_f64(t.y, 0.0));
        assert!(tol.approx_eq_f64(t.z, f.y));
    }
}

#[test]
fn ellipse_samples_are_not_time_uniform() {
    // Equal time steps sweep equal areas about the focus; uniform eccentric
    // anomaly steps do not.
    let points = ellipse(1.0, 0.6, 0.0, 9);
    let swept = |a: Vec3, b: Vec3| 0.5 * a.cross(b).length();
    let near_perihelion = swept(points[0], points[1]);
    let near_aphelion = swept(points[4], points[5]);
    assert!(near_aphelion > 2.0 * near_perihelion);
}

#[test]
fn phi_spiral_grows_by_phi_squared_per_turn() {
    let center = Vec3::new(1.0, 2.0, 3.0);
    let points = phi_spiral(center, 0.1, 0.5, 2.0, 50);
    let tol = Tolerance::new(1e-12);

    assert_eq!(points.len(), 100);
    assert!(tol.approx_eq_vec3(points[0], center + Vec3::new(0.05, 0.0, 0.0)));

    // last sample is at θ = 4π, radius grows by φ^(4π/π)
    let expected = 0.1 * PHI.powf(4.0 * PI / PI) * 0.5;
    let last = *points.last().unwrap() - center;
    assert!(Tolerance::new(1e-9).approx_eq_f64(last.length(), expected));
    assert!(points.iter().all(|p| p.z == center.z));
}
