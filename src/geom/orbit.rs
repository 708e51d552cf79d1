//! Sampled trajectories drawn next to the field sphere: circular and elliptical
//! orbits in the ecliptic plane and golden-ratio spirals around a body.
//!
//! All samplers are closed: sample `i` sits at parameter `i / (n - 1)`, so the
//! last point repeats the first for a visually closed loop.

use std::f64::consts::{PI, TAU};

use super::core::Vec3;
use crate::field::PHI;

/// Gravitational parameter of the Sun in m³/s².
pub const GM_SUN: f64 = 1.327e20;
/// One astronomical unit in metres.
pub const AU_IN_METERS: f64 = 1.496e11;
/// Days per Julian year.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Planet name, semi-major axis (AU), eccentricity and inclination (degrees).
const PLANET_ELEMENTS: [(&str, f64, f64, f64); 6] = [
    ("Mercury", 0.387, 0.206, 7.0),
    ("Venus", 0.723, 0.007, 3.4),
    ("Earth", 1.000, 0.017, 0.0),
    ("Mars", 1.524, 0.093, 1.9),
    ("Jupiter", 5.204, 0.049, 1.3),
    ("Saturn", 9.582, 0.056, 2.5),
];

/// Orbits with eccentricity below this are drawn as plain circles.
const NEAR_CIRCULAR_ECCENTRICITY: f64 = 0.05;

/// A sampled orbit track for one planet.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitTrack {
    pub name: &'static str,
    pub points: Vec<Vec3>,
}

/// Parameter fraction of sample `i` out of `count` closed samples.
fn closed_fraction(i: usize, count: usize) -> f64 {
    if count < 2 {
        0.0
    } else {
        i as f64 / (count - 1) as f64
    }
}

/// Circle of `radius_au` in the z = 0 plane; first and last sample coincide.
#[must_use]
pub fn circle(radius_au: f64, num_points: usize) -> Vec<Vec3> {
    (0..num_points)
        .map(|i| {
            let angle = TAU * closed_fraction(i, num_points);
            Vec3::new(radius_au * angle.cos(), radius_au * angle.sin(), 0.0)
        })
        .collect()
}

/// Ellipse with the focus at the origin, tilted about the X axis.
///
/// The sweep parameter is used directly as the eccentric anomaly `E`; Kepler's
/// equation is not solved, so consecutive samples are not equally spaced in
/// time. True anomaly follows `tan(ν/2) = √((1+e)/(1−e)) · tan(E/2)` and the
/// radius `r = a(1 − e·cos E)`.
#[must_use]
pub fn ellipse(
    semi_major_axis: f64,
    eccentricity: f64,
    inclination_degrees: f64,
    num_points: usize,
) -> Vec<Vec3> {
    let inclination = inclination_degrees.to_radians();
    let plus = (1.0 + eccentricity).sqrt();
    let minus = (1.0 - eccentricity).sqrt();

    (0..num_points)
        .map(|i| {
            let e_anomaly = TAU * closed_fraction(i, num_points);
            let half = e_anomaly / 2.0;
            let nu = 2.0 * (plus * half.sin()).atan2(minus * half.cos());
            let r = semi_major_axis * (1.0 - eccentricity * e_anomaly.cos());

            Vec3::new(r * nu.cos(), r * nu.sin(), 0.0).rotate_x(inclination)
        })
        .collect()
}

/// Logarithmic spiral `r(θ) = base_radius · φ^(θ/π) · time_dilation` around
/// `center`, sampled at `floor(num_turns · points_per_turn)` points.
///
/// Like the orbit samplers, θ covers the closed interval `[0, num_turns · 2π]`:
/// the last sample lands exactly on the final turn instead of one step short.
#[must_use]
pub fn phi_spiral(
    center: Vec3,
    base_radius: f64,
    time_dilation: f64,
    num_turns: f64,
    points_per_turn: usize,
) -> Vec<Vec3> {
    let total = (num_turns * points_per_turn as f64).max(0.0) as usize;

    (0..total)
        .map(|i| {
            let angle = num_turns * TAU * closed_fraction(i, total);
            let r = base_radius * PHI.powf(angle / PI) * time_dilation;
            center + Vec3::new(r * angle.cos(), r * angle.sin(), 0.0)
        })
        .collect()
}

/// Circular orbital speed `√(GM/r)` in km/s, for a central mass in solar masses.
#[must_use]
pub fn orbital_velocity(radius_au: f64, central_mass: f64) -> f64 {
    let radius_m = radius_au * AU_IN_METERS;
    (GM_SUN * central_mass / radius_m).sqrt() / 1000.0
}

/// Orbital period in days from Kepler's third law in AU / solar-mass units.
#[must_use]
pub fn orbital_period(radius_au: f64, central_mass: f64) -> f64 {
    radius_au.powf(1.5) / central_mass.sqrt() * DAYS_PER_YEAR
}

/// Tracks for Mercury through Saturn; outer planets get more samples.
#[must_use]
pub fn solar_system_orbits() -> Vec<OrbitTrack> {
    PLANET_ELEMENTS
        .iter()
        .map(|&(name, a, e, inclination)| {
            let num_points = (200.0 + a * 20.0) as usize;
            let points = if e < NEAR_CIRCULAR_ECCENTRICITY {
                circle(a, num_points)
            } else {
                ellipse(a, e, inclination, num_points)
            };
            OrbitTrack { name, points }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_sample_counts() {
        assert!(circle(1.0, 0).is_empty());
        assert_eq!(circle(2.0, 1), vec![Vec3::new(2.0, 0.0, 0.0)]);
        assert!(phi_spiral(Vec3::ZERO, 1.0, 1.0, 0.0, 10).is_empty());
    }

    #[test]
    fn test_earth_orbital_velocity_and_period() {
        let v = orbital_velocity(1.0, 1.0);
        assert!((v - 29.78).abs() < 0.05, "got {v} km/s");
        assert!((orbital_period(1.0, 1.0) - 365.25).abs() < 1e-9);
        assert!((orbital_period(4.0, 1.0) - 8.0 * 365.25).abs() < 1e-9);
    }

    #[test]
    fn test_solar_system_orbit_selection() {
        let tracks = solar_system_orbits();
        assert_eq!(tracks.len(), 6);

        let mercury = &tracks[0];
        assert_eq!(mercury.name, "Mercury");
        assert_eq!(mercury.points.len(), 207);
        // inclined ellipse leaves the ecliptic
        assert!(mercury.points.iter().any(|p| p.z.abs() > 1e-3));

        let venus = &tracks[1];
        assert!(venus.points.iter().all(|p| p.z == 0.0));
        assert!(venus.points.iter().all(|p| (p.length() - 0.723).abs() < 1e-12));
    }
}
