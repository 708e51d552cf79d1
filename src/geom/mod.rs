mod core;
mod diagnostics;
mod icosphere;
mod orbit;

pub use core::{Tolerance, Vec3};
pub use diagnostics::{MeshDiagnostics, MeshStats};
pub use icosphere::{IcosphereError, IcosphereMesh, MAX_SUBDIVISIONS, expected_counts};
pub use orbit::{
    AU_IN_METERS, DAYS_PER_YEAR, GM_SUN, OrbitTrack, circle, ellipse, orbital_period,
    orbital_velocity, phi_spiral, solar_system_orbits,
};

#[cfg(test)]
mod tests;
