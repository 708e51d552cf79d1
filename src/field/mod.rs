//! Segment density and the fields derived from it.

mod body;
mod evaluate;
mod gradient;
mod kernel;
mod params;

pub use body::{
    Body, DEFAULT_BOUNDARY_WIDTH, DEFAULT_COUPLING_STRENGTH, DEFAULT_NATURAL_BOUNDARY,
    DEFAULT_SOFTENING_RADIUS, filter_bodies, solar_system_bodies,
};
pub use evaluate::{
    FieldKind, FieldSample, FieldScene, FieldSet, ScalarField, UnknownFieldKind, evaluate_points,
    evaluate_scene, heuristic_range,
};
pub use gradient::{DEFAULT_GRADIENT_STEP, field_gradient};
pub use kernel::{
    PHI, kernel, logistic, phi_spiral_frequency, refractive_index, segment_density, time_dilation,
};
pub use params::{FieldParams, FieldParamsPatch};
