//! Whole-mesh evaluation of the three scalar fields.
//!
//! Every vertex is sampled once; density, time dilation and refractive index
//! come out of the same traversal together with their observed ranges.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::{IcosphereMesh, Vec3};

use super::body::Body;
use super::kernel::{PHI, refractive_index, segment_density, time_dilation};
use super::params::FieldParams;

/// Floor for the normalization denominator of a flat field.
const MIN_RANGE: f64 = 1e-9;

/// Which of the three derived scalars to read.
///
/// Parsing accepts the camelCase names plus the selector shorthands `N`,
/// `tau` and `NIDX`. `N` and `n` are matched case-sensitively since they
/// name different fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    #[default]
    Density,
    TimeDilation,
    RefractiveIndex,
}

/// Names matched after trimming and lowercasing.
const FIELD_KIND_NAMES: [(&str, FieldKind); 10] = [
    ("density", FieldKind::Density),
    ("segmentdensity", FieldKind::Density),
    ("timedilation", FieldKind::TimeDilation),
    ("time_dilation", FieldKind::TimeDilation),
    ("tau", FieldKind::TimeDilation),
    ("dilation", FieldKind::TimeDilation),
    ("refractiveindex", FieldKind::RefractiveIndex),
    ("refractive_index", FieldKind::RefractiveIndex),
    ("refraction", FieldKind::RefractiveIndex),
    ("nidx", FieldKind::RefractiveIndex),
];

impl FieldKind {
    pub const ALL: [FieldKind; 3] = [
        FieldKind::Density,
        FieldKind::TimeDilation,
        FieldKind::RefractiveIndex,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            FieldKind::Density => "density",
            FieldKind::TimeDilation => "timeDilation",
            FieldKind::RefractiveIndex => "refractiveIndex",
        }
    }

    /// Short symbol used in status lines.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            FieldKind::Density => "N",
            FieldKind::TimeDilation => "τ",
            FieldKind::RefractiveIndex => "n",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field kind `{0}` (expected density, timeDilation or refractiveIndex)")]
pub struct UnknownFieldKind(pub String);

impl FromStr for FieldKind {
    type Err = UnknownFieldKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match name {
            "N" => return Ok(FieldKind::Density),
            "n" => return Ok(FieldKind::RefractiveIndex),
            _ => {}
        }
        let key = name.to_ascii_lowercase();
        FIELD_KIND_NAMES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|&(_, kind)| kind)
            .ok_or_else(|| UnknownFieldKind(s.to_owned()))
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

/// Per-vertex values of one field together with their observed range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarField {
    pub values: Vec<f64>,
    pub min: f64,
    pub max: f64,
}

impl ScalarField {
    /// Builds a field and scans its range. An empty field has the range `[0, 0]`.
    #[must_use]
    pub fn from_values(values: Vec<f64>) -> Self {
        let mut range = RangeBuilder::new(values.len());
        for value in values {
            range.push(value);
        }
        range.finish()
    }

    /// Maps `value` into `[0, 1]` relative to this field's range.
    ///
    /// Values outside the range map outside `[0, 1]`; color lookup clamps them.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min).max(MIN_RANGE)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The three fields of one evaluation pass, aligned with the sampled points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSet {
    pub density: ScalarField,
    pub time_dilation: ScalarField,
    pub refractive_index: ScalarField,
}

impl FieldSet {
    #[must_use]
    pub fn field(&self, kind: FieldKind) -> &ScalarField {
        match kind {
            FieldKind::Density => &self.density,
            FieldKind::TimeDilation => &self.time_dilation,
            FieldKind::RefractiveIndex => &self.refractive_index,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.density.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }
}

/// Read-only evaluation context: a shared mesh plus the inputs of one pass.
#[derive(Debug, Clone)]
pub struct FieldScene {
    pub mesh: Arc<IcosphereMesh>,
    pub bodies: Vec<Body>,
    pub params: FieldParams,
}

impl FieldScene {
    #[must_use]
    pub fn new(mesh: Arc<IcosphereMesh>, bodies: Vec<Body>, params: FieldParams) -> Self {
        Self {
            mesh,
            bodies,
            params,
        }
    }

    #[must_use]
    pub fn evaluate(&self) -> FieldSet {
        evaluate_scene(self)
    }
}

/// The three scalars at a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    pub density: f64,
    pub time_dilation: f64,
    pub refractive_index: f64,
}

impl FieldSample {
    #[must_use]
    pub fn at(point: Vec3, bodies: &[Body], params: &FieldParams) -> Self {
        let density = segment_density(point, bodies, params);
        Self {
            density,
            time_dilation: time_dilation(density, params.alpha),
            refractive_index: refractive_index(density, params.kappa),
        }
    }

    #[must_use]
    pub fn get(&self, kind: FieldKind) -> f64 {
        match kind {
            FieldKind::Density => self.density,
            FieldKind::TimeDilation => self.time_dilation,
            FieldKind::RefractiveIndex => self.refractive_index,
        }
    }
}

/// Evaluates all three fields at every mesh vertex of `scene`.
#[must_use]
pub fn evaluate_scene(scene: &FieldScene) -> FieldSet {
    evaluate_points(scene.mesh.vertices(), &scene.bodies, &scene.params)
}

/// Evaluates all three fields at `points`, in order.
#[must_use]
pub fn evaluate_points(points: &[Vec3], bodies: &[Body], params: &FieldParams) -> FieldSet {
    let fields = sample_all(points, bodies, params).finish();
    log::debug!(
        "evaluated fields at {} points from {} bodies | N [{:.4}, {:.4}] τ [{:.4}, {:.4}] n [{:.5}, {:.5}]",
        points.len(),
        bodies.len(),
        fields.density.min,
        fields.density.max,
        fields.time_dilation.min,
        fields.time_dilation.max,
        fields.refractive_index.min,
        fields.refractive_index.max
    );
    fields
}

#[cfg(feature = "parallel")]
fn sample_all(points: &[Vec3], bodies: &[Body], params: &FieldParams) -> FieldAccumulator {
    points
        .par_iter()
        .map(|&point| FieldSample::at(point, bodies, params))
        .fold(FieldAccumulator::default, FieldAccumulator::push)
        .reduce(FieldAccumulator::default, FieldAccumulator::merge)
}

#[cfg(not(feature = "parallel"))]
fn sample_all(points: &[Vec3], bodies: &[Body], params: &FieldParams) -> FieldAccumulator {
    points
        .iter()
        .map(|&point| FieldSample::at(point, bodies, params))
        .fold(
            FieldAccumulator::with_capacity(points.len()),
            FieldAccumulator::push,
        )
}

/// Range estimate from the parameters alone, without sampling the mesh.
///
/// Assumes non-negative `alpha` and `kappa`; density spans `[0, max_density]`.
#[must_use]
pub fn heuristic_range(kind: FieldKind, params: &FieldParams) -> (f64, f64) {
    let max_density = params.max_density;
    match kind {
        FieldKind::Density => (0.0, max_density),
        FieldKind::TimeDilation => (PHI.powf(-params.alpha * max_density), 1.0),
        FieldKind::RefractiveIndex => (1.0, 1.0 + params.kappa * max_density),
    }
}

/// Three running ranges fed in point order; chunks merge left to right.
#[derive(Default)]
struct FieldAccumulator {
    density: RangeBuilder,
    time_dilation: RangeBuilder,
    refractive_index: RangeBuilder,
}

impl FieldAccumulator {
    #[cfg_attr(feature = "parallel", allow(dead_code))]
    fn with_capacity(capacity: usize) -> Self {
        Self {
            density: RangeBuilder::new(capacity),
            time_dilation: RangeBuilder::new(capacity),
            refractive_index: RangeBuilder::new(capacity),
        }
    }

    fn push(mut self, sample: FieldSample) -> Self {
        self.density.push(sample.density);
        self.time_dilation.push(sample.time_dilation);
        self.refractive_index.push(sample.refractive_index);
        self
    }

    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    fn merge(self, right: Self) -> Self {
        Self {
            density: self.density.merge(right.density),
            time_dilation: self.time_dilation.merge(right.time_dilation),
            refractive_index: self.refractive_index.merge(right.refractive_index),
        }
    }

    fn finish(self) -> FieldSet {
        FieldSet {
            density: self.density.finish(),
            time_dilation: self.time_dilation.finish(),
            refractive_index: self.refractive_index.finish(),
        }
    }
}

struct RangeBuilder {
    values: Vec<f64>,
    min: f64,
    max: f64,
}

impl Default for RangeBuilder {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RangeBuilder {
    fn new(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn push(&mut self, value: f64) {
        self.values.push(value);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    fn merge(mut self, mut right: Self) -> Self {
        self.values.append(&mut right.values);
        self.min = self.min.min(right.min);
        self.max = self.max.max(right.max);
        self
    }

    fn finish(self) -> ScalarField {
        if self.values.is_empty() {
            return ScalarField {
                values: self.values,
                min: 0.0,
                max: 0.0,
            };
        }
        ScalarField {
            values: self.values,
            min: self.min,
            max: self.max,
        }
    }
}
