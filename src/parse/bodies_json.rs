//! Parser for body lists delivered as JSON.
//!
//! The payload must be a JSON array. Each element is read leniently: a
//! missing or wrongly typed field falls back to its default instead of
//! rejecting the record, so one bad entry never aborts the batch.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::field::{
    Body, DEFAULT_BOUNDARY_WIDTH, DEFAULT_COUPLING_STRENGTH, DEFAULT_NATURAL_BOUNDARY,
    DEFAULT_SOFTENING_RADIUS,
};
use crate::geom::Vec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result type for body list parsing.
pub type ParseResult<T> = Result<T, BodyParseError>;

/// Name given to records without a usable `name`.
pub const UNKNOWN_BODY_NAME: &str = "Unknown";

#[derive(Debug, Error)]
pub enum BodyParseError {
    /// The payload is not valid JSON at all.
    #[error("body list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Valid JSON, but the top level is not an array.
    #[error("body list must be a JSON array, found {0}")]
    NotAnArray(&'static str),
}

/// Field aliases: the long camelCase name first, then the short form.
const MASS_KEYS: [&str; 2] = ["massScale", "Mscale"];
const COUPLING_KEYS: [&str; 2] = ["couplingStrength", "gamma"];
const SOFTENING_KEYS: [&str; 2] = ["softeningRadius", "r0"];
const BOUNDARY_KEYS: [&str; 2] = ["naturalBoundary", "rNb"];
const WIDTH_KEYS: [&str; 2] = ["boundaryWidth", "delta"];

/// Parses a JSON array of body records.
pub fn parse_bodies(input: &str) -> ParseResult<Vec<Body>> {
    let payload: Value = serde_json::from_str(input)?;
    let Value::Array(records) = payload else {
        let kind = json_kind(&payload);
        log::warn!("rejected body payload: top level is {kind}");
        return Err(BodyParseError::NotAnArray(kind));
    };

    let bodies = build_bodies(&records);
    log::debug!("parsed {} bodies", bodies.len());
    Ok(bodies)
}

#[cfg(feature = "parallel")]
fn build_bodies(records: &[Value]) -> Vec<Body> {
    records.par_iter().enumerate().map(body_from_record).collect()
}

#[cfg(not(feature = "parallel"))]
fn build_bodies(records: &[Value]) -> Vec<Body> {
    records.iter().enumerate().map(body_from_record).collect()
}

fn body_from_record((index, record): (usize, &Value)) -> Body {
    let empty = Map::new();
    let fields = match record {
        Value::Object(fields) => fields,
        other => {
            log::warn!(
                "body record {index} is {}, using defaults",
                json_kind(other)
            );
            &empty
        }
    };

    let name = match fields.get("name") {
        Some(Value::String(name)) => name.clone(),
        _ => {
            log::warn!("body record {index} has no name");
            UNKNOWN_BODY_NAME.to_owned()
        }
    };
    let position = Vec3::new(
        number(fields, &["x"], 0.0),
        number(fields, &["y"], 0.0),
        number(fields, &["z"], 0.0),
    );

    Body::new(
        name,
        position,
        number(fields, &MASS_KEYS, 0.0),
        number(fields, &COUPLING_KEYS, DEFAULT_COUPLING_STRENGTH),
        number(fields, &SOFTENING_KEYS, DEFAULT_SOFTENING_RADIUS),
        number(fields, &BOUNDARY_KEYS, DEFAULT_NATURAL_BOUNDARY),
        number(fields, &WIDTH_KEYS, DEFAULT_BOUNDARY_WIDTH),
    )
}

/// First numeric value under any of `keys`, else `default`.
fn number(fields: &Map<String, Value>, keys: &[&str], default: f64) -> f64 {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_f64))
        .unwrap_or(default)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Three-body demo payload with Sun, Earth and Jupiter at sample positions.
#[must_use]
pub fn sample_ephemerides_json() -> &'static str {
    r#"[
  {"name": "Sun", "x": 0.0, "y": 0.0, "z": 0.0, "Mscale": 1.0, "gamma": 1.0, "r0": 0.00465, "rNb": 0.025, "delta": 0.005},
  {"name": "Earth", "x": 0.96, "y": 0.28, "z": 0.0, "Mscale": 0.000003, "gamma": 1.0, "r0": 0.0000426, "rNb": 0.0002, "delta": 0.00004},
  {"name": "Jupiter", "x": 5.12, "y": 0.88, "z": -0.03, "Mscale": 0.000954, "gamma": 1.0, "r0": 0.000477, "rNb": 0.003, "delta": 0.0006}
]"#
}
