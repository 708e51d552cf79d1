//! Parsers for externally supplied input documents.

pub mod bodies_json;

pub use bodies_json::{BodyParseError, parse_bodies, sample_ephemerides_json};
