//! Built-in palettes and their continuous color functions.
//!
//! A palette is either a degree-5 polynomial per channel or a short list of
//! anchor stops interpolated linearly. Both produce integer RGB clamped to
//! `0..=255`.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum edit distance for a "did you mean" palette suggestion.
const SUGGESTION_DISTANCE: usize = 3;

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// A piecewise-linear anchor at parameter `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

const fn stop(t: f64, r: u8, g: u8, b: u8) -> ColorStop {
    ColorStop {
        t,
        color: Rgb::new(r, g, b),
    }
}

/// Per-channel polynomial coefficients, lowest order first.
pub type ChannelPolynomials = [[f64; 6]; 3];

/// How a palette turns `t` into a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaletteDefinition {
    Polynomial(&'static ChannelPolynomials),
    Stops(&'static [ColorStop]),
}

const TURBO_COEFFICIENTS: ChannelPolynomials = [
    [34.61, 1172.33, -10793.56, 33300.12, -38394.49, 15054.07],
    [23.31, 557.33, 1225.33, -3574.69, 4772.99, -2110.90],
    [27.2, 321.89, 1517.40, -4642.37, 5930.97, -2586.66],
];

const VIRIDIS_STOPS: [ColorStop; 5] = [
    stop(0.0, 68, 1, 84),
    stop(0.25, 58, 82, 139),
    stop(0.5, 32, 144, 140),
    stop(0.75, 94, 201, 97),
    stop(1.0, 253, 231, 37),
];

const PLASMA_STOPS: [ColorStop; 5] = [
    stop(0.0, 13, 8, 135),
    stop(0.25, 126, 3, 168),
    stop(0.5, 203, 71, 119),
    stop(0.75, 248, 149, 64),
    stop(1.0, 240, 249, 33),
];

const GREYS_STOPS: [ColorStop; 2] = [stop(0.0, 0, 0, 0), stop(1.0, 255, 255, 255)];

/// The built-in palettes.
///
/// JSON and string parsing share [`FromStr`]: names are case-insensitive and
/// `grays` is accepted for `greys`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Turbo,
    Viridis,
    Plasma,
    Greys,
}

impl Palette {
    pub const ALL: [Palette; 4] = [
        Palette::Turbo,
        Palette::Viridis,
        Palette::Plasma,
        Palette::Greys,
    ];

    /// Lowercase key used in exports and selectors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Palette::Turbo => "turbo",
            Palette::Viridis => "viridis",
            Palette::Plasma => "plasma",
            Palette::Greys => "greys",
        }
    }

    #[must_use]
    pub const fn definition(self) -> PaletteDefinition {
        match self {
            Palette::Turbo => PaletteDefinition::Polynomial(&TURBO_COEFFICIENTS),
            Palette::Viridis => PaletteDefinition::Stops(&VIRIDIS_STOPS),
            Palette::Plasma => PaletteDefinition::Stops(&PLASMA_STOPS),
            Palette::Greys => PaletteDefinition::Stops(&GREYS_STOPS),
        }
    }

    /// Continuous color at `t`, clamped to `[0, 1]` first.
    #[must_use]
    pub fn evaluate(self, t: f64) -> Rgb {
        self.definition().evaluate(t)
    }
}

impl PaletteDefinition {
    #[must_use]
    pub fn evaluate(self, t: f64) -> Rgb {
        let t = clamp01(t);
        match self {
            PaletteDefinition::Polynomial(coefficients) => Rgb::new(
                horner(&coefficients[0], t),
                horner(&coefficients[1], t),
                horner(&coefficients[2], t),
            ),
            PaletteDefinition::Stops(stops) => lerp_stops(stops, t),
        }
    }
}

/// `t` clamped to `[0, 1]`; NaN maps to 0.
#[must_use]
pub fn clamp01(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

fn horner(coefficients: &[f64; 6], t: f64) -> u8 {
    let value = coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, &coefficient| acc * t + coefficient);
    to_channel(value)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn lerp_stops(stops: &[ColorStop], t: f64) -> Rgb {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Rgb::default();
    };
    if t <= first.t {
        return first.color;
    }
    if t >= last.t {
        return last.color;
    }

    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t <= hi.t {
            let f = (t - lo.t) / (hi.t - lo.t);
            let channel =
                |a: u8, b: u8| to_channel(f64::from(a) + f * (f64::from(b) - f64::from(a)));
            return Rgb::new(
                channel(lo.color.r, hi.color.r),
                channel(lo.color.g, hi.color.g),
                channel(lo.color.b, hi.color.b),
            );
        }
    }
    last.color
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("unknown palette `{name}`{}", suggestion_hint(.suggestion.as_deref()))]
    UnknownPalette {
        name: String,
        suggestion: Option<&'static str>,
    },
}

fn suggestion_hint(suggestion: Option<&str>) -> String {
    suggestion
        .map(|name| format!(" (did you mean `{name}`?)"))
        .unwrap_or_default()
}

impl FromStr for Palette {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        if key == "grays" {
            return Ok(Palette::Greys);
        }
        if let Some(palette) = Palette::ALL.into_iter().find(|p| p.name() == key) {
            return Ok(palette);
        }

        let suggestion = Palette::ALL
            .into_iter()
            .map(|p| (levenshtein::levenshtein(&key, p.name()), p.name()))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name);

        Err(PaletteError::UnknownPalette {
            name: s.to_owned(),
            suggestion,
        })
    }
}

impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_palettes_hit_their_anchors() {
        assert_eq!(Palette::Viridis.evaluate(0.0), Rgb::new(68, 1, 84));
        assert_eq!(Palette::Viridis.evaluate(1.0), Rgb::new(253, 231, 37));
        assert_eq!(Palette::Viridis.evaluate(0.5), Rgb::new(32, 144, 140));
        assert_eq!(Palette::Plasma.evaluate(0.0), Rgb::new(13, 8, 135));
        assert_eq!(Palette::Plasma.evaluate(1.0), Rgb::new(240, 249, 33));
    }

    #[test]
    fn stops_interpolate_linearly_and_round() {
        // halfway between (68,1,84) and (58,82,139)
        assert_eq!(Palette::Viridis.evaluate(0.125), Rgb::new(63, 42, 112));
    }

    #[test]
    fn out_of_range_parameter_is_clamped() {
        assert_eq!(Palette::Plasma.evaluate(-4.0), Palette::Plasma.evaluate(0.0));
        assert_eq!(Palette::Plasma.evaluate(7.5), Palette::Plasma.evaluate(1.0));
        assert_eq!(Palette::Turbo.evaluate(f64::NAN), Palette::Turbo.evaluate(0.0));
    }

    #[test]
    fn turbo_polynomial_constant_terms() {
        assert_eq!(Palette::Turbo.evaluate(0.0), Rgb::new(35, 23, 27));
        // the high end overshoots and clamps
        assert_eq!(Palette::Turbo.evaluate(1.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn greys_is_a_linear_ramp() {
        for i in 0..=255u8 {
            let t = f64::from(i) / 255.0;
            assert_eq!(Palette::Greys.evaluate(t), Rgb::new(i, i, i));
        }
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("Turbo".parse(), Ok(Palette::Turbo));
        assert_eq!(" VIRIDIS ".parse(), Ok(Palette::Viridis));
        assert_eq!("grays".parse(), Ok(Palette::Greys));
        for palette in Palette::ALL {
            assert_eq!(palette.name().parse(), Ok(palette));
        }
    }

    #[test]
    fn unknown_name_suggests_nearest() {
        let err = "viridus".parse::<Palette>().unwrap_err();
        assert_eq!(
            err,
            PaletteError::UnknownPalette {
                name: "viridus".to_owned(),
                suggestion: Some("viridis"),
            }
        );
        assert_eq!(err.to_string(), "unknown palette `viridus` (did you mean `viridis`?)");

        let far = "magma-extended".parse::<Palette>().unwrap_err();
        assert_eq!(far.to_string(), "unknown palette `magma-extended`");
    }

    #[test]
    fn serde_uses_lowercase_keys() {
        assert_eq!(serde_json::to_string(&Palette::Plasma).unwrap(), "\"plasma\"");
        let parsed: Palette = serde_json::from_str("\"greys\"").unwrap();
        assert_eq!(parsed, Palette::Greys);
    }

    #[test]
    fn serde_accepts_the_same_names_as_from_str() {
        for name in ["Viridis", "GRAYS", " plasma ", "turbo", "viridus"] {
            let from_json = serde_json::from_str::<Palette>(&format!("\"{name}\"")).ok();
            assert_eq!(from_json, name.parse().ok(), "{name}");
        }
        let err = serde_json::from_str::<Palette>("\"viridus\"").unwrap_err();
        assert!(err.to_string().contains("did you mean `viridis`"));
    }
}
