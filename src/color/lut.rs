//! Pre-baked 256-entry lookup tables and the per-vertex/per-edge coloring
//! built on them.

use std::collections::HashMap;

use crate::field::ScalarField;
use crate::geom::IcosphereMesh;

use super::palette::{Palette, PaletteError, Rgb, clamp01};

/// Number of entries in every lookup table.
pub const LUT_SIZE: usize = 256;

const LAST_INDEX: f64 = (LUT_SIZE - 1) as f64;

/// A palette discretized at `t = i / 255`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut {
    palette: Palette,
    entries: [Rgb; LUT_SIZE],
}

impl Lut {
    #[must_use]
    pub fn build(palette: Palette) -> Self {
        let mut entries = [Rgb::default(); LUT_SIZE];
        for (i, entry) in entries.iter_mut().enumerate() {
            *entry = palette.evaluate(i as f64 / LAST_INDEX);
        }
        log::debug!("built {LUT_SIZE}-entry lut for {palette}");
        Self { palette, entries }
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        self.palette
    }

    #[must_use]
    pub fn entries(&self) -> &[Rgb; LUT_SIZE] {
        &self.entries
    }

    /// Table lookup at `floor(clamp01(t) · 255)`.
    #[must_use]
    pub fn sample(&self, t: f64) -> Rgb {
        self.entries[lut_index(t)]
    }

    /// The palette formula itself, without discretization.
    #[must_use]
    pub fn sample_continuous(&self, t: f64) -> Rgb {
        self.palette.evaluate(t)
    }

    /// Color of `value` relative to the range of `field`.
    #[must_use]
    pub fn color_for(&self, field: &ScalarField, value: f64) -> Rgb {
        self.sample(field.normalize(value))
    }

    /// Horizontal legend strip, left to right from `t = 0` to `t = 1`.
    #[must_use]
    pub fn legend(&self, width: usize) -> Vec<Rgb> {
        match width {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            _ => (0..width)
                .map(|x| self.sample(x as f64 / (width - 1) as f64))
                .collect(),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lut_index(t: f64) -> usize {
    ((clamp01(t) * LAST_INDEX).floor() as usize).min(LUT_SIZE - 1)
}

/// Flat RGB bytes, one triple per field value, in vertex order.
#[must_use]
pub fn vertex_colors(field: &ScalarField, lut: &Lut) -> Vec<u8> {
    field
        .values
        .iter()
        .flat_map(|&value| lut.color_for(field, value).to_array())
        .collect()
}

/// Flat RGB bytes, one triple per mesh edge in [`IcosphereMesh::edges`]
/// order, colored by the mean of the two endpoint values.
#[must_use]
pub fn edge_colors(mesh: &IcosphereMesh, field: &ScalarField, lut: &Lut) -> Vec<u8> {
    mesh.edges()
        .into_iter()
        .flat_map(|(a, b)| {
            let mean = match (field.values.get(a as usize), field.values.get(b as usize)) {
                (Some(va), Some(vb)) => 0.5 * (va + vb),
                _ => field.min,
            };
            lut.color_for(field, mean).to_array()
        })
        .collect()
}

/// Lookup tables built on first use and kept per palette.
#[derive(Debug, Default)]
pub struct LutLibrary {
    tables: HashMap<Palette, Lut>,
}

impl LutLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, palette: Palette) -> &Lut {
        self.tables
            .entry(palette)
            .or_insert_with(|| Lut::build(palette))
    }

    pub fn get_by_name(&mut self, name: &str) -> Result<&Lut, PaletteError> {
        let palette: Palette = name.parse()?;
        Ok(self.get(palette))
    }

    #[must_use]
    pub fn cached(&self) -> usize {
        self.tables.len()
    }
}
