//! JSON export of lookup tables for external renderers, and the validating
//! re-import of that document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::lut::{LUT_SIZE, Lut};
use super::palette::{Palette, Rgb};

pub const EXPORT_GENERATOR: &str = "Segmented Spacetime Solar System";
pub const EXPORT_VERSION: &str = "1.0";
pub const EXPORT_FORMAT: &str = "RGB";

pub type Result<T> = std::result::Result<T, LutExportError>;

#[derive(Debug, Error)]
pub enum LutExportError {
    #[error("LUT document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("palette `{palette}` has {len} entries, expected {expected}")]
    WrongSize {
        palette: String,
        len: usize,
        expected: usize,
    },
    #[error("palette `{palette}` entry {index} is not an RGB triple in 0..=255: {value:?}")]
    ChannelOutOfRange {
        palette: String,
        index: usize,
        value: Vec<i64>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LutExportMetadata {
    pub generator: String,
    pub version: String,
    pub size: usize,
    pub format: String,
}

impl Default for LutExportMetadata {
    fn default() -> Self {
        Self {
            generator: EXPORT_GENERATOR.to_owned(),
            version: EXPORT_VERSION.to_owned(),
            size: LUT_SIZE,
            format: EXPORT_FORMAT.to_owned(),
        }
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    metadata: LutExportMetadata,
    palettes: BTreeMap<&'a str, Vec<[u8; 3]>>,
}

#[derive(Deserialize)]
struct RawDocument {
    metadata: LutExportMetadata,
    palettes: BTreeMap<String, Vec<Vec<i64>>>,
}

/// A re-imported export: metadata plus one validated table per palette key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LutExport {
    pub metadata: LutExportMetadata,
    pub palettes: BTreeMap<String, Vec<Rgb>>,
}

impl LutExport {
    /// Table for a built-in palette, if the document carries it.
    #[must_use]
    pub fn table(&self, palette: Palette) -> Option<&[Rgb]> {
        self.palettes.get(palette.name()).map(Vec::as_slice)
    }
}

/// Serializes the given palettes' tables as pretty-printed JSON.
pub fn export_luts(palettes: &[Palette]) -> Result<String> {
    let document = ExportDocument {
        metadata: LutExportMetadata::default(),
        palettes: palettes
            .iter()
            .map(|&palette| {
                let lut = Lut::build(palette);
                let rows = lut.entries().iter().map(|rgb| rgb.to_array()).collect();
                (palette.name(), rows)
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&document)?;
    log::info!("exported {} lookup tables", document.palettes.len());
    Ok(json)
}

/// Parses an export document, checking every table has 256 RGB triples.
pub fn parse_lut_export(json: &str) -> Result<LutExport> {
    let raw: RawDocument = serde_json::from_str(json)?;
    let mut palettes = BTreeMap::new();

    for (name, rows) in raw.palettes {
        if rows.len() != LUT_SIZE {
            return Err(LutExportError::WrongSize {
                palette: name,
                len: rows.len(),
                expected: LUT_SIZE,
            });
        }
        let mut table = Vec::with_capacity(LUT_SIZE);
        for (index, row) in rows.into_iter().enumerate() {
            match to_rgb(&row) {
                Some(rgb) => table.push(rgb),
                None => {
                    return Err(LutExportError::ChannelOutOfRange {
                        palette: name,
                        index,
                        value: row,
                    });
                }
            }
        }
        palettes.insert(name, table);
    }

    Ok(LutExport {
        metadata: raw.metadata,
        palettes,
    })
}

fn to_rgb(row: &[i64]) -> Option<Rgb> {
    let [r, g, b] = row else {
        return None;
    };
    Some(Rgb::new(
        u8::try_from(*r).ok()?,
        u8::try_from(*g).ok()?,
        u8::try_from(*b).ok()?,
    ))
}
