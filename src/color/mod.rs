//! Colormaps: palette definitions, 256-entry lookup tables and their export.

mod export;
mod lut;
mod palette;

pub use export::{
    EXPORT_FORMAT, EXPORT_GENERATOR, EXPORT_VERSION, LutExport, LutExportError,
    LutExportMetadata, export_luts, parse_lut_export,
};
pub use lut::{LUT_SIZE, Lut, LutLibrary, edge_colors, vertex_colors};
pub use palette::{ColorStop, Palette, PaletteDefinition, PaletteError, Rgb, clamp01};
