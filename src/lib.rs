#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod field;
pub mod geom;
pub mod parse;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use color::{LutLibrary, Palette};
use field::{
    Body, FieldKind, FieldParams, FieldParamsPatch, FieldScene, FieldSet, solar_system_bodies,
};
use geom::{IcosphereMesh, OrbitTrack, Vec3};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not start the rayon thread pool: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Current engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub radius: f64,
    pub subdivisions: u32,
    pub palette: Palette,
    pub color_mode: FieldKind,
    pub params: FieldParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            radius: 120.0,
            subdivisions: 5,
            palette: Palette::Turbo,
            color_mode: FieldKind::Density,
            params: FieldParams::default(),
        }
    }
}

impl EngineConfig {
    /// This config with the keys present in `patch` replaced.
    #[must_use]
    pub fn merged(&self, patch: ConfigPatch) -> EngineConfig {
        EngineConfig {
            radius: patch.radius.unwrap_or(self.radius),
            subdivisions: patch.subdivisions.unwrap_or(self.subdivisions),
            palette: patch.palette.unwrap_or(self.palette),
            color_mode: patch.color_mode.unwrap_or(self.color_mode),
            params: patch
                .params
                .map_or(self.params, |params| params.apply(self.params)),
        }
    }
}

/// A JSON settings document for [`Engine::configure`]. Every key is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    pub radius: Option<f64>,
    pub subdivisions: Option<u32>,
    pub palette: Option<Palette>,
    pub color_mode: Option<FieldKind>,
    pub params: Option<FieldParamsPatch>,
}

#[derive(Debug, Serialize)]
struct RangeExport {
    min: f64,
    max: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldRangesExport {
    density: RangeExport,
    time_dilation: RangeExport,
    refractive_index: RangeExport,
}

impl From<&FieldSet> for FieldRangesExport {
    fn from(fields: &FieldSet) -> Self {
        let range = |kind| {
            let field = fields.field(kind);
            RangeExport {
                min: field.min,
                max: field.max,
            }
        };
        Self {
            density: range(FieldKind::Density),
            time_dilation: range(FieldKind::TimeDilation),
            refractive_index: range(FieldKind::RefractiveIndex),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BodyExport<'a> {
    #[serde(flatten)]
    body: &'a Body,
    enabled: bool,
}

/// JS-facing field engine: owns the current mesh, bodies and fields.
#[wasm_bindgen]
pub struct Engine {
    config: EngineConfig,
    scene: FieldScene,
    loaded_bodies: Vec<Body>,
    disabled_bodies: HashSet<String>,
    fields: Option<FieldSet>,
    luts: LutLibrary,
}

#[wasm_bindgen]
impl Engine {
    /// Builds the default mesh and loads the built-in solar system.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Engine, JsValue> {
        let config = EngineConfig::default();
        let mesh =
            IcosphereMesh::build(config.radius, config.subdivisions).map_err(to_js_error)?;
        let bodies = solar_system_bodies();
        let scene = FieldScene::new(Arc::new(mesh), bodies.clone(), config.params);

        Ok(Engine {
            config,
            scene,
            loaded_bodies: bodies,
            disabled_bodies: HashSet::new(),
            fields: None,
            luts: LutLibrary::new(),
        })
    }

    /// Applies a JSON [`ConfigPatch`] on top of the current settings. Missing
    /// keys keep their current values; an invalid document or mesh size leaves
    /// the engine unchanged.
    #[wasm_bindgen]
    pub fn configure(&mut self, json: &str) -> Result<(), JsValue> {
        let patch: ConfigPatch = serde_json::from_str(json).map_err(to_js_error)?;
        let config = self.config.merged(patch);

        let mesh_changed =
            config.radius != self.config.radius || config.subdivisions != self.config.subdivisions;
        if mesh_changed {
            let mesh =
                IcosphereMesh::build(config.radius, config.subdivisions).map_err(to_js_error)?;
            self.scene.mesh = Arc::new(mesh);
        }
        if mesh_changed || config.params != self.config.params {
            self.fields = None;
        }
        self.scene.params = config.params;
        self.config = config;
        log::info!("engine configured: {}", self.config.params);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_params(
        &mut self,
        power_index: f64,
        background_density: f64,
        max_density: f64,
        alpha: f64,
        kappa: f64,
    ) {
        let params = FieldParams {
            power_index,
            background_density,
            max_density,
            alpha,
            kappa,
        };
        self.config.params = params;
        self.scene.params = params;
        self.fields = None;
    }

    #[wasm_bindgen]
    pub fn rebuild_mesh(&mut self, radius: f64, subdivisions: u32) -> Result<(), JsValue> {
        let mesh = IcosphereMesh::build(radius, subdivisions).map_err(to_js_error)?;
        log::info!("{}", mesh.stats());
        self.scene.mesh = Arc::new(mesh);
        self.config.radius = radius;
        self.config.subdivisions = subdivisions;
        self.fields = None;
        Ok(())
    }

    /// Replaces the body list from a JSON array and returns the new body count.
    ///
    /// An empty list is refused so the scene always has something to show.
    #[wasm_bindgen]
    pub fn load_bodies(&mut self, json: &str) -> Result<usize, JsValue> {
        let bodies = parse::parse_bodies(json).map_err(to_js_error)?;
        if bodies.is_empty() {
            log::warn!("refusing to replace the body list with an empty one");
            return Err(js_error("body list is empty"));
        }

        let count = bodies.len();
        self.loaded_bodies = bodies;
        self.disabled_bodies.clear();
        self.refresh_scene_bodies();
        Ok(count)
    }

    /// Restores the built-in solar system bodies.
    #[wasm_bindgen]
    pub fn load_solar_system(&mut self) {
        self.loaded_bodies = solar_system_bodies();
        self.disabled_bodies.clear();
        self.refresh_scene_bodies();
    }

    #[wasm_bindgen]
    pub fn set_body_enabled(&mut self, name: &str, enabled: bool) -> Result<(), JsValue> {
        if !self.loaded_bodies.iter().any(|body| body.name == name) {
            return Err(js_error(&format!("unknown body `{name}`")));
        }
        if enabled {
            self.disabled_bodies.remove(name);
        } else {
            self.disabled_bodies.insert(name.to_owned());
        }
        self.refresh_scene_bodies();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn body_count(&self) -> usize {
        self.scene.bodies.len()
    }

    #[wasm_bindgen]
    pub fn bodies(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.body_entries())
    }

    /// Evaluates all three fields over the current mesh.
    #[wasm_bindgen]
    pub fn compute_fields(&mut self) {
        let fields = self.scene.evaluate();
        debug_log!(
            "compute_fields: {} vertices, {} bodies",
            fields.len(),
            self.scene.bodies.len()
        );
        self.fields = Some(fields);
    }

    #[wasm_bindgen]
    pub fn has_fields(&self) -> bool {
        self.fields.is_some()
    }

    #[wasm_bindgen]
    pub fn set_palette(&mut self, name: &str) -> Result<(), JsValue> {
        let palette: Palette = name.parse().map_err(|err| {
            log::warn!("{err}");
            to_js_error(err)
        })?;
        self.config.palette = palette;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn palette(&self) -> String {
        self.config.palette.name().to_owned()
    }

    #[wasm_bindgen]
    pub fn set_color_mode(&mut self, name: &str) -> Result<(), JsValue> {
        self.config.color_mode = name.parse().map_err(to_js_error)?;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn color_mode(&self) -> String {
        self.config.color_mode.name().to_owned()
    }

    /// Flat `x, y, z` vertex positions.
    #[wasm_bindgen]
    pub fn positions(&self) -> Vec<f64> {
        self.scene.mesh.positions_flat()
    }

    /// Flat triangle indices.
    #[wasm_bindgen]
    pub fn indices(&self) -> Vec<u32> {
        self.scene.mesh.indices_flat()
    }

    /// Flat `a, b` pairs, one per wireframe edge, in `edge_colors` order.
    #[wasm_bindgen]
    pub fn edge_indices(&self) -> Vec<u32> {
        self.scene
            .mesh
            .edges()
            .into_iter()
            .flat_map(|(a, b)| [a, b])
            .collect()
    }

    #[wasm_bindgen]
    pub fn vertex_colors(&mut self) -> Result<Vec<u8>, JsValue> {
        let kind = self.config.color_mode;
        let palette = self.config.palette;
        let fields = self.fields.as_ref().ok_or_else(stale_fields)?;
        let lut = self.luts.get(palette);
        Ok(color::vertex_colors(fields.field(kind), lut))
    }

    #[wasm_bindgen]
    pub fn edge_colors(&mut self) -> Result<Vec<u8>, JsValue> {
        let kind = self.config.color_mode;
        let palette = self.config.palette;
        let fields = self.fields.as_ref().ok_or_else(stale_fields)?;
        let lut = self.luts.get(palette);
        Ok(color::edge_colors(&self.scene.mesh, fields.field(kind), lut))
    }

    /// Values of the selected field, aligned with `positions`.
    #[wasm_bindgen]
    pub fn field_values(&self) -> Result<Vec<f64>, JsValue> {
        let fields = self.fields.as_ref().ok_or_else(stale_fields)?;
        Ok(fields.field(self.config.color_mode).values.clone())
    }

    /// `[min, max]` of the selected field.
    #[wasm_bindgen]
    pub fn field_range(&self) -> Result<Vec<f64>, JsValue> {
        let fields = self.fields.as_ref().ok_or_else(stale_fields)?;
        let field = fields.field(self.config.color_mode);
        Ok(vec![field.min, field.max])
    }

    #[wasm_bindgen]
    pub fn field_ranges(&self) -> Result<JsValue, JsValue> {
        let ranges = self.ranges_export().ok_or_else(stale_fields)?;
        to_js_value(&ranges)
    }

    /// Legend strip of the current palette as flat RGB bytes.
    #[wasm_bindgen]
    pub fn legend(&mut self, width: usize) -> Vec<u8> {
        self.luts
            .get(self.config.palette)
            .legend(width)
            .into_iter()
            .flat_map(|rgb| rgb.to_array())
            .collect()
    }

    /// All built-in lookup tables as an export JSON document.
    #[wasm_bindgen]
    pub fn export_luts(&self) -> Result<String, JsValue> {
        color::export_luts(&Palette::ALL).map_err(to_js_error)
    }

    /// Flat `x, y, z` points of the named planet's orbit track.
    #[wasm_bindgen]
    pub fn orbit_points(&self, planet: &str) -> Result<Vec<f64>, JsValue> {
        let track =
            find_orbit(planet).ok_or_else(|| js_error(&format!("no orbit for `{planet}`")))?;
        Ok(flatten(&track.points))
    }

    /// Flat points of a φ-spiral around the named body, scaled by the time
    /// dilation at the body's position.
    #[wasm_bindgen]
    pub fn spiral_points(
        &self,
        body: &str,
        base_radius: f64,
        num_turns: f64,
        points_per_turn: usize,
    ) -> Result<Vec<f64>, JsValue> {
        let body = self
            .scene
            .bodies
            .iter()
            .find(|candidate| candidate.name == body)
            .ok_or_else(|| js_error(&format!("unknown or disabled body `{body}`")))?;
        let tau = field::FieldSample::at(body.position, &self.scene.bodies, &self.scene.params)
            .time_dilation;
        let points = geom::phi_spiral(body.position, base_radius, tau, num_turns, points_per_turn);
        Ok(flatten(&points))
    }

    /// One-line summary of the mesh and parameters.
    #[wasm_bindgen]
    pub fn status(&self) -> String {
        format!("{} | {}", self.scene.mesh.stats(), self.scene.params)
    }
}

impl Engine {
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn scene(&self) -> &FieldScene {
        &self.scene
    }

    /// The fields of the last `compute_fields`, unless inputs changed since.
    #[must_use]
    pub fn fields(&self) -> Option<&FieldSet> {
        self.fields.as_ref()
    }

    /// Every loaded body with its enabled flag, in load order.
    fn body_entries(&self) -> Vec<BodyExport<'_>> {
        self.loaded_bodies
            .iter()
            .map(|body| BodyExport {
                body,
                enabled: !self.disabled_bodies.contains(&body.name),
            })
            .collect()
    }

    fn ranges_export(&self) -> Option<FieldRangesExport> {
        self.fields.as_ref().map(FieldRangesExport::from)
    }

    fn refresh_scene_bodies(&mut self) {
        let disabled = &self.disabled_bodies;
        self.scene.bodies =
            field::filter_bodies(&self.loaded_bodies, |body| !disabled.contains(&body.name));
        self.fields = None;
    }
}

fn find_orbit(planet: &str) -> Option<OrbitTrack> {
    geom::solar_system_orbits()
        .into_iter()
        .find(|track| track.name.eq_ignore_ascii_case(planet.trim()))
}

fn flatten(points: &[Vec3]) -> Vec<f64> {
    points.iter().flat_map(|p| p.to_array()).collect()
}

fn stale_fields() -> JsValue {
    js_error("fields are not computed for the current inputs; call compute_fields first")
}

fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        log::debug!("engine error: {message}");
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigPatch, Engine, EngineConfig, find_orbit, flatten};
    use crate::color::Palette;
    use crate::field::FieldKind;
    use crate::geom::Vec3;

    fn small_engine() -> Engine {
        let mut engine = Engine::new().unwrap();
        engine.rebuild_mesh(10.0, 1).unwrap();
        engine
    }

    #[test]
    fn patch_keeps_unnamed_settings() {
        let base = EngineConfig {
            radius: 10.0,
            subdivisions: 2,
            ..EngineConfig::default()
        };
        let patch: ConfigPatch = serde_json::from_str(r#"{"palette": "viridis"}"#).unwrap();
        let config = base.merged(patch);
        assert_eq!(config.palette, Palette::Viridis);
        assert_eq!((config.radius, config.subdivisions), (10.0, 2));
        assert_eq!(config.color_mode, FieldKind::Density);
        assert_eq!(config.params, base.params);
    }

    #[test]
    fn nested_params_accept_short_keys() {
        let patch: ConfigPatch =
            serde_json::from_str(r#"{"colorMode": "timeDilation", "params": {"nMax": 3.0}}"#)
                .unwrap();
        let config = EngineConfig::default().merged(patch);
        assert_eq!(config.color_mode, FieldKind::TimeDilation);
        assert_eq!(config.params.max_density, 3.0);
        assert_eq!(config.params.power_index, 2.0);
    }

    #[test]
    fn body_entries_carry_enabled_flag() {
        let mut engine = small_engine();
        engine.set_body_enabled("Mars", false).unwrap();

        let json = serde_json::to_value(engine.body_entries()).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0]["name"], "Sun");
        assert_eq!(entries[0]["enabled"], true);
        assert_eq!(entries[0]["massScale"], 1.0);
        assert_eq!(entries[4]["name"], "Mars");
        assert_eq!(entries[4]["enabled"], false);
        assert_eq!(entries[4]["position"]["x"], 1.52);
    }

    #[test]
    fn ranges_export_uses_camel_case_keys() {
        let mut engine = small_engine();
        assert!(engine.ranges_export().is_none());

        engine.compute_fields();
        let json = serde_json::to_value(engine.ranges_export().unwrap()).unwrap();
        let fields = engine.fields().unwrap();
        for (key, kind) in [
            ("density", FieldKind::Density),
            ("timeDilation", FieldKind::TimeDilation),
            ("refractiveIndex", FieldKind::RefractiveIndex),
        ] {
            let field = fields.field(kind);
            assert_eq!(json[key]["min"].as_f64(), Some(field.min), "{key}");
            assert_eq!(json[key]["max"].as_f64(), Some(field.max), "{key}");
        }
    }

    #[test]
    fn orbit_lookup_ignores_case() {
        assert_eq!(find_orbit("earth").map(|t| t.name), Some("Earth"));
        assert!(find_orbit("Pluto").is_none());
    }

    #[test]
    fn flatten_interleaves_coordinates() {
        let flat = flatten(&[Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
        assert_eq!(flat, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
